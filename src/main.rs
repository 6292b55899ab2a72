use clap::Parser;
use prodsim_api::RestApi;
use prodsim_catalog::{CatalogManager, ManagerConfig};
use prodsim_core::EngineConfig;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Similar-product recommendations and search over a product catalog
#[derive(Parser, Debug)]
#[command(name = "prodsim")]
#[command(about = "Lexical product similarity server", long_about = None)]
struct Args {
    /// Path to the product CSV
    #[arg(short, long, default_value = "data/cleaned_amazon_data.csv")]
    dataset: PathBuf,

    /// HTTP API port
    #[arg(long, default_value_t = 5000)]
    http_port: u16,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Vocabulary size cap
    #[arg(long, default_value_t = 5000)]
    max_features: usize,

    /// Stop word file, one word per line (built-in NLTK list when omitted)
    #[arg(long)]
    stopwords: Option<PathBuf>,

    /// Lemma dictionary file (built-in dictionary when omitted)
    #[arg(long)]
    lemmas: Option<PathBuf>,

    /// Version label for the lemma dictionary
    #[arg(long, default_value = "custom")]
    lemma_version: String,

    /// Seconds a similar-products response stays cached
    #[arg(long, default_value_t = 300)]
    cache_ttl_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting prodsim v{}", env!("CARGO_PKG_VERSION"));
    info!("Dataset: {:?}", args.dataset);

    let config = ManagerConfig {
        dataset: args.dataset,
        stopwords: args.stopwords,
        lemmas: args.lemmas,
        lemma_version: args.lemma_version,
        engine: EngineConfig {
            max_features: args.max_features,
            ..EngineConfig::default()
        },
    };
    let manager = Arc::new(CatalogManager::new(config)?);

    let init = manager.clone();
    let ready = tokio::task::spawn_blocking(move || init.initialize()).await?;
    if !ready {
        error!("Failed to initialize recommendation system. Application not started.");
        anyhow::bail!("catalog index build failed");
    }

    let status = manager.status();
    info!(
        "Catalog ready: {} items, {} terms",
        status.items, status.vocabulary
    );

    let http_port = args.http_port;
    let cache_ttl = Duration::from_secs(args.cache_ttl_secs);
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(manager, cache_ttl, http_port).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    info!("HTTP API: http://localhost:{}/", http_port);

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    Ok(())
}
