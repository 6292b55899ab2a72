use crate::response::{FeaturedProduct, ManagerStatus, Recommendation, SearchHit};
use crate::{load_catalog, Error, ManagerConfig, Result};
use parking_lot::RwLock;
use prodsim_core::{
    CatalogIndex, CatalogItem, LemmaDictionary, Lemmatizer, Normalizer, StopWords,
};
use std::fs::File;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Owns the current catalog snapshot.
///
/// Builds happen entirely off to the side; only a finished index is swapped
/// in. Readers clone the `Arc` once per request and keep a consistent view
/// even if a reload lands mid-request.
pub struct CatalogManager {
    config: ManagerConfig,
    normalizer: Arc<Normalizer>,
    current: RwLock<Option<Arc<CatalogIndex>>>,
}

impl CatalogManager {
    /// Load linguistic resources; the catalog itself is built by
    /// [`initialize`](Self::initialize).
    pub fn new(config: ManagerConfig) -> Result<Self> {
        let stop_words = match &config.stopwords {
            Some(path) => {
                let words = StopWords::from_reader(File::open(path)?)?;
                info!(path = %path.display(), words = words.len(), "Loaded stop words");
                words
            }
            None => StopWords::nltk_english(),
        };
        let lemmatizer: Arc<dyn Lemmatizer> = match &config.lemmas {
            Some(path) => {
                let dict =
                    LemmaDictionary::from_reader(File::open(path)?, config.lemma_version.clone())?;
                info!(path = %path.display(), version = dict.version(), "Loaded lemma dictionary");
                Arc::new(dict)
            }
            None => Arc::new(LemmaDictionary::builtin()),
        };
        let normalizer = Normalizer::new(
            Arc::new(stop_words),
            lemmatizer,
            config.engine.normalize_cache_capacity,
        );

        Ok(Self {
            config,
            normalizer: Arc::new(normalizer),
            current: RwLock::new(None),
        })
    }

    /// Build from the configured dataset. `false` means the build failed;
    /// callers must not serve queries until a build has succeeded.
    pub fn initialize(&self) -> bool {
        match self.reload() {
            Ok(_) => true,
            Err(e) => {
                error!(
                    error = %e,
                    dataset = %self.config.dataset.display(),
                    "Failed to initialize catalog index"
                );
                false
            }
        }
    }

    /// Rebuild from the dataset and swap the new snapshot in. On failure the
    /// previous snapshot stays current.
    pub fn reload(&self) -> Result<Uuid> {
        let items = load_catalog(&self.config.dataset)?;
        self.install(items)
    }

    /// Build an index from in-memory items and swap it in.
    pub fn install(&self, items: Vec<CatalogItem>) -> Result<Uuid> {
        let index = CatalogIndex::build(items, self.normalizer.clone(), &self.config.engine)
            .map_err(|e| {
                warn!(error = %e, "Catalog build failed, keeping previous snapshot");
                e
            })?;
        let build_id = index.build_id();
        *self.current.write() = Some(Arc::new(index));
        Ok(build_id)
    }

    #[inline]
    pub fn snapshot(&self) -> Option<Arc<CatalogIndex>> {
        self.current.read().clone()
    }

    fn ready(&self) -> Result<Arc<CatalogIndex>> {
        self.snapshot().ok_or(Error::NotReady)
    }

    pub fn get_recommendations(&self, item_id: &str, n: usize) -> Result<Vec<Recommendation>> {
        let index = self.ready()?;
        recommendations(&index, item_id, n)
    }

    pub fn search_by_tag(&self, query: &str, n: usize) -> Result<Vec<SearchHit>> {
        let index = self.ready()?;
        let hits = index
            .search(query, n)
            .into_iter()
            .map(|hit| SearchHit::from(hit.item))
            .collect();
        Ok(hits)
    }

    pub fn top_rated(&self, n: usize) -> Result<Vec<FeaturedProduct>> {
        let index = self.ready()?;
        let featured = index
            .top_rated(n)
            .into_iter()
            .map(FeaturedProduct::from)
            .collect();
        Ok(featured)
    }

    pub fn status(&self) -> ManagerStatus {
        match self.snapshot() {
            Some(index) => ManagerStatus {
                ready: true,
                items: index.len(),
                vocabulary: index.model().vocabulary_len(),
                build_id: Some(index.build_id()),
                built_at: Some(index.built_at()),
            },
            None => ManagerStatus {
                ready: false,
                items: 0,
                vocabulary: 0,
                build_id: None,
                built_at: None,
            },
        }
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Arc<Normalizer> {
        &self.normalizer
    }
}

/// Similar products for `item_id` from one specific snapshot.
///
/// Callers that need to tag the answer with its build id take the snapshot
/// once and query it here, so the id and the result always agree.
pub fn recommendations(
    index: &CatalogIndex,
    item_id: &str,
    n: usize,
) -> Result<Vec<Recommendation>> {
    let recommendations = index
        .similar_to(item_id, n)?
        .into_iter()
        .map(Recommendation::from)
        .collect();
    Ok(recommendations)
}
