use crate::cache::ResponseCache;
use actix_cors::Cors;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer, ResponseError, Result as ActixResult};
use prodsim_catalog::{
    recommendations, CatalogManager, Recommendation, DEFAULT_FEATURED, DEFAULT_RECOMMENDATIONS,
    DEFAULT_SEARCH_RESULTS,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

/// Shared state handed to every handler
pub struct AppState {
    pub manager: Arc<CatalogManager>,
    pub similar_cache: ResponseCache<Vec<Recommendation>>,
}

impl AppState {
    pub fn new(manager: Arc<CatalogManager>, cache_ttl: Duration) -> Self {
        Self {
            manager,
            similar_cache: ResponseCache::new(cache_ttl),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("Recommendation system is not initialized")]
    NotReady,

    #[error("{0}")]
    Internal(String),
}

impl From<prodsim_catalog::Error> for ApiError {
    fn from(e: prodsim_catalog::Error) -> Self {
        if e.is_not_found() {
            return ApiError::NotFound(e.to_string());
        }
        match e {
            prodsim_catalog::Error::NotReady => ApiError::NotReady,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    query: String,
    limit: Option<usize>,
}

pub struct RestApi;

impl RestApi {
    pub async fn start(
        manager: Arc<CatalogManager>,
        cache_ttl: Duration,
        port: u16,
    ) -> std::io::Result<()> {
        let state = web::Data::new(AppState::new(manager, cache_ttl));

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header()
                .max_age(3600);

            App::new()
                .wrap(cors)
                .app_data(state.clone())
                .configure(Self::routes)
        })
        .bind(("0.0.0.0", port))?
        .run()
        .await
    }

    /// Route table; expects `web::Data<AppState>` registered on the app.
    pub fn routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/search", web::get().to(search))
            .route("/api/similar-products/{product_id}", web::get().to(similar_products))
            .route("/recommendations", web::get().to(featured))
            .route("/health", web::get().to(health))
            .route("/admin/reload", web::post().to(reload));
    }
}

async fn search(
    state: web::Data<AppState>,
    params: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = params.query.trim();
    if query.is_empty() {
        return Ok(HttpResponse::Ok().json(Vec::<()>::new()));
    }
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_RESULTS);
    let hits = state.manager.search_by_tag(query, limit).map_err(|e| {
        error!(route = "search", query, error = %e, "Search failed");
        ApiError::from(e)
    })?;
    debug!(query, results = hits.len(), "Search served");
    Ok(HttpResponse::Ok().json(hits))
}

async fn similar_products(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let product_id = path.into_inner();
    // one snapshot for both the cache tag and the answer
    let index = state.manager.snapshot().ok_or(ApiError::NotReady)?;
    let build_id = index.build_id();

    if let Some(cached) = state.similar_cache.get(&product_id, build_id) {
        return Ok(HttpResponse::Ok().json(cached.as_ref()));
    }

    let similar =
        recommendations(&index, &product_id, DEFAULT_RECOMMENDATIONS).map_err(|e| {
            error!(
                route = "similar-products",
                product_id = %product_id,
                error = %e,
                "Recommendation failed"
            );
            ApiError::from(e)
        })?;
    let similar = state.similar_cache.insert(&product_id, build_id, similar);
    Ok(HttpResponse::Ok().json(similar.as_ref()))
}

async fn featured(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let products = state.manager.top_rated(DEFAULT_FEATURED).map_err(|e| {
        error!(route = "recommendations", error = %e, "Unable to load featured products");
        ApiError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(products))
}

async fn health(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let status = state.manager.status();
    let code = if status.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    Ok(HttpResponse::build(code).json(status))
}

async fn reload(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let manager = state.manager.clone();
    let build_id = web::block(move || manager.reload())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(|e| {
            error!(route = "admin/reload", error = %e, "Reload failed");
            ApiError::from(e)
        })?;

    state.similar_cache.clear();
    info!(build_id = %build_id, "Catalog reloaded");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "result": { "build_id": build_id }
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;
    use prodsim_catalog::{CatalogItem, ManagerConfig};

    fn items() -> Vec<CatalogItem> {
        let cables = "Electronics|Cables";
        vec![
            CatalogItem::new("p1", "Braided USB Cable", cables, "", 199.0, 4.1, 9),
            CatalogItem::new("p2", "Braided USB Cables", cables, "", 249.0, 4.4, 3),
            CatalogItem::new("p3", "Ceramic Coffee Mug", "Kitchen|Mugs", "", 299.0, 4.8, 1),
        ]
    }

    fn manager(installed: bool) -> Arc<CatalogManager> {
        let config = ManagerConfig::with_dataset("/nonexistent.csv");
        let manager = CatalogManager::new(config).unwrap();
        if installed {
            manager.install(items()).unwrap();
        }
        Arc::new(manager)
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state).configure(RestApi::routes)).await
        };
    }

    fn state(installed: bool) -> web::Data<AppState> {
        web::Data::new(AppState::new(manager(installed), Duration::from_secs(300)))
    }

    #[actix_web::test]
    async fn test_similar_products() {
        let state = state(true);
        let app = app!(state.clone());

        let req = test::TestRequest::get().uri("/api/similar-products/p1").to_request();
        let body: Vec<Recommendation> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 2);
        assert_eq!(body[0].name, "Braided USB Cables");
        assert_eq!(body[0].category, "Electronics");
        assert_eq!(state.similar_cache.len(), 1);

        let req = test::TestRequest::get().uri("/api/similar-products/missing").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_search() {
        let app = app!(state(true));

        let req = test::TestRequest::get().uri("/search?query=coffee%20mug&limit=1").to_request();
        let body: Vec<serde_json::Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 1);
        assert_eq!(body[0]["id"], "p3");
        assert_eq!(body[0]["category"], "Kitchen");

        let req = test::TestRequest::get().uri("/search").to_request();
        let body: Vec<serde_json::Value> = test::call_and_read_body_json(&app, req).await;
        assert!(body.is_empty());
    }

    #[actix_web::test]
    async fn test_featured_and_health() {
        let app = app!(state(true));

        let req = test::TestRequest::get().uri("/recommendations").to_request();
        let body: Vec<serde_json::Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 3);
        assert_eq!(body[0]["id"], "p3");

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_not_ready() {
        let app = app!(state(false));

        let req = test::TestRequest::get().uri("/api/similar-products/p1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn test_cached_answer_tagged_with_serving_snapshot() {
        let state = state(true);
        let app = app!(state.clone());

        let req = test::TestRequest::get().uri("/api/similar-products/p1").to_request();
        let first: Vec<Recommendation> = test::call_and_read_body_json(&app, req).await;
        let build_id = state.manager.snapshot().unwrap().build_id();
        assert_eq!(state.similar_cache.get("p1", build_id).as_deref(), Some(&first));

        // a new snapshot never sees entries tagged with the old one
        let rebuilt = state.manager.install(items()).unwrap();
        assert!(state.similar_cache.get("p1", rebuilt).is_none());

        let req = test::TestRequest::get().uri("/api/similar-products/p1").to_request();
        let second: Vec<Recommendation> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(second, first);
        assert!(state.similar_cache.get("p1", rebuilt).is_some());
    }

    #[actix_web::test]
    async fn test_failed_reload_reports_error() {
        let state = state(true);
        let before = state.manager.status().build_id;
        let app = app!(state.clone());

        let req = test::TestRequest::post().uri("/admin/reload").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(state.manager.status().build_id, before);
    }
}
