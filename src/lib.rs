//! # prodsim
//!
//! Similar-product recommendations and free-text search over a fixed product
//! catalog, using lexical similarity of names, descriptions and categories.
//!
//! Each product's text is normalized (lowercase, URLs/tags/punctuation
//! removed, stop words dropped, nouns lemmatized), weighted with TF-IDF over
//! unigrams and bigrams, and compared with cosine similarity. Item-to-item
//! scores are precomputed once per catalog build; search queries are projected
//! into the same vector space on the fly.
//!
//! ## Quick Start
//!
//! ### As a Server
//!
//! ```bash
//! prodsim --dataset data/cleaned_amazon_data.csv --http-port 5000
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use prodsim::prelude::*;
//!
//! let manager = CatalogManager::new(ManagerConfig::with_dataset("data/products.csv")).unwrap();
//! if !manager.initialize() {
//!     panic!("catalog build failed");
//! }
//!
//! let similar = manager.get_recommendations("B07JW9H4J1", DEFAULT_RECOMMENDATIONS).unwrap();
//! let hits = manager.search_by_tag("usb cable", DEFAULT_SEARCH_RESULTS).unwrap();
//! ```
//!
//! ## Crate Structure
//!
//! - `prodsim-core` - Normalizer, TF-IDF model, similarity engine, catalog index
//! - `prodsim-catalog` - CSV loading and the snapshot-swapping catalog manager
//! - `prodsim-api` - REST routes and the similar-products response cache

// Re-export core types
pub use prodsim_core::{
    CatalogIndex, CatalogItem, EngineConfig, Error, ItemMatrix, LemmaDictionary, Lemmatizer,
    Normalizer, Result, ScoredItem, SimilarityMatrix, SparseVector, StopWords, TfidfConfig,
    TfidfModel,
};

// Re-export catalog
pub use prodsim_catalog::{
    load_catalog, read_catalog, CatalogManager, FeaturedProduct, ManagerConfig, ManagerStatus,
    Recommendation, SearchHit, DEFAULT_FEATURED, DEFAULT_RECOMMENDATIONS, DEFAULT_SEARCH_RESULTS,
};

// Re-export API
pub use prodsim_api::{AppState, RestApi};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CatalogIndex, CatalogItem, CatalogManager, EngineConfig, Error, ManagerConfig,
        Normalizer, Recommendation, Result, SearchHit, FeaturedProduct, TfidfModel, RestApi,
        DEFAULT_FEATURED, DEFAULT_RECOMMENDATIONS, DEFAULT_SEARCH_RESULTS,
    };
}
