//! # prodsim Catalog
//!
//! Dataset loading and snapshot management for prodsim.
//!
//! - [`load_catalog`] / [`read_catalog`] - CSV rows into [`prodsim_core::CatalogItem`]s
//! - [`CatalogManager`] - Builds the index, swaps snapshots atomically and
//!   answers recommendation, search and featured-product queries

pub mod config;
pub mod error;
pub mod loader;
pub mod manager;
pub mod response;

pub use config::ManagerConfig;
pub use error::{Error, Result};
pub use loader::{load_catalog, read_catalog, REQUIRED_COLUMNS};
pub use manager::{recommendations, CatalogManager};
pub use prodsim_core::{CatalogIndex, CatalogItem};
pub use response::{FeaturedProduct, ManagerStatus, Recommendation, SearchHit};

/// Default number of similar products returned
pub const DEFAULT_RECOMMENDATIONS: usize = 5;
/// Default number of free-text search results
pub const DEFAULT_SEARCH_RESULTS: usize = 10;
/// Default number of featured (top rated) products
pub const DEFAULT_FEATURED: usize = 6;
