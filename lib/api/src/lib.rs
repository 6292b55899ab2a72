//! # prodsim API
//!
//! actix-web REST routes over a [`prodsim_catalog::CatalogManager`].

pub mod cache;
pub mod rest;

pub use cache::ResponseCache;
pub use rest::{ApiError, AppState, RestApi};
