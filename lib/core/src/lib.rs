//! # prodsim Core
//!
//! Core library for the prodsim product similarity engine.
//!
//! This crate provides the text pipeline and the similarity machinery:
//!
//! - [`Normalizer`] - Deterministic text normalization with a bounded memo cache
//! - [`StopWords`] / [`LemmaDictionary`] - Linguistic resources, passed in explicitly
//! - [`TfidfModel`] - Unigram + bigram TF-IDF vocabulary and weighting
//! - [`SparseVector`] - Sparse weighted vectors over the fitted vocabulary
//! - [`ItemMatrix`] / [`SimilarityMatrix`] - Cosine similarity, one-vs-all and all-pairs
//! - [`CatalogIndex`] - The immutable, fully built catalog snapshot
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use prodsim_core::{CatalogIndex, CatalogItem, EngineConfig, Normalizer};
//!
//! let cables = "Electronics|Cables";
//! let items = vec![
//!     CatalogItem::new("a", "USB charging cable", cables, "Braided cable", 199.0, 4.2, 120),
//!     CatalogItem::new("b", "USB charging cable fast", cables, "Nylon cable", 249.0, 4.0, 80),
//!     CatalogItem::new("c", "Steel water bottle", "Home|Kitchen", "Keeps cold", 399.0, 4.5, 40),
//! ];
//!
//! let config = EngineConfig::default();
//! let normalizer = Arc::new(Normalizer::with_defaults(config.normalize_cache_capacity));
//! let index = CatalogIndex::build(items, normalizer, &config).unwrap();
//!
//! let similar = index.similar_to("a", 2).unwrap();
//! assert_eq!(similar[0].item.id, "b");
//!
//! let hits = index.search("water bottle", 1);
//! assert_eq!(hits[0].item.id, "c");
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod index;
pub mod item;
pub mod lemma;
pub mod normalizer;
pub mod similarity;
pub mod stopwords;
pub mod tfidf;
pub mod vector;

pub use cache::{CacheStats, NormalizeCache};
pub use config::EngineConfig;
pub use error::{BuildStage, Error, NormalizeError, Result};
pub use index::{CatalogIndex, ScoredItem};
pub use item::CatalogItem;
pub use lemma::{LemmaDictionary, Lemmatizer};
pub use normalizer::Normalizer;
pub use similarity::{rank_top_n, ItemMatrix, SimilarityMatrix};
pub use stopwords::StopWords;
pub use tfidf::{TfidfConfig, TfidfModel};
pub use vector::SparseVector;
