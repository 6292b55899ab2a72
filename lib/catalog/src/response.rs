use chrono::{DateTime, Utc};
use prodsim_core::{CatalogItem, ScoredItem};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A product similar to the one requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub rating: f32,
    pub score: f32,
}

impl From<ScoredItem<'_>> for Recommendation {
    fn from(scored: ScoredItem<'_>) -> Self {
        Self {
            name: scored.item.name.clone(),
            category: scored.item.top_category().to_string(),
            price: scored.item.price,
            rating: scored.item.rating,
            score: scored.score,
        }
    }
}

/// A free-text search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub rating: f32,
    pub rating_count: u64,
}

impl From<&CatalogItem> for SearchHit {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            category: item.top_category().to_string(),
            price: item.price,
            rating: item.rating,
            rating_count: item.rating_count,
        }
    }
}

/// A top rated product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedProduct {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub rating: f32,
}

impl From<&CatalogItem> for FeaturedProduct {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            category: item.top_category().to_string(),
            price: item.price,
            rating: item.rating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerStatus {
    pub ready: bool,
    pub items: usize,
    pub vocabulary: usize,
    pub build_id: Option<Uuid>,
    pub built_at: Option<DateTime<Utc>>,
}
