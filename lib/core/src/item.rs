use serde::{Deserialize, Serialize};

/// A product in the catalog. Identity is `id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    /// Full `|`-delimited category hierarchy
    pub category: String,
    pub description: String,
    pub price: f64,
    pub rating: f32,
    pub rating_count: u64,
}

impl CatalogItem {
    #[inline]
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        rating: f32,
        rating_count: u64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            description: description.into(),
            price,
            rating,
            rating_count,
        }
    }

    /// First segment of the category hierarchy
    pub fn top_category(&self) -> &str {
        self.category.split('|').next().unwrap_or_default()
    }
}
