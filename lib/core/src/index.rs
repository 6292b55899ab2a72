use crate::{
    rank_top_n, BuildStage, CatalogItem, EngineConfig, Error, ItemMatrix, Normalizer, Result,
    SimilarityMatrix, TfidfModel,
};
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::cmp::Reverse;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

/// A catalog item with its similarity score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredItem<'a> {
    pub row: usize,
    pub item: &'a CatalogItem,
    pub score: f32,
}

/// An immutable, fully built catalog snapshot.
///
/// Holds the product table, each row's combined feature text, the fitted
/// weighting model, the item vectors and the all-pairs similarity matrix.
/// Row `i` of every derived structure belongs to `items[i]`.
pub struct CatalogIndex {
    items: Vec<CatalogItem>,
    rows_by_id: AHashMap<String, usize>,
    combined: Vec<String>,
    normalizer: Arc<Normalizer>,
    model: TfidfModel,
    vectors: ItemMatrix,
    similarity: SimilarityMatrix,
    build_id: Uuid,
    built_at: DateTime<Utc>,
}

impl std::fmt::Debug for CatalogIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogIndex")
            .field("items", &self.items.len())
            .field("vocabulary", &self.model.vocabulary_len())
            .field("build_id", &self.build_id)
            .field("built_at", &self.built_at)
            .finish()
    }
}

fn timed<T>(stage: BuildStage, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let start = Instant::now();
    let out = f().map_err(|e| e.at_stage(stage))?;
    info!(stage = %stage, elapsed = ?start.elapsed(), "Build stage completed");
    Ok(out)
}

impl CatalogIndex {
    /// Run every build stage. Either a complete index comes back or an
    /// [`Error::Build`] naming the failed stage.
    pub fn build(
        items: Vec<CatalogItem>,
        normalizer: Arc<Normalizer>,
        config: &EngineConfig,
    ) -> Result<Self> {
        let started = Instant::now();
        info!(items = items.len(), "Building catalog index");

        let rows_by_id = timed(BuildStage::Validate, || validate(&items))?;

        let combined = timed(BuildStage::Normalize, || {
            Ok(items
                .par_iter()
                .map(|item| combined_text(&normalizer, item))
                .collect::<Vec<String>>())
        })?;

        let model = timed(BuildStage::Fit, || TfidfModel::fit(&combined, &config.tfidf()))?;
        info!(vocabulary = model.vocabulary_len(), "Vocabulary fitted");

        let vectors = timed(BuildStage::Transform, || {
            let rows = model.transform_batch(&combined);
            Ok(ItemMatrix::new(rows, model.vocabulary_len()))
        })?;

        let similarity = timed(BuildStage::Similarity, || Ok(vectors.pairwise()))?;

        let index = Self {
            items,
            rows_by_id,
            combined,
            normalizer,
            model,
            vectors,
            similarity,
            build_id: Uuid::new_v4(),
            built_at: Utc::now(),
        };
        info!(
            build_id = %index.build_id,
            items = index.len(),
            elapsed = ?started.elapsed(),
            "Catalog index ready"
        );
        Ok(index)
    }

    /// Items most similar to `item_id`, excluding the item itself.
    pub fn similar_to(&self, item_id: &str, n: usize) -> Result<Vec<ScoredItem<'_>>> {
        let row = self
            .row_of(item_id)
            .ok_or_else(|| Error::ItemNotFound(item_id.to_string()))?;
        let scores = self
            .similarity
            .row(row)
            .ok_or_else(|| Error::ItemNotFound(item_id.to_string()))?;
        Ok(self.scored(rank_top_n(scores, n, Some(row))))
    }

    /// Free-text search. Blank queries return nothing; queries with no
    /// known terms return `n` items scored zero.
    pub fn search(&self, query: &str, n: usize) -> Vec<ScoredItem<'_>> {
        if query.trim().is_empty() {
            return Vec::new();
        }
        let normalized = self.normalizer.normalize_str(query);
        let vector = self.model.transform(&normalized);
        debug!(query, normalized = %normalized, terms = vector.nnz(), "Search query projected");

        let scores = self.vectors.one_vs_all(&vector);
        self.scored(rank_top_n(&scores, n, None))
    }

    /// Highest rated items first; ties keep catalog order.
    pub fn top_rated(&self, n: usize) -> Vec<&CatalogItem> {
        let mut rows: Vec<usize> = (0..self.items.len()).collect();
        rows.sort_by_key(|&row| Reverse(OrderedFloat(self.items[row].rating)));
        rows.into_iter().take(n).map(|row| &self.items[row]).collect()
    }

    fn scored(&self, ranked: Vec<(usize, f32)>) -> Vec<ScoredItem<'_>> {
        ranked
            .into_iter()
            .map(|(row, score)| ScoredItem {
                row,
                item: &self.items[row],
                score,
            })
            .collect()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn item(&self, id: &str) -> Option<&CatalogItem> {
        self.row_of(id).map(|row| &self.items[row])
    }

    #[inline]
    pub fn row_of(&self, id: &str) -> Option<usize> {
        self.rows_by_id.get(id).copied()
    }

    pub fn combined_text(&self, row: usize) -> Option<&str> {
        self.combined.get(row).map(String::as_str)
    }

    pub fn model(&self) -> &TfidfModel {
        &self.model
    }

    pub fn vectors(&self) -> &ItemMatrix {
        &self.vectors
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn normalizer(&self) -> &Arc<Normalizer> {
        &self.normalizer
    }

    pub fn build_id(&self) -> Uuid {
        self.build_id
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }
}

fn validate(items: &[CatalogItem]) -> Result<AHashMap<String, usize>> {
    if items.is_empty() {
        return Err(Error::EmptyCatalog);
    }
    let mut rows = AHashMap::with_capacity(items.len());
    for (row, item) in items.iter().enumerate() {
        if rows.insert(item.id.clone(), row).is_some() {
            return Err(Error::DuplicateItem(item.id.clone()));
        }
    }
    Ok(rows)
}

/// Normalized name, description and category, space-joined in that order.
fn combined_text(normalizer: &Normalizer, item: &CatalogItem) -> String {
    format!(
        "{} {} {}",
        normalizer.normalize_str(&item.name),
        normalizer.normalize_str(&item.description),
        normalizer.normalize_str(&item.category)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, name: &str, category: &str, rating: f32) -> CatalogItem {
        CatalogItem::new(id, name, category, "", 100.0, rating, 10)
    }

    fn build(items: Vec<CatalogItem>) -> Result<CatalogIndex> {
        let config = EngineConfig::default();
        let normalizer = Arc::new(Normalizer::with_defaults(config.normalize_cache_capacity));
        CatalogIndex::build(items, normalizer, &config)
    }

    fn catalog() -> Vec<CatalogItem> {
        vec![
            item("a", "Braided USB Charging Cable", "Electronics|Cables", 4.1),
            item("b", "Braided USB Charging Cables", "Electronics|Cables", 4.5),
            item("c", "Ceramic Coffee Mug", "Kitchen|Mugs", 4.5),
            item("d", "USB Wall Charger", "Electronics|Chargers", 3.9),
        ]
    }

    #[test]
    fn test_combined_text() {
        let index = build(catalog()).unwrap();
        assert_eq!(
            index.combined_text(0),
            Some("braided usb charging cable  electronicscable")
        );
    }

    #[test]
    fn test_similar_to_excludes_self() {
        let index = build(catalog()).unwrap();
        let similar = index.similar_to("a", 3).unwrap();
        assert_eq!(similar.len(), 3);
        assert!(similar.iter().all(|s| s.item.id != "a"));
        assert_eq!(similar[0].item.id, "b");
        assert!((similar[0].score - 1.0).abs() < 1e-5);
        for pair in similar.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_unrelated_items_score_zero_in_row_order() {
        let items = vec![
            item("a", "walnut bookshelf", "furniture", 4.0),
            item("b", "walnut bookshelf", "furniture", 4.0),
            item("c", "garden hose", "outdoor", 4.0),
        ];
        let index = build(items).unwrap();
        let similar = index.similar_to("a", 2).unwrap();
        let ids: Vec<&str> = similar.iter().map(|s| s.item.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert!(similar[0].score > similar[1].score);
        assert_eq!(similar[1].score, 0.0);
    }

    #[test]
    fn test_similar_to_unknown() {
        let index = build(catalog()).unwrap();
        let err = index.similar_to("missing", 5).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_search() {
        let index = build(catalog()).unwrap();
        let hits = index.search("coffee mugs", 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].item.id, "c");
        assert!(hits[0].score > 0.0);

        assert!(index.search("   ", 5).is_empty());
    }

    #[test]
    fn test_search_out_of_vocabulary() {
        let index = build(catalog()).unwrap();
        let hits = index.search("zzzzqqqqnonexistentterm", 3);
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|h| h.score == 0.0));
        let rows: Vec<usize> = hits.iter().map(|h| h.row).collect();
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_top_rated_ties_keep_order() {
        let index = build(catalog()).unwrap();
        let ids: Vec<&str> = index.top_rated(3).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(index.top_rated(10).len(), 4);
    }

    #[test]
    fn test_build_failures() {
        let err = build(Vec::new()).unwrap_err();
        assert!(matches!(
            err,
            Error::Build { stage: BuildStage::Validate, .. }
        ));

        let mut items = catalog();
        items.push(item("a", "Duplicate", "Misc", 1.0));
        let err = build(items).unwrap_err();
        assert!(err.to_string().contains("Duplicate item id: a"));

        let err = build(vec![item("x", "the and", "", 1.0)]).unwrap_err();
        assert!(matches!(err, Error::Build { stage: BuildStage::Fit, .. }));
    }
}
