use crate::stopwords::StopWords;
use crate::tfidf::TfidfConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Tunables for building a catalog index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound on the TF-IDF vocabulary size
    pub max_features: usize,
    /// Inclusive n-gram lengths fed into the vocabulary
    pub ngram_range: (usize, usize),
    /// Distinct inputs memoized by the normalizer; 0 disables the cache
    pub normalize_cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_features: 5000,
            ngram_range: (1, 2),
            normalize_cache_capacity: 1000,
        }
    }
}

impl EngineConfig {
    /// Weighting model configuration using the built-in model stop list.
    pub fn tfidf(&self) -> TfidfConfig {
        TfidfConfig {
            max_features: self.max_features,
            ngram_range: self.ngram_range,
            stop_words: Arc::new(StopWords::sklearn_english()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_features, 5000);
        assert_eq!(config.ngram_range, (1, 2));
        assert_eq!(config.normalize_cache_capacity, 1000);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"max_features": 250}"#).unwrap();
        assert_eq!(config.max_features, 250);
        assert_eq!(config.ngram_range, (1, 2));

        let tfidf = config.tfidf();
        assert_eq!(tfidf.max_features, 250);
        assert!(tfidf.stop_words.contains("the"));
    }
}
