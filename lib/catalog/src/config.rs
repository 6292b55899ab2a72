use prodsim_core::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the catalog and its linguistic resources come from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    pub dataset: PathBuf,
    /// One stop word per line; the built-in NLTK list when unset
    pub stopwords: Option<PathBuf>,
    /// Lemma dictionary file; the built-in dictionary when unset
    pub lemmas: Option<PathBuf>,
    /// Version label recorded for a loaded lemma dictionary
    pub lemma_version: String,
    pub engine: EngineConfig,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            dataset: PathBuf::from("data/cleaned_amazon_data.csv"),
            stopwords: None,
            lemmas: None,
            lemma_version: "custom".to_string(),
            engine: EngineConfig::default(),
        }
    }
}

impl ManagerConfig {
    pub fn with_dataset(dataset: impl Into<PathBuf>) -> Self {
        Self {
            dataset: dataset.into(),
            ..Self::default()
        }
    }
}
