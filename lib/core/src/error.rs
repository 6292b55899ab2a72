use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Index build failed at stage '{stage}': {source}")]
    Build {
        stage: BuildStage,
        #[source]
        source: Box<Error>,
    },

    #[error("Catalog is empty")]
    EmptyCatalog,

    #[error("Duplicate item id: {0}")]
    DuplicateItem(String),

    #[error("Cannot fit a model on an empty corpus")]
    EmptyCorpus,

    #[error("Empty vocabulary; the documents only contain stop words or no terms")]
    EmptyVocabulary,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Linguistic resource error: {0}")]
    Resource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap an error as a failure of the given build stage.
    pub fn at_stage(self, stage: BuildStage) -> Self {
        Error::Build {
            stage,
            source: Box::new(self),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ItemNotFound(_))
    }
}

/// Stages of a catalog index build, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Validate,
    Normalize,
    Fit,
    Transform,
    Similarity,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BuildStage::Validate => "validate",
            BuildStage::Normalize => "normalize",
            BuildStage::Fit => "fit",
            BuildStage::Transform => "transform",
            BuildStage::Similarity => "similarity",
        };
        f.write_str(name)
    }
}

/// Recoverable failure inside the normalization pipeline.
///
/// Never leaves the normalizer: it is logged and the partially
/// processed text is returned instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("tokenization failed: {0}")]
    Tokenize(String),

    #[error("lemmatization failed: {0}")]
    Lemmatize(String),
}
