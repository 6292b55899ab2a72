use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Dataset error in {path:?}: {message}")]
    Dataset { path: PathBuf, message: String },

    #[error("Dataset is missing required column: {0}")]
    MissingColumn(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Catalog index is not ready")]
    NotReady,

    #[error(transparent)]
    Engine(#[from] prodsim_core::Error),
}

impl Error {
    /// Unknown item id in a similar-products lookup
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Engine(e) if e.is_not_found())
    }
}
