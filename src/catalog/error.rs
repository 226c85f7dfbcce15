use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("satellite not found: {0}")]
    NotFound(String),
    #[error("TLE file or directory not found: {0}")]
    SourceNotFound(String),
    #[error("TLE file read error: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Invalid TLE format in {file}: {message}")]
    InvalidTle { file: String, message: String },
    #[error("catalog download failed: {0}")]
    Download(#[from] reqwest::Error),
    #[error("no satellites loaded from {0}")]
    Empty(String),
}

impl CatalogError {
    /// True for a missing name, as opposed to an unusable catalog source.
    pub fn is_lookup(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}
