use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::observer::ConfigurationError;

#[derive(Debug, Error)]
pub enum VisibilityError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("propagation failed for {satellite} at {timestamp}: {message}")]
    Propagation {
        satellite: String,
        timestamp: DateTime<Utc>,
        message: String,
    },
}
