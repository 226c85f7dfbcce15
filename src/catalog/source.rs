use std::path::PathBuf;
use std::time::Duration;

use super::error::CatalogError;
use super::fetch::fetch_tle;
use super::provider::Catalog;
use super::tle_loader::TleLoader;

pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(2 * 60 * 60);

/// Where the TLE catalog comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogSource {
    /// A TLE file, or a directory of `.tle`/`.txt` files.
    Path(PathBuf),
    Url {
        url: String,
        cache_dir: Option<PathBuf>,
        max_age: Duration,
    },
}

impl CatalogSource {
    pub async fn load(&self) -> Result<Catalog, CatalogError> {
        match self {
            CatalogSource::Path(path) => TleLoader::new(path.clone()).load(),
            CatalogSource::Url {
                url,
                cache_dir,
                max_age,
            } => {
                let content = fetch_tle(url, cache_dir.as_deref(), *max_age).await?;
                let catalog = Catalog::from_tle_str(&content, url)?;
                if catalog.is_empty() {
                    return Err(CatalogError::Empty(url.clone()));
                }
                log::info!("Loaded {} satellites from {}", catalog.len(), url);
                Ok(catalog)
            }
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::Path(path) => write!(f, "{}", path.display()),
            CatalogSource::Url { url, .. } => write!(f, "{}", url),
        }
    }
}
