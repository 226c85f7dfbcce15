use std::path::Path;
use std::time::Duration;

use super::error::CatalogError;

/// Download TLE text from `url`. With a cache directory, a cached copy younger
/// than `max_age` is returned instead and fresh downloads are written back.
pub async fn fetch_tle(
    url: &str,
    cache_dir: Option<&Path>,
    max_age: Duration,
) -> Result<String, CatalogError> {
    let cache_path = cache_dir.map(|dir| dir.join(cache_file_name(url)));

    if let Some(path) = &cache_path {
        if let Some(content) = read_fresh(path, max_age).await {
            log::info!("Using cached catalog {}", path.display());
            return Ok(content);
        }
    }

    log::info!("Downloading catalog from {}", url);
    let content = reqwest::get(url)
        .await?
        .error_for_status()?
        .text()
        .await?;

    if let Some(path) = &cache_path {
        if let Err(e) = write_cache(path, &content).await {
            log::warn!("Failed to cache catalog at {}: {}", path.display(), e);
        }
    }

    Ok(content)
}

async fn read_fresh(path: &Path, max_age: Duration) -> Option<String> {
    let modified = tokio::fs::metadata(path).await.ok()?.modified().ok()?;
    let age = modified.elapsed().unwrap_or_default();
    if age >= max_age {
        log::debug!("Cached catalog {} is stale ({:?} old)", path.display(), age);
        return None;
    }
    tokio::fs::read_to_string(path).await.ok()
}

async fn write_cache(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await
}

fn cache_file_name(url: &str) -> String {
    let stem: String = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}.tle", stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::catalog::fixtures::STATIONS_TLE;
    use crate::catalog::{CatalogSource, EphemerisProvider};

    // Nothing listens on the discard port, so a download attempt fails fast.
    const UNREACHABLE: &str = "http://127.0.0.1:9/gp.php?GROUP=stations&FORMAT=tle";

    fn cache_with_stations() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(cache_file_name(UNREACHABLE)), STATIONS_TLE).unwrap();
        dir
    }

    #[test]
    fn cache_names_are_filesystem_safe() {
        assert_eq!(
            cache_file_name("https://celestrak.org/NORAD/elements/gp.php?GROUP=stations"),
            "celestrak_org_NORAD_elements_gp_php_GROUP_stations.tle"
        );
    }

    #[tokio::test]
    async fn fresh_cache_skips_download() {
        let dir = cache_with_stations();

        let content = fetch_tle(UNREACHABLE, Some(dir.path()), Duration::from_secs(3600))
            .await
            .unwrap();
        assert_eq!(content, STATIONS_TLE);
    }

    #[tokio::test]
    async fn stale_cache_falls_through_to_download() {
        let dir = cache_with_stations();

        let err = fetch_tle(UNREACHABLE, Some(dir.path()), Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Download(_)));
    }

    #[tokio::test]
    async fn url_source_builds_catalog_from_cache() {
        let dir = cache_with_stations();

        let source = CatalogSource::Url {
            url: UNREACHABLE.to_string(),
            cache_dir: Some(dir.path().to_path_buf()),
            max_age: Duration::from_secs(3600),
        };
        let catalog = source.load().await.unwrap();
        assert!(catalog.lookup("ISS (ZARYA)").is_ok());
    }
}
