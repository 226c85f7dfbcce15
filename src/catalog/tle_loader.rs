use std::fs;
use std::path::{Path, PathBuf};

use sgp4::{Constants, Elements};

use super::error::CatalogError;
use super::provider::Catalog;
use super::types::{Ephemeris, SatelliteInfo};

/// Loads a catalog from a TLE file, or from every `.tle`/`.txt` file in a
/// directory.
pub struct TleLoader {
    path: PathBuf,
}

impl TleLoader {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<Catalog, CatalogError> {
        let mut catalog = Catalog::new();

        if self.path.is_dir() {
            self.load_dir(&mut catalog)?;
        } else if self.path.is_file() {
            catalog.extend(self.parse_tle_file(&self.path)?);
        } else {
            return Err(CatalogError::SourceNotFound(
                self.path.display().to_string(),
            ));
        }

        if catalog.is_empty() {
            return Err(CatalogError::Empty(self.path.display().to_string()));
        }
        log::info!(
            "Loaded {} satellites from {}",
            catalog.len(),
            self.path.display()
        );
        Ok(catalog)
    }

    fn load_dir(&self, catalog: &mut Catalog) -> Result<(), CatalogError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            let is_tle = path
                .extension()
                .is_some_and(|ext| ext == "tle" || ext == "txt");
            if path.is_file() && is_tle {
                paths.push(path);
            }
        }
        paths.sort();

        for path in paths {
            match self.parse_tle_file(&path) {
                Ok(entries) => catalog.extend(entries),
                Err(e) => {
                    log::warn!("Failed to parse TLE file {}: {}", path.display(), e);
                    // Continue with other files
                }
            }
        }
        Ok(())
    }

    fn parse_tle_file(&self, path: &Path) -> Result<Vec<Ephemeris>, CatalogError> {
        let content = fs::read_to_string(path)?;
        let filename = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        parse_tle_entries(&content, &filename)
    }
}

/// Parse every entry of a TLE text into propagation-ready ephemerides.
pub(crate) fn parse_tle_entries(content: &str, source: &str) -> Result<Vec<Ephemeris>, CatalogError> {
    let invalid = |message: String| CatalogError::InvalidTle {
        file: source.to_string(),
        message,
    };

    let mut results = Vec::new();
    for (name, line1, line2) in parse_multi_tle(content) {
        let elements = Elements::from_tle(name.clone(), line1.as_bytes(), line2.as_bytes())
            .map_err(|e| invalid(e.to_string()))?;
        let constants =
            Constants::from_elements(&elements).map_err(|e| invalid(e.to_string()))?;

        let sat_name = name.unwrap_or_else(|| format!("NORAD {}", elements.norad_id));

        results.push(Ephemeris {
            info: SatelliteInfo {
                name: sat_name,
                norad_id: elements.norad_id as u32,
                tle_source: source.to_string(),
            },
            elements,
            constants,
        });
    }

    Ok(results)
}

/// Split multi-satellite TLE content into (name, line1, line2) triples.
fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            // 2-line TLE (no name)
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            // 3-line TLE, optionally with a "0 " name prefix
            let name = lines[i].strip_prefix("0 ").unwrap_or(lines[i]).trim();
            result.push((
                Some(name.to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            log::debug!("Skipping unrecognised TLE line: {}", lines[i]);
            i += 1;
        }
    }

    result
}
