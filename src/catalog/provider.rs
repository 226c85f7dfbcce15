use std::collections::HashMap;
use std::sync::Arc;

use super::error::CatalogError;
use super::tle_loader::parse_tle_entries;
use super::types::Ephemeris;

/// Name-keyed source of orbital state.
pub trait EphemerisProvider {
    fn lookup(&self, name: &str) -> Result<Arc<Ephemeris>, CatalogError>;
}

/// In-memory catalog, keyed by the exact satellite name.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    satellites: HashMap<String, Arc<Ephemeris>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TLE text. `source` only labels errors and entries.
    pub fn from_tle_str(content: &str, source: &str) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        catalog.extend(parse_tle_entries(content, source)?);
        Ok(catalog)
    }

    pub fn insert(&mut self, ephemeris: Ephemeris) {
        let name = ephemeris.info.name.clone();
        if self.satellites.insert(name.clone(), Arc::new(ephemeris)).is_some() {
            log::debug!("Duplicate catalog entry for {}, keeping the last one", name);
        }
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = Ephemeris>) {
        for entry in entries {
            self.insert(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.satellites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.satellites.is_empty()
    }

    /// Names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.satellites.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Ephemeris>> {
        self.satellites.values()
    }
}

impl EphemerisProvider for Catalog {
    fn lookup(&self, name: &str) -> Result<Arc<Ephemeris>, CatalogError> {
        self.satellites
            .get(name)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }
}
