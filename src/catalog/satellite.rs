use std::sync::{Arc, OnceLock};

use super::error::CatalogError;
use super::provider::EphemerisProvider;
use super::types::Ephemeris;

/// A satellite known by its catalog name. The ephemeris is looked up on first
/// use and reused afterwards.
#[derive(Debug)]
pub struct Satellite {
    name: String,
    ephemeris: OnceLock<Arc<Ephemeris>>,
}

impl Satellite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ephemeris: OnceLock::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_resolved(&self) -> bool {
        self.ephemeris.get().is_some()
    }

    pub fn resolve<P>(&self, provider: &P) -> Result<&Ephemeris, CatalogError>
    where
        P: EphemerisProvider + ?Sized,
    {
        if let Some(ephemeris) = self.ephemeris.get() {
            return Ok(ephemeris);
        }
        let ephemeris = provider.lookup(&self.name)?;
        log::info!(
            "Resolved {} (NORAD {}) from {}",
            self.name,
            ephemeris.info.norad_id,
            ephemeris.info.tle_source
        );
        Ok(self.ephemeris.get_or_init(|| ephemeris))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;
    use std::cell::Cell;

    struct CountingProvider<'a> {
        inner: &'a dyn EphemerisProvider,
        calls: Cell<usize>,
    }

    impl EphemerisProvider for CountingProvider<'_> {
        fn lookup(&self, name: &str) -> Result<Arc<Ephemeris>, CatalogError> {
            self.calls.set(self.calls.get() + 1);
            self.inner.lookup(name)
        }
    }

    #[test]
    fn resolves_once() {
        let catalog = fixtures::stations();
        let provider = CountingProvider {
            inner: &catalog,
            calls: Cell::new(0),
        };
        let iss = Satellite::new("ISS (ZARYA)");
        assert!(!iss.is_resolved());

        let first = iss.resolve(&provider).unwrap().info.norad_id;
        let second = iss.resolve(&provider).unwrap().info.norad_id;
        assert_eq!((first, second), (25544, 25544));
        assert_eq!(provider.calls.get(), 1);
        assert!(iss.is_resolved());
    }

    #[test]
    fn unknown_name_is_lookup_error() {
        let catalog = fixtures::stations();
        let missing = Satellite::new("NONEXISTENT-SAT");
        let err = missing.resolve(&catalog).unwrap_err();
        assert!(err.is_lookup());
        assert!(!missing.is_resolved());
    }
}
