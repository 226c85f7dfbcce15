mod error;
mod fetch;
mod provider;
mod satellite;
mod source;
mod tle_loader;
mod types;

pub use error::CatalogError;
pub use provider::{Catalog, EphemerisProvider};
pub use satellite::Satellite;
pub use source::{CatalogSource, DEFAULT_MAX_AGE};
pub use types::Ephemeris;

#[cfg(test)]
pub(crate) mod fixtures {
    use super::Catalog;

    pub const STATIONS_TLE: &str = "\
ISS (ZARYA)
1 25544U 98067A   23249.52315972  .00014254  00000+0  25642-3 0  9991
2 25544  51.6416 292.1897 0005599  28.8744  96.2588 15.50146209414138
HST
1 20580U 90037B   23249.12345678  .00001234  00000+0  62345-4 0  9993
2 20580  28.4690 112.3456 0002690 101.2345 258.8765 15.12345678156781
";

    pub fn stations() -> Catalog {
        Catalog::from_tle_str(STATIONS_TLE, "stations.txt").unwrap()
    }
}
