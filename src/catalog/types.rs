use sgp4::{Constants, Elements};

/// Information about a single satellite from TLE
#[derive(Debug, Clone)]
pub struct SatelliteInfo {
    pub name: String,
    pub norad_id: u32,
    pub tle_source: String,
}

/// Propagation-ready orbital state of one catalog entry.
pub struct Ephemeris {
    pub info: SatelliteInfo,
    pub elements: Elements,
    pub constants: Constants,
}

impl std::fmt::Debug for Ephemeris {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ephemeris")
            .field("info", &self.info)
            .field("epoch", &self.elements.datetime)
            .finish()
    }
}
