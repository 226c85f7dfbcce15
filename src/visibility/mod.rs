mod classifier;
mod error;
mod pointing;
mod scanner;
mod sweep;
mod topocentric;
mod types;

pub use error::VisibilityError;
pub use pointing::PointingMode;
pub use scanner::VisibilityScanner;
pub use sweep::sweep;
pub use types::{StepEvent, TopocentricSample, VisibilityWindow};
