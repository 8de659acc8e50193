pub mod aspects;
pub mod bodies;
pub mod ephemeris;
pub mod lifecycle;
pub mod lunar_return;
pub mod orb;
pub mod reference;
pub mod significance;
pub mod time;

pub use bodies::Body;
pub use ephemeris::{ChartProvider, ChartSnapshot, EphemerisError, GeoLocation, PlanetPosition};
pub use lifecycle::{DetectionOptions, EventFeed, LifecycleDetector, LifecycleEvent};
pub use lunar_return::{find_lunar_return, LunarReturn, LunarReturnConfig, LunarReturnError};
pub use orb::{signed_orb, OrbStatus};
pub use reference::ReferenceTables;
pub use significance::Significance;

#[cfg(feature = "swiss-ephemeris")]
pub use ephemeris::SwissEphemerisAdapter;
