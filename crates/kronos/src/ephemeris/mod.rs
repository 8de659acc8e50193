pub mod provider;
pub mod types;

#[cfg(feature = "swiss-ephemeris")]
pub mod adapter;

#[cfg(feature = "swiss-ephemeris")]
pub use adapter::SwissEphemerisAdapter;
pub use provider::{ChartProvider, EphemerisError};
pub use types::{ChartSnapshot, EphemerisSettings, GeoLocation, PlanetPosition, ZodiacSign};
