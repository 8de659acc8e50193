use crate::bodies::Body;
use crate::ephemeris::types::{ChartSnapshot, GeoLocation, PlanetPosition};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur while building chart snapshots
#[derive(Error, Debug)]
pub enum EphemerisError {
    #[error("Ephemeris file not found at path: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("Failed to calculate position for {body_id} at {datetime}: {message}")]
    CalculationFailed {
        body_id: String,
        datetime: DateTime<Utc>,
        message: String,
    },
    #[error("{body} is not available in the chart for {datetime}")]
    BodyUnavailable { body: Body, datetime: DateTime<Utc> },
}

/// Source of celestial-position snapshots.
///
/// Implementations only need to fill in the bodies they can resolve; callers
/// treat a missing body as a soft failure.
pub trait ChartProvider {
    fn chart_at(
        &mut self,
        datetime: DateTime<Utc>,
        location: Option<&GeoLocation>,
    ) -> Result<ChartSnapshot, EphemerisError>;

    /// Position of a single body, failing with `BodyUnavailable` when the
    /// snapshot does not carry it.
    fn position_at(
        &mut self,
        body: Body,
        datetime: DateTime<Utc>,
        location: Option<&GeoLocation>,
    ) -> Result<PlanetPosition, EphemerisError> {
        let snapshot = self.chart_at(datetime, location)?;
        snapshot
            .position(body)
            .cloned()
            .ok_or(EphemerisError::BodyUnavailable { body, datetime })
    }
}
