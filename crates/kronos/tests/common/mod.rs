#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use kronos::ephemeris::{ChartProvider, ChartSnapshot, EphemerisError, GeoLocation, PlanetPosition};
use kronos::Body;

/// Mean lunar motion in degrees per day.
pub const MOON_DEG_PER_DAY: f64 = 13.176358;

pub fn j2000() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap()
}

/// Bodies moving at constant speed from a fixed epoch.
pub struct SyntheticProvider {
    epoch: DateTime<Utc>,
    bodies: Vec<(Body, f64, f64)>,
    pub calls: usize,
}

impl SyntheticProvider {
    pub fn new(epoch: DateTime<Utc>) -> Self {
        Self {
            epoch,
            bodies: Vec::new(),
            calls: 0,
        }
    }

    pub fn with_body(mut self, body: Body, lon_at_epoch: f64, deg_per_day: f64) -> Self {
        self.bodies.push((body, lon_at_epoch, deg_per_day));
        self
    }

    /// Every body at its mean motion for the given orbital period.
    pub fn with_period(self, body: Body, lon_at_epoch: f64, period_years: f64) -> Self {
        self.with_body(body, lon_at_epoch, 360.0 / (period_years * 365.25))
    }

    pub fn longitude(&self, body: Body, at: DateTime<Utc>) -> Option<f64> {
        let elapsed_days = (at - self.epoch).num_milliseconds() as f64 / 86_400_000.0;
        self.bodies
            .iter()
            .find(|(b, _, _)| *b == body)
            .map(|(_, lon, rate)| (lon + rate * elapsed_days).rem_euclid(360.0))
    }
}

impl ChartProvider for SyntheticProvider {
    fn chart_at(
        &mut self,
        datetime: DateTime<Utc>,
        _location: Option<&GeoLocation>,
    ) -> Result<ChartSnapshot, EphemerisError> {
        self.calls += 1;
        let mut snapshot = ChartSnapshot::new(datetime);
        for &(body, _, rate) in &self.bodies {
            if let Some(lon) = self.longitude(body, datetime) {
                snapshot = snapshot.with_position(body, PlanetPosition::new(lon, 0.0, rate));
            }
        }
        Ok(snapshot)
    }
}

/// A provider whose every chart request fails.
pub struct FailingProvider;

impl ChartProvider for FailingProvider {
    fn chart_at(
        &mut self,
        datetime: DateTime<Utc>,
        _location: Option<&GeoLocation>,
    ) -> Result<ChartSnapshot, EphemerisError> {
        Err(EphemerisError::CalculationFailed {
            body_id: "moon".to_string(),
            datetime,
            message: "ephemeris offline".to_string(),
        })
    }
}

pub fn snapshot(datetime: DateTime<Utc>, positions: &[(Body, f64)]) -> ChartSnapshot {
    positions.iter().fold(ChartSnapshot::new(datetime), |snap, &(body, lon)| {
        snap.with_position(body, PlanetPosition::new(lon, 0.0, 0.01))
    })
}
