use crate::bodies::Body;
use crate::ephemeris::provider::{ChartProvider, EphemerisError};
use crate::ephemeris::types::{ChartSnapshot, EphemerisSettings, GeoLocation, PlanetPosition};
use chrono::{DateTime, Datelike, Timelike, Utc};
use log::warn;
use std::env;
use std::path::PathBuf;
use swisseph::swe::{calc_ut, julday};

/// Swiss Ephemeris body codes. South node is derived from the true node.
fn swiss_body_code(body: Body) -> Option<i32> {
    match body {
        Body::Sun => Some(0),
        Body::Moon => Some(1),
        Body::Mercury => Some(2),
        Body::Venus => Some(3),
        Body::Mars => Some(4),
        Body::Jupiter => Some(5),
        Body::Saturn => Some(6),
        Body::Uranus => Some(7),
        Body::Neptune => Some(8),
        Body::Pluto => Some(9),
        Body::NorthNode => Some(11), // TRUE_NODE
        Body::Chiron => Some(15),
        Body::SouthNode => None,
    }
}

const FLG_SWIEPH: i32 = 2;
const FLG_SPEED: i32 = 256;

/// Swiss Ephemeris adapter. Longitudes are tropical, measured from the
/// equinox of date.
pub struct SwissEphemerisAdapter {
    _ephemeris_path: PathBuf,
    settings: EphemerisSettings,
}

impl SwissEphemerisAdapter {
    /// Create a new adapter with optional ephemeris path
    pub fn new(
        ephemeris_path: Option<PathBuf>,
        settings: EphemerisSettings,
    ) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("/usr/local/share/swisseph"))
        });

        if !path.exists() {
            return Err(EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Ephemeris path does not exist. Please ensure Swiss Ephemeris data files are installed.".to_string(),
            });
        }

        Ok(Self {
            _ephemeris_path: path,
            settings,
        })
    }

    /// Calculate position for a single body at a Julian day
    pub fn calc_body_position(
        &self,
        body: Body,
        jd: f64,
        datetime: DateTime<Utc>,
        flags: i32,
    ) -> Result<PlanetPosition, EphemerisError> {
        if body == Body::SouthNode {
            let north = self.calc_body_position(Body::NorthNode, jd, datetime, flags)?;
            return Ok(PlanetPosition::new(north.lon + 180.0, 0.0, north.speed_lon));
        }

        let body_code = swiss_body_code(body).ok_or_else(|| EphemerisError::CalculationFailed {
            body_id: body.id().to_string(),
            datetime,
            message: format!("No Swiss Ephemeris code for {}", body),
        })?;

        let result = calc_ut(jd, body_code as u32, flags as u32).map_err(|e| {
            EphemerisError::CalculationFailed {
                body_id: body.id().to_string(),
                datetime,
                message: format!("Swiss Ephemeris error: {}", e),
            }
        })?;

        let out = result.out;
        Ok(PlanetPosition::new(out[0], out[1], out[3]))
    }
}

impl ChartProvider for SwissEphemerisAdapter {
    /// Geocentric positions only; the location is accepted for interface parity
    /// and does not alter body longitudes.
    fn chart_at(
        &mut self,
        datetime: DateTime<Utc>,
        _location: Option<&GeoLocation>,
    ) -> Result<ChartSnapshot, EphemerisError> {
        let jd = datetime_to_julian_day(datetime);
        let flags = FLG_SWIEPH | FLG_SPEED;

        let mut snapshot = ChartSnapshot::new(datetime);
        for &body in &self.settings.include_objects {
            match self.calc_body_position(body, jd, datetime, flags) {
                Ok(position) => {
                    snapshot.planets.insert(body.id().to_string(), position);
                }
                Err(e) => warn!("Skipping {} in chart for {}: {}", body, datetime, e),
            }
        }

        Ok(snapshot)
    }
}

/// Convert UTC datetime to Julian Day
fn datetime_to_julian_day(dt: DateTime<Utc>) -> f64 {
    let hour_decimal =
        dt.hour() as f64 + dt.minute() as f64 / 60.0 + dt.second() as f64 / 3600.0;

    // GREG_CAL = 1
    julday(dt.year(), dt.month() as i32, dt.day() as i32, hour_decimal, 1)
}
