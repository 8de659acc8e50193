//! Secondary-progressed Moon returning to the natal Moon.

use crate::bodies::Body;
use crate::ephemeris::{ChartSnapshot, EphemerisError};
use crate::lifecycle::events::{EventStatus, Placement, ReturnEvent};
use crate::lifecycle::returns::resolve;
use crate::orb::{return_number, signed_orb, OrbStatus};
use crate::significance::Significance;
use chrono::{DateTime, Utc};

pub const PROGRESSED_MOON_ORB: f64 = 2.0;
/// One progressed lunation takes about 27.3 years of life.
pub const PROGRESSED_MOON_PERIOD_YEARS: f64 = 27.321661;

pub const PROGRESSED_MOON_INTERPRETATION: &str =
    "Progressed Moon Return - emotional reset that reboots intuition, needs, and inner rhythm.";

const PROGRESSED_MOON_KEYWORDS: [&str; 5] = [
    "emotional reset",
    "intuition",
    "inner rhythm",
    "soul nourishment",
    "sensitivity",
];

/// Active progressed Moon return, if the progressed Moon (from a chart cast at
/// [`crate::time::progressed_datetime`]) is within 2° of the natal Moon.
pub fn detect_progressed_moon_return(
    natal: &ChartSnapshot,
    progressed: &ChartSnapshot,
    age: f64,
    at: DateTime<Utc>,
) -> Result<Option<ReturnEvent>, EphemerisError> {
    let natal_moon = resolve(natal, Body::Moon)?;
    let progressed_moon = resolve(progressed, Body::Moon)?;

    let orb = signed_orb(natal_moon.lon, progressed_moon.lon);
    let orb_status = OrbStatus::classify(orb, PROGRESSED_MOON_ORB);
    if !orb_status.is_active() {
        return Ok(None);
    }

    Ok(Some(ReturnEvent {
        body: Body::Moon,
        cycle_number: return_number(age, PROGRESSED_MOON_PERIOD_YEARS),
        orb: Some(orb),
        orb_status: Some(orb_status),
        significance: Significance::High,
        age,
        years_until: 0.0,
        date: at,
        status: EventStatus::Active,
        placement: Some(Placement::new(natal_moon, progressed_moon)),
        keywords: PROGRESSED_MOON_KEYWORDS.iter().map(|k| k.to_string()).collect(),
    }))
}
