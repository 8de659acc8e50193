//! Major transit detection: a transiting body squaring or opposing its own
//! natal place inside the age window where that threshold is expected.

use crate::aspects::aspect_orb;
use crate::ephemeris::{ChartSnapshot, EphemerisError};
use crate::lifecycle::events::{sort_by_significance_then_orb, EventStatus, Placement, TransitEvent};
use crate::lifecycle::returns::resolve;
use crate::orb::OrbStatus;
use crate::reference::{MajorTransit, ReferenceTables};
use chrono::{DateTime, Utc};
use log::{debug, warn};

/// Active event for one configured transit, or `None` when out of orb or
/// outside the transit's age window.
pub fn check_major_transit(
    transit: &MajorTransit,
    natal: &ChartSnapshot,
    current: &ChartSnapshot,
    age: f64,
) -> Result<Option<TransitEvent>, EphemerisError> {
    if !transit.age_window.contains(age) {
        debug!(
            "{} skipped: age {:.2} outside window {}-{}",
            transit.name, age, transit.age_window.min, transit.age_window.max
        );
        return Ok(None);
    }

    let natal_position = resolve(natal, transit.natal_body)?;
    let transit_position = resolve(current, transit.transit_body)?;

    let orb = aspect_orb(natal_position.lon, transit_position.lon, transit.aspect);
    let orb_status = OrbStatus::classify(orb, transit.tolerance);
    if !orb_status.is_active() {
        return Ok(None);
    }

    Ok(Some(TransitEvent {
        transit: transit.clone(),
        orb: Some(orb),
        orb_status: Some(orb_status),
        significance: transit.significance,
        age,
        years_until: 0.0,
        date: current.datetime,
        status: EventStatus::Active,
        placement: Some(Placement::new(natal_position, transit_position)),
    }))
}

/// Active major transits, most significant and tightest first.
pub fn detect_major_transits(
    natal: &ChartSnapshot,
    current: &ChartSnapshot,
    birth: DateTime<Utc>,
    tables: &ReferenceTables,
) -> Vec<TransitEvent> {
    let age = crate::time::age_in_years(birth, current.datetime);

    let mut active: Vec<TransitEvent> = tables
        .major_transits
        .iter()
        .filter_map(|transit| match check_major_transit(transit, natal, current, age) {
            Ok(event) => event,
            Err(e) => {
                warn!("Error checking {}: {}", transit.name, e);
                None
            }
        })
        .collect();

    sort_by_significance_then_orb(&mut active, |e| (e.significance, e.orb));
    active
}
