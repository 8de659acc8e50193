//! Planetary return detection: is a transiting body back near its natal longitude?

use crate::bodies::Body;
use crate::ephemeris::{ChartSnapshot, EphemerisError, PlanetPosition};
use crate::lifecycle::events::{sort_by_significance_then_orb, EventStatus, Placement, ReturnEvent};
use crate::orb::{return_number, signed_orb, OrbStatus};
use crate::reference::ReferenceTables;
use chrono::{DateTime, Utc};
use log::warn;

pub(crate) fn resolve<'a>(
    snapshot: &'a ChartSnapshot,
    body: Body,
) -> Result<&'a PlanetPosition, EphemerisError> {
    snapshot.position(body).ok_or(EphemerisError::BodyUnavailable {
        body,
        datetime: snapshot.datetime,
    })
}

/// Return event for one body, or `None` when the body is out of orb.
///
/// Fails only when either chart lacks the body.
pub fn calculate_return(
    body: Body,
    natal: &ChartSnapshot,
    current: &ChartSnapshot,
    age: f64,
    tables: &ReferenceTables,
) -> Result<Option<ReturnEvent>, EphemerisError> {
    let natal_position = resolve(natal, body)?;
    let transit_position = resolve(current, body)?;

    let orb = signed_orb(natal_position.lon, transit_position.lon);
    let orb_status = OrbStatus::classify(orb, tables.orb_tolerance(body));
    if !orb_status.is_active() {
        return Ok(None);
    }

    let Some(period) = tables.period(body) else {
        warn!("No orbital period for {}, cannot number its return", body);
        return Ok(None);
    };
    let cycle_number = return_number(age, period);

    Ok(Some(ReturnEvent {
        body,
        cycle_number,
        orb: Some(orb),
        orb_status: Some(orb_status),
        significance: tables.return_significance(body, cycle_number),
        age,
        years_until: 0.0,
        date: current.datetime,
        status: EventStatus::Active,
        placement: Some(Placement::new(natal_position, transit_position)),
        keywords: tables.keywords(body).to_vec(),
    }))
}

/// Active returns for every tracked body, most significant and tightest first.
///
/// Bodies missing from either chart are logged and skipped.
pub fn detect_returns(
    natal: &ChartSnapshot,
    current: &ChartSnapshot,
    birth: DateTime<Utc>,
    tables: &ReferenceTables,
) -> Vec<ReturnEvent> {
    let age = crate::time::age_in_years(birth, current.datetime);

    let mut active: Vec<ReturnEvent> = tables
        .tracked_returns
        .iter()
        .filter_map(|&body| match calculate_return(body, natal, current, age, tables) {
            Ok(event) => event,
            Err(e) => {
                warn!("Error calculating {} return: {}", body, e);
                None
            }
        })
        .collect();

    sort_by_significance_then_orb(&mut active, |e| (e.significance, e.orb));
    active
}
