//! Future event projection from orbital periods and typical transit ages.
//!
//! Projected dates are always `birth + predicted_age`; deriving them from
//! `birth + years_until` collapses every prediction toward the birth date.

use crate::aspects::aspect_orb;
use crate::bodies::Body;
use crate::ephemeris::ChartSnapshot;
use crate::lifecycle::events::{sort_upcoming, EventStatus, LifecycleEvent, ReturnEvent, TransitEvent};
use crate::lifecycle::returns::resolve;
use crate::orb::{cycle_number, signed_orb, OrbStatus};
use crate::reference::{MajorTransit, ReferenceTables};
use crate::time::date_at_age;
use chrono::{DateTime, Utc};
use log::debug;

/// Next return of `body` after `age`. `None` when the body has no period.
pub fn predict_next_return(
    body: Body,
    age: f64,
    birth: DateTime<Utc>,
    tables: &ReferenceTables,
) -> Option<ReturnEvent> {
    let period = tables.period(body)?;
    let cycle = cycle_number(age, period);
    let predicted_age = cycle as f64 * period;

    Some(ReturnEvent {
        body,
        cycle_number: cycle,
        orb: None,
        orb_status: None,
        significance: tables.return_significance(body, cycle),
        age: predicted_age,
        years_until: predicted_age - age,
        date: date_at_age(birth, predicted_age),
        status: EventStatus::Upcoming,
        placement: None,
        keywords: tables.keywords(body).to_vec(),
    })
}

/// Projection of a major transit. `None` once the age window has closed.
///
/// Inside the window the event is due now: `years_until` is 0 and the date is
/// the current one.
pub fn predict_major_transit(transit: &MajorTransit, age: f64, birth: DateTime<Utc>) -> Option<TransitEvent> {
    if age >= transit.age_window.max {
        return None;
    }

    let (event_age, years_until) = if transit.age_window.contains(age) {
        (age, 0.0)
    } else {
        (transit.typical_age, (transit.typical_age - age).max(0.0))
    };

    Some(TransitEvent {
        transit: transit.clone(),
        orb: None,
        orb_status: None,
        significance: transit.significance,
        age: event_age,
        years_until,
        date: date_at_age(birth, event_age),
        status: EventStatus::Upcoming,
        placement: None,
    })
}

/// Upcoming returns and transits within `horizon_years`, soonest first,
/// truncated to `max_events`.
pub fn build_future_timeline(
    age: f64,
    birth: DateTime<Utc>,
    tables: &ReferenceTables,
    horizon_years: f64,
    max_events: usize,
) -> Vec<LifecycleEvent> {
    let returns = tables
        .tracked_returns
        .iter()
        .filter_map(|&body| predict_next_return(body, age, birth, tables))
        .filter(|event| event.years_until > 0.0 && event.age <= age + horizon_years)
        .map(LifecycleEvent::Return);

    let transits = tables
        .major_transits
        .iter()
        .filter_map(|transit| predict_major_transit(transit, age, birth))
        .filter(|event| event.years_until <= horizon_years)
        .map(LifecycleEvent::MajorTransit);

    let mut timeline: Vec<LifecycleEvent> = returns.chain(transits).collect();
    sort_upcoming(&mut timeline);
    timeline.truncate(max_events);
    timeline
}

/// Fill in the present-moment orb of projected events against the live chart.
///
/// This is the current distance to the target, not a solve for the exact date.
/// Events whose bodies cannot be resolved keep `orb: None`.
pub fn enrich_current_orbs(
    events: &mut [LifecycleEvent],
    natal: &ChartSnapshot,
    current: &ChartSnapshot,
    tables: &ReferenceTables,
) {
    for event in events.iter_mut() {
        match event {
            LifecycleEvent::Return(e) => {
                let (Ok(natal_pos), Ok(current_pos)) = (resolve(natal, e.body), resolve(current, e.body)) else {
                    debug!("No current orb for {} return", e.body);
                    continue;
                };
                let orb = signed_orb(natal_pos.lon, current_pos.lon);
                e.orb = Some(orb);
                e.orb_status = Some(OrbStatus::classify(orb, tables.orb_tolerance(e.body)));
            }
            LifecycleEvent::MajorTransit(e) => {
                let (Ok(natal_pos), Ok(current_pos)) =
                    (resolve(natal, e.transit.natal_body), resolve(current, e.transit.transit_body))
                else {
                    debug!("No current orb for {}", e.transit.name);
                    continue;
                };
                let orb = aspect_orb(natal_pos.lon, current_pos.lon, e.transit.aspect);
                e.orb = Some(orb);
                e.orb_status = Some(OrbStatus::classify(orb, e.transit.tolerance));
            }
            LifecycleEvent::ProgressedReturn(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::PlanetPosition;
    use crate::time::DAYS_PER_YEAR;
    use chrono::TimeZone;

    fn birth() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1990, 1, 15, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_next_saturn_return_date_from_birth() {
        let tables = ReferenceTables::standard();
        let event = predict_next_return(Body::Saturn, 22.0, birth(), &tables).unwrap();

        assert_eq!(event.cycle_number, 1);
        assert!((event.age - 29.46).abs() < 1e-9);
        assert!((event.years_until - 7.46).abs() < 1e-9);
        assert_eq!(event.date.format("%Y-%m-%d").to_string(), "2019-07-02");

        let elapsed_days = (event.date - birth()).num_seconds() as f64 / 86_400.0;
        assert!((elapsed_days - 29.46 * DAYS_PER_YEAR).abs() < 1.0);
    }

    #[test]
    fn test_cycle_advances_exactly_at_return_age() {
        let tables = ReferenceTables::standard();
        let event = predict_next_return(Body::Saturn, 29.46, birth(), &tables).unwrap();
        assert_eq!(event.cycle_number, 2);
        assert!((event.years_until - 29.46).abs() < 1e-9);
    }

    #[test]
    fn test_transit_projection_phases() {
        let tables = ReferenceTables::standard();
        let uranus = &tables.major_transits[0];

        let ahead = predict_major_transit(uranus, 30.0, birth()).unwrap();
        assert!((ahead.years_until - 11.0).abs() < 1e-9);
        assert_eq!(ahead.date, date_at_age(birth(), 41.0));

        let inside = predict_major_transit(uranus, 41.7, birth()).unwrap();
        assert_eq!(inside.years_until, 0.0);
        assert_eq!(inside.date, date_at_age(birth(), 41.7));

        assert!(predict_major_transit(uranus, 43.0, birth()).is_none());
        assert!(predict_major_transit(uranus, 44.0, birth()).is_none());
    }

    #[test]
    fn test_timeline_sorted_filtered_and_capped() {
        let tables = ReferenceTables::standard();
        let timeline = build_future_timeline(22.0, birth(), &tables, 20.0, 10);

        assert!(!timeline.is_empty());
        assert!(timeline.len() <= 10);
        for pair in timeline.windows(2) {
            assert!(pair[0].years_until() <= pair[1].years_until());
        }
        for event in &timeline {
            assert!(event.years_until() <= 20.0);
            assert_eq!(event.status(), EventStatus::Upcoming);
        }

        let capped = build_future_timeline(22.0, birth(), &tables, 20.0, 3);
        assert_eq!(capped.len(), 3);
        assert_eq!(capped[0].index(), timeline[0].index());
    }

    #[test]
    fn test_enrichment_leaves_unresolved_bodies_empty() {
        let tables = ReferenceTables::standard();
        let natal = ChartSnapshot::new(birth()).with_position(Body::Saturn, PlanetPosition::new(125.0, 0.0, 0.03));
        let current = ChartSnapshot::new(date_at_age(birth(), 22.0))
            .with_position(Body::Saturn, PlanetPosition::new(35.0, 0.0, 0.03));

        let mut timeline = build_future_timeline(22.0, birth(), &tables, 20.0, 10);
        enrich_current_orbs(&mut timeline, &natal, &current, &tables);

        for event in &timeline {
            match event {
                LifecycleEvent::Return(e) if e.body == Body::Saturn => {
                    assert!((e.orb.unwrap() + 90.0).abs() < 1e-9);
                    assert_eq!(e.orb_status, Some(OrbStatus::Inactive));
                }
                other => assert!(other.orb().is_none()),
            }
        }
    }
}
