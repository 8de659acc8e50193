//! Lifecycle event records shared by the detectors, the projector and the feed.

use crate::bodies::Body;
use crate::ephemeris::{PlanetPosition, ZodiacSign};
use crate::orb::OrbStatus;
use crate::reference::MajorTransit;
use crate::significance::Significance;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// In orb right now.
    Active,
    /// Projected from orbital periods or typical ages.
    Upcoming,
}

/// Natal and transiting longitudes behind an orb.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub natal_longitude: f64,
    pub transit_longitude: f64,
    pub natal_sign: ZodiacSign,
    pub transit_sign: ZodiacSign,
}

impl Placement {
    pub fn new(natal: &PlanetPosition, transit: &PlanetPosition) -> Self {
        Self {
            natal_longitude: natal.lon,
            transit_longitude: transit.lon,
            natal_sign: natal.sign,
            transit_sign: transit.sign,
        }
    }
}

/// A body returning to its own natal longitude.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnEvent {
    pub body: Body,
    pub cycle_number: u32,
    /// Signed orb; for upcoming events this is the present-moment orb, if known.
    pub orb: Option<f64>,
    pub orb_status: Option<OrbStatus>,
    pub significance: Significance,
    /// Age at the event: current age when active, predicted age when upcoming.
    pub age: f64,
    pub years_until: f64,
    pub date: DateTime<Utc>,
    pub status: EventStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
    pub keywords: Vec<String>,
}

/// A configured major transit (square/opposition to a natal body).
#[derive(Debug, Clone, Serialize)]
pub struct TransitEvent {
    pub transit: MajorTransit,
    pub orb: Option<f64>,
    pub orb_status: Option<OrbStatus>,
    pub significance: Significance,
    pub age: f64,
    pub years_until: f64,
    pub date: DateTime<Utc>,
    pub status: EventStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
}

/// Every event kind the feed can carry.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LifecycleEvent {
    Return(ReturnEvent),
    MajorTransit(TransitEvent),
    ProgressedReturn(ReturnEvent),
}

impl LifecycleEvent {
    pub fn significance(&self) -> Significance {
        match self {
            LifecycleEvent::Return(e) | LifecycleEvent::ProgressedReturn(e) => e.significance,
            LifecycleEvent::MajorTransit(e) => e.significance,
        }
    }

    pub fn orb(&self) -> Option<f64> {
        match self {
            LifecycleEvent::Return(e) | LifecycleEvent::ProgressedReturn(e) => e.orb,
            LifecycleEvent::MajorTransit(e) => e.orb,
        }
    }

    pub fn years_until(&self) -> f64 {
        match self {
            LifecycleEvent::Return(e) | LifecycleEvent::ProgressedReturn(e) => e.years_until,
            LifecycleEvent::MajorTransit(e) => e.years_until,
        }
    }

    pub fn status(&self) -> EventStatus {
        match self {
            LifecycleEvent::Return(e) | LifecycleEvent::ProgressedReturn(e) => e.status,
            LifecycleEvent::MajorTransit(e) => e.status,
        }
    }

    pub fn date(&self) -> DateTime<Utc> {
        match self {
            LifecycleEvent::Return(e) | LifecycleEvent::ProgressedReturn(e) => e.date,
            LifecycleEvent::MajorTransit(e) => e.date,
        }
    }

    /// Human-readable title, e.g. "Saturn Return" or "Pluto Square".
    pub fn label(&self) -> String {
        match self {
            LifecycleEvent::Return(e) => format!("{} Return", e.body),
            LifecycleEvent::ProgressedReturn(e) => format!("Progressed {} Return", e.body),
            LifecycleEvent::MajorTransit(e) => e.transit.name.clone(),
        }
    }

    /// Stable identifier, e.g. `SATURN_RETURN_C1`.
    pub fn index(&self) -> String {
        match self {
            LifecycleEvent::Return(e) => {
                format!("{}_RETURN_C{}", e.body.id().to_uppercase(), e.cycle_number)
            }
            LifecycleEvent::ProgressedReturn(e) => {
                format!("PROGRESSED_{}_RETURN_C{}", e.body.id().to_uppercase(), e.cycle_number)
            }
            LifecycleEvent::MajorTransit(e) => e.transit.index(),
        }
    }
}

fn abs_orb_or_max(orb: Option<f64>) -> f64 {
    orb.map(f64::abs).unwrap_or(f64::MAX)
}

/// Significance rank first, then ascending |orb|. Stable.
pub fn sort_by_significance_then_orb<T, F>(events: &mut [T], key: F)
where
    F: Fn(&T) -> (Significance, Option<f64>),
{
    events.sort_by(|a, b| {
        let (sig_a, orb_a) = key(a);
        let (sig_b, orb_b) = key(b);
        sig_a
            .cmp(&sig_b)
            .then_with(|| abs_orb_or_max(orb_a).total_cmp(&abs_orb_or_max(orb_b)))
    });
}

/// Ordering for active events in the feed.
pub fn sort_active(events: &mut [LifecycleEvent]) {
    sort_by_significance_then_orb(events, |e| (e.significance(), e.orb()));
}

/// Ordering for projected events: soonest first, then significance.
pub fn sort_upcoming(events: &mut [LifecycleEvent]) {
    events.sort_by(|a, b| {
        a.years_until()
            .total_cmp(&b.years_until())
            .then_with(|| a.significance().cmp(&b.significance()))
    });
}
