//! Feed assembly: merge active and projected events, attach presentation
//! fields and compute the summary block.

use crate::lifecycle::events::{sort_active, EventStatus, LifecycleEvent};
use crate::lifecycle::milestones::{past_milestones, PastMilestone};
use crate::lifecycle::progressed::{PROGRESSED_MOON_INTERPRETATION, PROGRESSED_MOON_ORB, PROGRESSED_MOON_PERIOD_YEARS};
use crate::lifecycle::stages::{stage_for_age, LifecycleStage};
use crate::reference::ReferenceTables;
use crate::significance::Significance;
use crate::time::{days, DAYS_PER_YEAR};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn format_date(date: DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Calendar window around an event's exact date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

/// One event with its presentation fields.
#[derive(Debug, Clone, Serialize)]
pub struct FeedEntry {
    pub event_index: String,
    pub label: String,
    #[serde(flatten)]
    pub event: LifecycleEvent,
    pub exact_date: String,
    pub date_range: Option<DateRange>,
    pub interpretation: Option<String>,
}

/// The most imminent event in the feed.
#[derive(Debug, Clone, Serialize)]
pub struct NextEvent {
    pub event_index: String,
    pub label: String,
    pub status: EventStatus,
    pub date: String,
    pub years_until: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedSummary {
    pub current_age: f64,
    pub current_stage: LifecycleStage,
    pub active_event_count: usize,
    /// Critical events across both active and upcoming entries.
    pub critical_event_count: usize,
    /// Highest significance among active events.
    pub highest_significance: Option<Significance>,
    pub next_event: Option<NextEvent>,
    pub years_until_next: Option<f64>,
}

/// Request-scoped output of one detection pass.
#[derive(Debug, Clone, Serialize)]
pub struct EventFeed {
    pub birth: DateTime<Utc>,
    pub generated_for: DateTime<Utc>,
    /// Active entries first, then upcoming ones.
    pub events: Vec<FeedEntry>,
    pub past_milestones: Vec<PastMilestone>,
    pub summary: FeedSummary,
}

impl EventFeed {
    pub fn active(&self) -> impl Iterator<Item = &FeedEntry> {
        self.events.iter().filter(|e| e.event.status() == EventStatus::Active)
    }

    pub fn upcoming(&self) -> impl Iterator<Item = &FeedEntry> {
        self.events.iter().filter(|e| e.event.status() == EventStatus::Upcoming)
    }
}

/// Days either side of the exact date that the event stays within orb.
///
/// The body covers `360 / (period * 365.25)` degrees a day, so slow bodies
/// give wide windows and fast ones narrow windows.
pub fn orb_window_days(tolerance_deg: f64, period_years: f64) -> f64 {
    tolerance_deg.max(0.0) * period_years * DAYS_PER_YEAR / 360.0
}

fn window_days(event: &LifecycleEvent, tables: &ReferenceTables) -> Option<f64> {
    match event {
        LifecycleEvent::Return(e) => {
            let period = tables.period(e.body)?;
            Some(orb_window_days(tables.orb_tolerance(e.body), period))
        }
        LifecycleEvent::MajorTransit(e) => {
            let period = tables.period(e.transit.transit_body)?;
            Some(orb_window_days(e.transit.tolerance, period))
        }
        LifecycleEvent::ProgressedReturn(_) => Some(orb_window_days(PROGRESSED_MOON_ORB, PROGRESSED_MOON_PERIOD_YEARS)),
    }
}

fn interpretation(event: &LifecycleEvent, tables: &ReferenceTables) -> Option<String> {
    match event {
        LifecycleEvent::Return(e) => tables.interpretation(e.body, e.cycle_number).map(str::to_string),
        LifecycleEvent::MajorTransit(e) => Some(e.transit.description.clone()),
        LifecycleEvent::ProgressedReturn(_) => Some(PROGRESSED_MOON_INTERPRETATION.to_string()),
    }
}

fn entry(event: LifecycleEvent, tables: &ReferenceTables) -> FeedEntry {
    let date = event.date();
    let date_range = window_days(&event, tables).map(|window| DateRange {
        start: format_date(date - days(window)),
        end: format_date(date + days(window)),
    });

    FeedEntry {
        event_index: event.index(),
        label: event.label(),
        exact_date: format_date(date),
        date_range,
        interpretation: interpretation(&event, tables),
        event,
    }
}

/// Build the feed from detector output (`active`) and projector output
/// (`upcoming`, already sorted soonest first).
///
/// A projected event that is already active (same index) is dropped, so each
/// event appears once.
pub fn assemble_feed(
    mut active: Vec<LifecycleEvent>,
    mut upcoming: Vec<LifecycleEvent>,
    age: f64,
    birth: DateTime<Utc>,
    generated_for: DateTime<Utc>,
    tables: &ReferenceTables,
) -> EventFeed {
    sort_active(&mut active);

    let active_indices: HashSet<String> = active.iter().map(LifecycleEvent::index).collect();
    upcoming.retain(|event| !active_indices.contains(&event.index()));

    let active_event_count = active.len();
    let highest_significance = active.iter().map(LifecycleEvent::significance).min();

    let events: Vec<FeedEntry> = active
        .into_iter()
        .chain(upcoming)
        .map(|event| entry(event, tables))
        .collect();

    let critical_event_count = events
        .iter()
        .filter(|e| e.event.significance() == Significance::Critical)
        .count();

    // Active entries lead the list, so the first entry is the most imminent.
    let next_event = events.first().map(|e| NextEvent {
        event_index: e.event_index.clone(),
        label: e.label.clone(),
        status: e.event.status(),
        date: e.exact_date.clone(),
        years_until: e.event.years_until(),
    });
    let years_until_next = next_event.as_ref().map(|n| n.years_until);

    let current_stage = stage_for_age(&tables.lifecycle_stages, &tables.final_stage, age).clone();

    EventFeed {
        birth,
        generated_for,
        events,
        past_milestones: past_milestones(&tables.milestones, age),
        summary: FeedSummary {
            current_age: age,
            current_stage,
            active_event_count,
            critical_event_count,
            highest_significance,
            next_event,
            years_until_next,
        },
    }
}
