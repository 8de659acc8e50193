//! Lifecycle cycle analysis: returns, major transits, projections and the
//! ranked event feed built from them.

pub mod events;
pub mod feed;
pub mod milestones;
pub mod progressed;
pub mod returns;
pub mod stages;
pub mod timeline;
pub mod transits;

pub use events::{EventStatus, LifecycleEvent, Placement, ReturnEvent, TransitEvent};
pub use feed::{assemble_feed, DateRange, EventFeed, FeedEntry, FeedSummary, NextEvent};
pub use milestones::{past_milestones, PastMilestone};
pub use progressed::detect_progressed_moon_return;
pub use returns::{calculate_return, detect_returns};
pub use stages::{stage_for_age, LifecycleStage};
pub use timeline::{build_future_timeline, enrich_current_orbs, predict_major_transit, predict_next_return};
pub use transits::{check_major_transit, detect_major_transits};

use crate::ephemeris::{ChartProvider, ChartSnapshot, EphemerisError, GeoLocation};
use crate::reference::ReferenceTables;
use crate::time::{age_in_years, progressed_datetime};
use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Knobs for one detection pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionOptions {
    pub include_future: bool,
    pub future_years: f64,
    pub max_future_events: usize,
    /// Attach the present-moment orb to projected events.
    pub enrich_current_orbs: bool,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            include_future: true,
            future_years: 20.0,
            max_future_events: 10,
            enrich_current_orbs: true,
        }
    }
}

/// Runs the detectors and the projector over a set of charts and assembles
/// the feed.
pub struct LifecycleDetector {
    tables: ReferenceTables,
    options: DetectionOptions,
}

impl LifecycleDetector {
    pub fn new(tables: ReferenceTables, options: DetectionOptions) -> Self {
        Self { tables, options }
    }

    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    pub fn options(&self) -> &DetectionOptions {
        &self.options
    }

    /// Detect against prepared snapshots. `progressed` is the secondary-progressed
    /// chart; without it no progressed return is reported.
    pub fn detect(
        &self,
        natal: &ChartSnapshot,
        current: &ChartSnapshot,
        progressed: Option<&ChartSnapshot>,
        birth: DateTime<Utc>,
    ) -> EventFeed {
        let age = age_in_years(birth, current.datetime);
        info!("Detecting lifecycle events for age {:.1}", age);

        let mut active: Vec<LifecycleEvent> = detect_returns(natal, current, birth, &self.tables)
            .into_iter()
            .map(LifecycleEvent::Return)
            .collect();
        active.extend(
            detect_major_transits(natal, current, birth, &self.tables)
                .into_iter()
                .map(LifecycleEvent::MajorTransit),
        );

        if let Some(progressed) = progressed {
            match detect_progressed_moon_return(natal, progressed, age, current.datetime) {
                Ok(Some(event)) => active.push(LifecycleEvent::ProgressedReturn(event)),
                Ok(None) => {}
                Err(e) => warn!("Progressed Moon calculation failed: {}", e),
            }
        }

        let mut upcoming = Vec::new();
        if self.options.include_future {
            upcoming = build_future_timeline(
                age,
                birth,
                &self.tables,
                self.options.future_years,
                self.options.max_future_events,
            );
            if self.options.enrich_current_orbs {
                enrich_current_orbs(&mut upcoming, natal, current, &self.tables);
            }
        }

        let feed = assemble_feed(active, upcoming, age, birth, current.datetime, &self.tables);
        info!(
            "Lifecycle detection complete: {} active, {} upcoming events",
            feed.summary.active_event_count,
            feed.events.len() - feed.summary.active_event_count
        );
        feed
    }

    /// Build natal, current and progressed charts through `provider`, then detect.
    ///
    /// Natal and current charts are required; a failed progressed chart only
    /// drops the progressed return.
    pub fn detect_from_provider<P: ChartProvider + ?Sized>(
        &self,
        provider: &mut P,
        birth: DateTime<Utc>,
        at: DateTime<Utc>,
        location: Option<&GeoLocation>,
    ) -> Result<EventFeed, EphemerisError> {
        let natal = provider.chart_at(birth, location)?;
        let current = provider.chart_at(at, location)?;
        let progressed = match provider.chart_at(progressed_datetime(birth, at), location) {
            Ok(chart) => Some(chart),
            Err(e) => {
                warn!("Progressed chart unavailable: {}", e);
                None
            }
        };

        Ok(self.detect(&natal, &current, progressed.as_ref(), birth))
    }
}

impl Default for LifecycleDetector {
    fn default() -> Self {
        Self::new(ReferenceTables::standard(), DetectionOptions::default())
    }
}
