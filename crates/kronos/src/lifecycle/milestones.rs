use crate::reference::{Milestone, MilestoneKind};
use serde::Serialize;

/// A milestone counts as behind the subject one year after its typical age.
const PAST_MARGIN_YEARS: f64 = 1.0;

#[derive(Debug, Clone, Serialize)]
pub struct PastMilestone {
    pub name: String,
    pub kind: MilestoneKind,
    pub typical_age: f64,
    pub years_ago: f64,
}

/// Milestones already lived through at `age`, oldest first.
pub fn past_milestones(milestones: &[Milestone], age: f64) -> Vec<PastMilestone> {
    let mut past: Vec<PastMilestone> = milestones
        .iter()
        .filter(|m| age > m.typical_age + PAST_MARGIN_YEARS)
        .map(|m| PastMilestone {
            name: m.name.clone(),
            kind: m.kind,
            typical_age: m.typical_age,
            years_ago: age - m.typical_age,
        })
        .collect();
    past.sort_by(|a, b| a.typical_age.total_cmp(&b.typical_age));
    past
}
