//! Age-bracket lookup for the human-readable lifecycle stage.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleStage {
    #[serde(rename = "stage_name")]
    pub label: String,
    pub description: String,
    pub min_age: f64,
    /// `None` for the open-ended final bucket.
    pub max_age: Option<f64>,
    pub themes: Vec<String>,
}

impl LifecycleStage {
    pub fn new(min_age: f64, max_age: Option<f64>, label: &str, description: &str, themes: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            description: description.to_string(),
            min_age,
            max_age,
            themes: themes.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn contains(&self, age: f64) -> bool {
        age >= self.min_age && self.max_age.map_or(true, |max| age < max)
    }
}

/// First stage whose `[min, max)` range holds `age`.
///
/// Ages past every range land in `beyond`; ages before the first range (only
/// possible with malformed input) land in the first stage.
pub fn stage_for_age<'a>(stages: &'a [LifecycleStage], beyond: &'a LifecycleStage, age: f64) -> &'a LifecycleStage {
    if let Some(stage) = stages.iter().find(|stage| stage.contains(age)) {
        return stage;
    }
    match stages.first() {
        Some(first) if age < first.min_age => first,
        _ => beyond,
    }
}

pub(crate) fn standard_stages() -> Vec<LifecycleStage> {
    vec![
        LifecycleStage::new(0.0, Some(12.0), "Childhood", "Foundation building and early development", &["learning", "growth", "discovery"]),
        LifecycleStage::new(12.0, Some(18.0), "First Jupiter Return & Adolescence", "Expansion of identity and coming of age", &["identity", "independence", "exploration"]),
        LifecycleStage::new(18.0, Some(25.0), "Early Adulthood", "Independence and self-discovery", &["freedom", "experimentation", "relationships"]),
        LifecycleStage::new(25.0, Some(29.0), "Chiron Opposition Period", "First major wound healing crisis", &["healing", "vulnerability", "teaching"]),
        LifecycleStage::new(29.0, Some(31.0), "Saturn Return", "Karmic maturation and life restructuring", &["responsibility", "maturity", "commitment"]),
        LifecycleStage::new(31.0, Some(36.0), "Post-Saturn Return", "Building authentic path", &["clarity", "purpose", "manifestation"]),
        LifecycleStage::new(36.0, Some(38.0), "Pluto Square", "Deep transformation and power recalibration", &["transformation", "power", "rebirth"]),
        LifecycleStage::new(38.0, Some(41.0), "Neptune Square", "Spiritual crisis or awakening", &["spirituality", "faith", "illusion"]),
        LifecycleStage::new(41.0, Some(43.0), "Uranus Opposition", "Midlife awakening and liberation", &["freedom", "authenticity", "revolution"]),
        LifecycleStage::new(43.0, Some(50.0), "Mature Adulthood", "Integration of wisdom", &["mastery", "teaching", "legacy"]),
        LifecycleStage::new(50.0, Some(58.0), "Chiron Return Period", "Emergence as wounded healer", &["healing", "wisdom", "service"]),
        LifecycleStage::new(58.0, Some(60.0), "Second Saturn Return", "Elder wisdom and life review", &["wisdom", "legacy", "completion"]),
        LifecycleStage::new(60.0, Some(120.0), "Elder Years", "Wisdom sharing and legacy building", &["teaching", "legacy", "integration"]),
    ]
}

pub(crate) fn standard_final_stage() -> LifecycleStage {
    LifecycleStage::new(120.0, None, "Elder Years", "Wisdom sharing and legacy building", &["teaching", "legacy", "integration"])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_boundaries() {
        let stages = standard_stages();
        let beyond = standard_final_stage();

        assert_eq!(stage_for_age(&stages, &beyond, 0.0).label, "Childhood");
        assert_eq!(stage_for_age(&stages, &beyond, 11.99).label, "Childhood");
        assert_eq!(stage_for_age(&stages, &beyond, 12.0).label, "First Jupiter Return & Adolescence");
        assert_eq!(stage_for_age(&stages, &beyond, 29.5).label, "Saturn Return");
        assert_eq!(stage_for_age(&stages, &beyond, 41.2).label, "Uranus Opposition");
    }

    #[test]
    fn test_ages_past_last_range_use_open_bucket() {
        let stages = standard_stages();
        let beyond = standard_final_stage();

        let stage = stage_for_age(&stages, &beyond, 130.0);
        assert_eq!(stage.label, "Elder Years");
        assert_eq!(stage.max_age, None);
    }

    #[test]
    fn test_negative_age_clamps_to_first_stage() {
        let stages = standard_stages();
        let beyond = standard_final_stage();
        assert_eq!(stage_for_age(&stages, &beyond, -1.0).label, "Childhood");
    }
}
