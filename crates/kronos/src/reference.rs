//! Bundled reference data: orbital periods, orb tolerances, significance,
//! keywords, interpretations, major transits, lifecycle stages and milestones.
//!
//! The tables are built once and handed to every detection call; nothing in
//! here is mutated after construction.

use crate::aspects::AspectKind;
use crate::bodies::Body;
use crate::lifecycle::stages::{standard_final_stage, standard_stages, LifecycleStage};
use crate::significance::{Significance, SignificanceTable};
use serde::{Deserialize, Serialize};

/// Orb tolerance used when a body has no profile.
pub const DEFAULT_RETURN_TOLERANCE: f64 = 2.0;

/// Interpretation text keyed by return cycle, with a fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InterpretationTable {
    pub default: Option<String>,
    #[serde(default)]
    pub cycles: Vec<(u32, String)>,
}

impl InterpretationTable {
    fn new(default: &str, cycles: &[(u32, &str)]) -> Self {
        Self {
            default: Some(default.to_string()),
            cycles: cycles.iter().map(|(c, text)| (*c, text.to_string())).collect(),
        }
    }

    pub fn for_cycle(&self, cycle: u32) -> Option<&str> {
        self.cycles
            .iter()
            .find(|(c, _)| *c == cycle)
            .map(|(_, text)| text.as_str())
            .or(self.default.as_deref())
    }
}

/// Immutable per-body reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyProfile {
    pub body: Body,
    pub period_years: f64,
    pub orb_tolerance: f64,
    pub keywords: Vec<String>,
    pub significance: SignificanceTable,
    #[serde(default)]
    pub interpretations: InterpretationTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeWindow {
    pub min: f64,
    pub max: f64,
}

impl AgeWindow {
    pub fn contains(&self, age: f64) -> bool {
        age >= self.min && age <= self.max
    }
}

/// A once-per-life developmental aspect between a transiting and a natal body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MajorTransit {
    pub name: String,
    pub natal_body: Body,
    pub transit_body: Body,
    pub aspect: AspectKind,
    /// Orb tolerance for this transit, independent of return tolerances.
    pub tolerance: f64,
    pub typical_age: f64,
    pub age_window: AgeWindow,
    pub significance: Significance,
    pub keywords: Vec<String>,
    pub description: String,
}

impl MajorTransit {
    /// Stable upper-snake identifier, e.g. `URANUS_OPPOSITION`.
    pub fn index(&self) -> String {
        self.name.to_uppercase().replace([' ', '-'], "_")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    Return,
    MajorTransit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
    pub kind: MilestoneKind,
    pub typical_age: f64,
}

/// All reference data for a detection pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceTables {
    pub bodies: Vec<BodyProfile>,
    /// Bodies whose returns are detected and projected, in evaluation order.
    pub tracked_returns: Vec<Body>,
    pub major_transits: Vec<MajorTransit>,
    pub lifecycle_stages: Vec<LifecycleStage>,
    pub final_stage: LifecycleStage,
    pub milestones: Vec<Milestone>,
}

lazy_static::lazy_static! {
    static ref STANDARD_TABLES: ReferenceTables = build_standard_tables();
}

impl ReferenceTables {
    /// The bundled tables.
    pub fn standard() -> Self {
        STANDARD_TABLES.clone()
    }

    pub fn profile(&self, body: Body) -> Option<&BodyProfile> {
        self.bodies.iter().find(|p| p.body == body)
    }

    pub fn period(&self, body: Body) -> Option<f64> {
        self.profile(body).map(|p| p.period_years)
    }

    pub fn orb_tolerance(&self, body: Body) -> f64 {
        self.profile(body)
            .map(|p| p.orb_tolerance)
            .unwrap_or(DEFAULT_RETURN_TOLERANCE)
    }

    pub fn return_significance(&self, body: Body, cycle: u32) -> Significance {
        self.profile(body)
            .map(|p| p.significance.for_cycle(cycle))
            .unwrap_or(Significance::Moderate)
    }

    pub fn keywords(&self, body: Body) -> &[String] {
        self.profile(body).map(|p| p.keywords.as_slice()).unwrap_or(&[])
    }

    pub fn interpretation(&self, body: Body, cycle: u32) -> Option<&str> {
        self.profile(body).and_then(|p| p.interpretations.for_cycle(cycle))
    }

    /// Override one body's orb tolerance. Negative values are clamped to 0.
    pub fn with_orb_tolerance(mut self, body: Body, tolerance: f64) -> Self {
        if let Some(profile) = self.bodies.iter_mut().find(|p| p.body == body) {
            profile.orb_tolerance = tolerance.max(0.0);
        }
        self
    }

    pub fn with_tracked_returns(mut self, bodies: Vec<Body>) -> Self {
        self.tracked_returns = bodies;
        self
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn profile(
    body: Body,
    period_years: f64,
    orb_tolerance: f64,
    keywords: &[&str],
    significance: SignificanceTable,
    interpretations: InterpretationTable,
) -> BodyProfile {
    BodyProfile {
        body,
        period_years,
        orb_tolerance,
        keywords: words(keywords),
        significance,
        interpretations,
    }
}

fn build_standard_tables() -> ReferenceTables {
    use Significance::*;

    let bodies = vec![
        profile(
            Body::Sun,
            1.0,
            0.5,
            &["identity", "vitality", "new year", "birthday", "self-expression"],
            SignificanceTable::flat(Moderate),
            InterpretationTable::new("Solar Return - a fresh yearly theme for identity and vitality.", &[]),
        ),
        profile(
            Body::Moon,
            0.0747,
            2.0,
            &["emotions", "instincts", "cycles", "home", "nurturing"],
            SignificanceTable::flat(Low),
            InterpretationTable::new("Lunar Return - monthly emotional check-in and reset.", &[]),
        ),
        profile(
            Body::Mercury,
            0.24,
            1.0,
            &["communication", "learning", "connections", "commerce"],
            SignificanceTable::flat(Low),
            InterpretationTable::default(),
        ),
        profile(
            Body::Venus,
            0.615,
            1.0,
            &["love", "values", "beauty", "harmony", "pleasure"],
            SignificanceTable::flat(Low),
            InterpretationTable::default(),
        ),
        profile(
            Body::Mars,
            1.88,
            1.0,
            &["action", "energy", "desire", "courage", "assertion"],
            SignificanceTable::flat(Moderate),
            InterpretationTable::new("Mars Return - reboot of motivation, courage, and how you assert your will.", &[]),
        ),
        profile(
            Body::Jupiter,
            11.86,
            2.0,
            &["luck", "expansion", "belief", "wisdom", "opportunity", "growth"],
            SignificanceTable::with_cycles(Moderate, &[(1, High), (2, High), (3, High), (4, High)]),
            InterpretationTable::new(
                "Jupiter expansion phase bringing fresh wisdom, abundance, and faith.",
                &[
                    (1, "First Jupiter Return - rite of passage expanding belief systems and opportunities."),
                    (2, "Second Jupiter Return - new growth cycle in adulthood and renewed optimism."),
                ],
            ),
        ),
        profile(
            Body::Saturn,
            29.46,
            1.5,
            &["maturity", "responsibility", "karma", "restructuring", "mastery", "limits"],
            SignificanceTable::with_cycles(High, &[(1, Critical), (2, Critical), (3, Critical)]),
            InterpretationTable::new(
                "Saturnian restructuring phase demanding responsibility and integrity.",
                &[
                    (1, "First major Saturn Return - maturation, accountability, and restructuring."),
                    (2, "Second Saturn Return - elder mastery, legacy review, and completion of long cycles."),
                    (3, "Third Saturn Return - wisdom keeper threshold and preparation for spiritual legacy."),
                ],
            ),
        ),
        profile(
            Body::Uranus,
            83.75,
            1.5,
            &["freedom", "rebellion", "innovation", "awakening", "revolution", "change"],
            SignificanceTable::with_cycles(Moderate, &[(1, Critical)]),
            InterpretationTable::new(
                "Uranian cycle prompting liberation and innovation.",
                &[(1, "Uranus Return - revolutionary reinvention of identity and destiny.")],
            ),
        ),
        profile(
            Body::Neptune,
            164.79,
            1.5,
            &["spirituality", "dreams", "illusion", "surrender", "transcendence", "compassion"],
            SignificanceTable::flat(Moderate),
            InterpretationTable::new("Neptunian cycle encouraging surrender, compassion, and imagination.", &[]),
        ),
        profile(
            Body::Pluto,
            247.94,
            1.5,
            &["transformation", "power", "death/rebirth", "depths", "regeneration", "intensity"],
            SignificanceTable::with_cycles(Moderate, &[(1, Critical)]),
            InterpretationTable::new("Plutonian metamorphosis requiring total honesty and regeneration.", &[]),
        ),
        profile(
            Body::Chiron,
            50.67,
            1.0,
            &["healing", "wounds", "wisdom", "wholeness", "teacher", "wounded healer"],
            SignificanceTable::with_cycles(Moderate, &[(1, High)]),
            InterpretationTable::new(
                "Chiron cycle emphasizing healing, wholeness, and mentorship.",
                &[(1, "Chiron Return - integration of the wounded healer archetype at midlife.")],
            ),
        ),
        profile(
            Body::NorthNode,
            18.6,
            1.0,
            &["soul growth", "destiny", "evolution", "purpose", "future direction"],
            SignificanceTable::with_cycles(Moderate, &[(1, High), (2, High), (3, High)]),
            InterpretationTable::new(
                "Nodal Return - reminders to lean into your evolutionary edge.",
                &[
                    (1, "First Nodal Return - alignment with soul mission and destiny pivot."),
                    (2, "Second Nodal Return - recalibration of karmic path and life direction."),
                ],
            ),
        ),
        profile(
            Body::SouthNode,
            18.6,
            1.0,
            &["past patterns", "release", "karma", "comfort zone", "letting go"],
            SignificanceTable::flat(Moderate),
            InterpretationTable::default(),
        ),
    ];

    let major_transits = vec![
        MajorTransit {
            name: "Uranus Opposition".to_string(),
            natal_body: Body::Uranus,
            transit_body: Body::Uranus,
            aspect: AspectKind::Opposition,
            tolerance: AspectKind::Opposition.default_tolerance(),
            typical_age: 41.0,
            age_window: AgeWindow { min: 40.0, max: 43.0 },
            significance: Critical,
            keywords: words(&["midlife", "freedom", "awakening", "revolution", "liberation", "authenticity"]),
            description: "Uranus opposes natal Uranus. The classic 'midlife crisis' transit. \
                          A powerful awakening to personal freedom and authentic self-expression."
                .to_string(),
        },
        MajorTransit {
            name: "Neptune Square".to_string(),
            natal_body: Body::Neptune,
            transit_body: Body::Neptune,
            aspect: AspectKind::Square,
            tolerance: AspectKind::Square.default_tolerance(),
            typical_age: 39.0,
            age_window: AgeWindow { min: 38.0, max: 41.0 },
            significance: Critical,
            keywords: words(&["spirituality", "confusion", "faith", "illusion", "surrender", "compassion"]),
            description: "Neptune squares natal Neptune. A spiritual crisis or awakening. \
                          Confrontation with illusion vs reality, requiring faith and surrender."
                .to_string(),
        },
        MajorTransit {
            name: "Pluto Square".to_string(),
            natal_body: Body::Pluto,
            transit_body: Body::Pluto,
            aspect: AspectKind::Square,
            tolerance: AspectKind::Square.default_tolerance(),
            typical_age: 36.0,
            age_window: AgeWindow { min: 35.0, max: 38.0 },
            significance: Critical,
            keywords: words(&["transformation", "power", "crisis", "rebirth", "intensity", "depth"]),
            description: "Pluto squares natal Pluto. Deep personal transformation and power recalibration. \
                          Often involves crisis that leads to profound rebirth."
                .to_string(),
        },
        MajorTransit {
            name: "Chiron Opposition".to_string(),
            natal_body: Body::Chiron,
            transit_body: Body::Chiron,
            aspect: AspectKind::Opposition,
            tolerance: AspectKind::Opposition.default_tolerance(),
            typical_age: 25.0,
            age_window: AgeWindow { min: 24.0, max: 27.0 },
            significance: High,
            keywords: words(&["healing", "vulnerability", "medicine person", "wisdom", "teacher", "wounds"]),
            description: "Chiron opposes natal Chiron. First major wound healing crisis. \
                          Potential emergence as wounded healer and teacher."
                .to_string(),
        },
    ];

    let milestones = [
        ("First Jupiter Return", MilestoneKind::Return, 12.0),
        ("First Nodal Return", MilestoneKind::Return, 18.0),
        ("Second Jupiter Return", MilestoneKind::Return, 24.0),
        ("Chiron Opposition", MilestoneKind::MajorTransit, 25.0),
        ("First Saturn Return", MilestoneKind::Return, 29.0),
        ("Pluto Square", MilestoneKind::MajorTransit, 36.0),
        ("Neptune Square", MilestoneKind::MajorTransit, 39.0),
        ("Uranus Opposition", MilestoneKind::MajorTransit, 41.0),
        ("Chiron Return", MilestoneKind::Return, 50.0),
        ("Second Saturn Return", MilestoneKind::Return, 58.0),
    ]
    .iter()
    .map(|(name, kind, typical_age)| Milestone {
        name: name.to_string(),
        kind: *kind,
        typical_age: *typical_age,
    })
    .collect();

    ReferenceTables {
        bodies,
        tracked_returns: vec![
            Body::Mars,
            Body::Jupiter,
            Body::Saturn,
            Body::Chiron,
            Body::NorthNode,
            Body::Uranus,
            Body::Neptune,
            Body::Pluto,
        ],
        major_transits,
        lifecycle_stages: standard_stages(),
        final_stage: standard_final_stage(),
        milestones,
    }
}
