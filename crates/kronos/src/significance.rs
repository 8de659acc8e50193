use serde::{Deserialize, Serialize};
use std::fmt;

/// Importance tier of a lifecycle event. Ordered most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Significance {
    Critical,
    High,
    Moderate,
    Low,
}

impl Significance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Significance::Critical => "CRITICAL",
            Significance::High => "HIGH",
            Significance::Moderate => "MODERATE",
            Significance::Low => "LOW",
        }
    }
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-body significance with optional per-cycle overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignificanceTable {
    pub default: Significance,
    #[serde(default)]
    pub cycles: Vec<(u32, Significance)>,
}

impl SignificanceTable {
    pub fn flat(default: Significance) -> Self {
        Self {
            default,
            cycles: Vec::new(),
        }
    }

    pub fn with_cycles(default: Significance, cycles: &[(u32, Significance)]) -> Self {
        Self {
            default,
            cycles: cycles.to_vec(),
        }
    }

    pub fn for_cycle(&self, cycle: u32) -> Significance {
        self.cycles
            .iter()
            .find(|(c, _)| *c == cycle)
            .map(|(_, significance)| *significance)
            .unwrap_or(self.default)
    }
}
