use serde::{Deserialize, Serialize};

/// Aspects used by the major-transit table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectKind {
    Square,
    Opposition,
}

impl AspectKind {
    /// Exact angle for this aspect
    pub fn angle(&self) -> f64 {
        match self {
            AspectKind::Square => 90.0,
            AspectKind::Opposition => 180.0,
        }
    }

    /// Default orb tolerance, wider than the return tolerances.
    pub fn default_tolerance(&self) -> f64 {
        match self {
            AspectKind::Square => 2.5,
            AspectKind::Opposition => 3.0,
        }
    }
}
