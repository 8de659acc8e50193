//! Celestial bodies tracked by the cycle detectors.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Body {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Chiron,
    NorthNode,
    SouthNode,
}

impl Body {
    pub const ALL: [Body; 13] = [
        Body::Sun,
        Body::Moon,
        Body::Mercury,
        Body::Venus,
        Body::Mars,
        Body::Jupiter,
        Body::Saturn,
        Body::Uranus,
        Body::Neptune,
        Body::Pluto,
        Body::Chiron,
        Body::NorthNode,
        Body::SouthNode,
    ];

    /// Lowercase identifier used as the snapshot key ("north_node").
    pub fn id(&self) -> &'static str {
        match self {
            Body::Sun => "sun",
            Body::Moon => "moon",
            Body::Mercury => "mercury",
            Body::Venus => "venus",
            Body::Mars => "mars",
            Body::Jupiter => "jupiter",
            Body::Saturn => "saturn",
            Body::Uranus => "uranus",
            Body::Neptune => "neptune",
            Body::Pluto => "pluto",
            Body::Chiron => "chiron",
            Body::NorthNode => "north_node",
            Body::SouthNode => "south_node",
        }
    }

    /// Display name ("North Node").
    pub fn name(&self) -> &'static str {
        match self {
            Body::Sun => "Sun",
            Body::Moon => "Moon",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
            Body::Chiron => "Chiron",
            Body::NorthNode => "North Node",
            Body::SouthNode => "South Node",
        }
    }

    /// Accepts either the id or the display name, case-insensitively.
    pub fn from_id(id: &str) -> Option<Body> {
        let wanted = id.trim().to_lowercase().replace([' ', '-'], "_");
        Body::ALL.iter().copied().find(|body| body.id() == wanted)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id_accepts_names_and_ids() {
        assert_eq!(Body::from_id("saturn"), Some(Body::Saturn));
        assert_eq!(Body::from_id("North Node"), Some(Body::NorthNode));
        assert_eq!(Body::from_id("south-node"), Some(Body::SouthNode));
        assert_eq!(Body::from_id("vulcan"), None);
    }

    #[test]
    fn test_id_round_trip_covers_all_bodies() {
        for body in Body::ALL {
            assert_eq!(Body::from_id(body.id()), Some(body));
        }
    }
}
