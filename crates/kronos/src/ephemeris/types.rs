use crate::bodies::Body;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Geographic location coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

const SIGN_ORDER: [ZodiacSign; 12] = [
    ZodiacSign::Aries,
    ZodiacSign::Taurus,
    ZodiacSign::Gemini,
    ZodiacSign::Cancer,
    ZodiacSign::Leo,
    ZodiacSign::Virgo,
    ZodiacSign::Libra,
    ZodiacSign::Scorpio,
    ZodiacSign::Sagittarius,
    ZodiacSign::Capricorn,
    ZodiacSign::Aquarius,
    ZodiacSign::Pisces,
];

impl ZodiacSign {
    /// Sign containing an ecliptic longitude; any real input is normalized first.
    pub fn from_longitude(longitude: f64) -> Self {
        let lon = longitude.rem_euclid(360.0);
        let index = (lon / 30.0) as usize;
        SIGN_ORDER[index % 12]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }
}

/// Planetary position data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetPosition {
    /// Longitude in degrees (0-360)
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
    /// Speed in longitude (degrees per day)
    pub speed_lon: f64,
    /// Whether the planet is retrograde
    pub retrograde: bool,
    pub sign: ZodiacSign,
}

impl PlanetPosition {
    /// Position with sign and retrograde flag derived from longitude and speed.
    pub fn new(lon: f64, lat: f64, speed_lon: f64) -> Self {
        let lon = lon.rem_euclid(360.0);
        Self {
            lon,
            lat,
            speed_lon,
            retrograde: speed_lon < 0.0,
            sign: ZodiacSign::from_longitude(lon),
        }
    }
}

/// Point-in-time positions for one chart (natal, transit or progressed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSnapshot {
    pub datetime: DateTime<Utc>,
    /// Body ID -> position
    pub planets: HashMap<String, PlanetPosition>,
}

impl ChartSnapshot {
    pub fn new(datetime: DateTime<Utc>) -> Self {
        Self {
            datetime,
            planets: HashMap::new(),
        }
    }

    pub fn with_position(mut self, body: Body, position: PlanetPosition) -> Self {
        self.planets.insert(body.id().to_string(), position);
        self
    }

    pub fn position(&self, body: Body) -> Option<&PlanetPosition> {
        self.planets.get(body.id())
    }
}

/// Settings for ephemeris calculations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EphemerisSettings {
    /// Bodies to include
    pub include_objects: Vec<Body>,
}

impl Default for EphemerisSettings {
    fn default() -> Self {
        Self {
            include_objects: Body::ALL.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_from_longitude() {
        assert_eq!(ZodiacSign::from_longitude(0.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(125.43), ZodiacSign::Leo);
        assert_eq!(ZodiacSign::from_longitude(359.99), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::from_longitude(360.0), ZodiacSign::Aries);
        assert_eq!(ZodiacSign::from_longitude(-15.0), ZodiacSign::Pisces);
        assert_eq!(ZodiacSign::Leo.name(), "Leo");
    }

    #[test]
    fn test_snapshot_lookup_by_body() {
        let snapshot = ChartSnapshot::new(Utc::now())
            .with_position(Body::NorthNode, PlanetPosition::new(370.0, 0.0, -0.05));

        let node = snapshot.position(Body::NorthNode).unwrap();
        assert!((node.lon - 10.0).abs() < 1e-9);
        assert!(node.retrograde);
        assert!(snapshot.position(Body::Saturn).is_none());
    }

    #[test]
    fn test_settings_only_select_bodies() {
        let settings: EphemerisSettings =
            serde_json::from_str(r#"{"include_objects": ["moon", "saturn"]}"#).unwrap();
        assert_eq!(settings.include_objects, vec![Body::Moon, Body::Saturn]);
        assert_eq!(EphemerisSettings::default().include_objects.len(), Body::ALL.len());
    }
}
