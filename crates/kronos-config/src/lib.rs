use kronos::{Body, DetectionOptions, GeoLocation, LunarReturnConfig, ReferenceTables};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

/// Resolved `[lifecycle]` settings.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleSettings {
    pub include_future: bool,
    pub future_years: f64,
    pub max_future_events: usize,
    pub enrich_current_orbs: bool,
    /// `None` keeps the bundled list of tracked bodies.
    pub tracked_bodies: Option<Vec<Body>>,
    pub orb_overrides: Vec<(Body, f64)>,
    pub lunar_return_tolerance: f64,
    pub location: Option<GeoLocation>,
    pub ephemeris_path: Option<PathBuf>,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        let options = DetectionOptions::default();
        Self {
            include_future: options.include_future,
            future_years: options.future_years,
            max_future_events: options.max_future_events,
            enrich_current_orbs: options.enrich_current_orbs,
            tracked_bodies: None,
            orb_overrides: Vec::new(),
            lunar_return_tolerance: LunarReturnConfig::default().tolerance_deg,
            location: None,
            ephemeris_path: None,
        }
    }
}

impl LifecycleSettings {
    pub fn detection_options(&self) -> DetectionOptions {
        DetectionOptions {
            include_future: self.include_future,
            future_years: self.future_years,
            max_future_events: self.max_future_events,
            enrich_current_orbs: self.enrich_current_orbs,
        }
    }

    /// Bundled tables with the configured tracked bodies and orb overrides applied.
    pub fn reference_tables(&self) -> ReferenceTables {
        let mut tables = ReferenceTables::standard();
        if let Some(bodies) = &self.tracked_bodies {
            tables = tables.with_tracked_returns(bodies.clone());
        }
        for &(body, orb) in &self.orb_overrides {
            tables = tables.with_orb_tolerance(body, orb);
        }
        tables
    }

    pub fn lunar_return_config(&self) -> LunarReturnConfig {
        LunarReturnConfig {
            tolerance_deg: self.lunar_return_tolerance,
            ..LunarReturnConfig::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct LifecycleToml {
    #[serde(default)]
    include_future: Option<bool>,
    #[serde(default)]
    future_years: Option<f64>,
    #[serde(default)]
    max_future_events: Option<usize>,
    #[serde(default)]
    enrich_current_orbs: Option<bool>,
    #[serde(default)]
    tracked_bodies: Option<Vec<String>>,
    #[serde(default)]
    orb_overrides: BTreeMap<String, f64>,
    #[serde(default)]
    lunar_return_tolerance: Option<f64>,
    #[serde(default)]
    location: Option<GeoLocation>,
    #[serde(default)]
    ephemeris_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    lifecycle: Option<LifecycleToml>,
}

fn parse_body(id: &str, key: &str) -> anyhow::Result<Body> {
    Body::from_id(id).ok_or_else(|| anyhow::anyhow!("Unknown body '{id}' in lifecycle.{key}"))
}

/// Try common relative paths for `configs/kronos.toml`. `None` when no file exists.
pub fn read_config_toml_text() -> Option<String> {
    let paths = ["configs/kronos.toml", "../../configs/kronos.toml"];
    paths.iter().find_map(|p| fs::read_to_string(p).ok())
}

/// Parse the `[lifecycle]` table. A missing table yields defaults.
pub fn parse_lifecycle_settings(text: &str) -> anyhow::Result<LifecycleSettings> {
    let root: RootConfigToml =
        toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse kronos.toml: {e}"))?;
    let defaults = LifecycleSettings::default();
    let Some(cfg) = root.lifecycle else {
        return Ok(defaults);
    };

    let future_years = cfg.future_years.unwrap_or(defaults.future_years);
    if future_years < 0.0 {
        anyhow::bail!("lifecycle.future_years must be non-negative, got {future_years}");
    }

    let tracked_bodies = cfg
        .tracked_bodies
        .map(|ids| {
            ids.iter()
                .map(|id| parse_body(id, "tracked_bodies"))
                .collect::<anyhow::Result<Vec<_>>>()
        })
        .transpose()?;

    let mut orb_overrides = Vec::with_capacity(cfg.orb_overrides.len());
    for (id, orb) in &cfg.orb_overrides {
        let body = parse_body(id, "orb_overrides")?;
        if *orb < 0.0 {
            anyhow::bail!("lifecycle.orb_overrides.{id} must be non-negative, got {orb}");
        }
        orb_overrides.push((body, *orb));
    }

    let lunar_return_tolerance = cfg.lunar_return_tolerance.unwrap_or(defaults.lunar_return_tolerance);
    if lunar_return_tolerance <= 0.0 {
        anyhow::bail!("lifecycle.lunar_return_tolerance must be positive, got {lunar_return_tolerance}");
    }

    Ok(LifecycleSettings {
        include_future: cfg.include_future.unwrap_or(defaults.include_future),
        future_years,
        max_future_events: cfg.max_future_events.unwrap_or(defaults.max_future_events),
        enrich_current_orbs: cfg.enrich_current_orbs.unwrap_or(defaults.enrich_current_orbs),
        tracked_bodies,
        orb_overrides,
        lunar_return_tolerance,
        location: cfg.location,
        ephemeris_path: cfg.ephemeris_path,
    })
}

/// Load settings from `configs/kronos.toml`, falling back to defaults when the
/// file is absent.
pub fn load_lifecycle_settings() -> anyhow::Result<LifecycleSettings> {
    match read_config_toml_text() {
        Some(text) => parse_lifecycle_settings(&text),
        None => Ok(LifecycleSettings::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_section_gives_defaults() {
        let settings = parse_lifecycle_settings("[other]\nkey = 1\n").unwrap();
        assert_eq!(settings, LifecycleSettings::default());
        assert_eq!(settings.future_years, 20.0);
        assert_eq!(settings.max_future_events, 10);
    }

    #[test]
    fn test_full_section() {
        let text = r#"
            [lifecycle]
            future_years = 30.0
            max_future_events = 5
            include_future = true
            tracked_bodies = ["saturn", "Jupiter", "north node"]
            lunar_return_tolerance = 0.05
            ephemeris_path = "/opt/ephe"

            [lifecycle.orb_overrides]
            saturn = 2.0

            [lifecycle.location]
            lat = 40.7128
            lon = -74.006
        "#;
        let settings = parse_lifecycle_settings(text).unwrap();

        assert_eq!(settings.future_years, 30.0);
        assert_eq!(settings.max_future_events, 5);
        assert_eq!(
            settings.tracked_bodies,
            Some(vec![Body::Saturn, Body::Jupiter, Body::NorthNode])
        );
        assert_eq!(settings.orb_overrides, vec![(Body::Saturn, 2.0)]);
        assert_eq!(settings.location.as_ref().unwrap().lat, 40.7128);
        assert_eq!(settings.ephemeris_path, Some(PathBuf::from("/opt/ephe")));

        let tables = settings.reference_tables();
        assert_eq!(tables.orb_tolerance(Body::Saturn), 2.0);
        assert_eq!(tables.tracked_returns.len(), 3);
        assert_eq!(settings.lunar_return_config().tolerance_deg, 0.05);
        assert_eq!(settings.detection_options().future_years, 30.0);
    }

    #[test]
    fn test_negative_orb_override_rejected() {
        let text = "[lifecycle.orb_overrides]\nmars = -1.0\n";
        let err = parse_lifecycle_settings(text).unwrap_err();
        assert!(err.to_string().contains("orb_overrides.mars"));
    }

    #[test]
    fn test_unknown_body_rejected() {
        let text = "[lifecycle]\ntracked_bodies = [\"vulcan\"]\n";
        assert!(parse_lifecycle_settings(text).is_err());
    }
}
