use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Parser;
use kronos::ephemeris::{ChartProvider, EphemerisSettings, SwissEphemerisAdapter};
use kronos::{find_lunar_return, Body, EventFeed, LifecycleDetector, LunarReturn, LunarReturnError};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(author, version, about = "Lifecycle cycle report for a birth moment")]
struct Args {
    /// Birth moment, RFC 3339 (e.g. 1990-01-15T12:00:00Z).
    birth: String,

    /// Also solve the lunar return for this month (YYYY-MM).
    month: Option<String>,

    /// Moment to report on, RFC 3339. Defaults to now.
    #[arg(long)]
    at: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum LunarReturnReport {
    Found(LunarReturn),
    NotFound {
        message: String,
    },
}

#[derive(Serialize)]
struct Report {
    feed: EventFeed,
    #[serde(skip_serializing_if = "Option::is_none")]
    lunar_return: Option<LunarReturnReport>,
}

fn parse_moment(text: &str, what: &str) -> anyhow::Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(text)
        .with_context(|| format!("Invalid {what} timestamp '{text}' (expected RFC 3339)"))?;
    Ok(parsed.with_timezone(&Utc))
}

fn parse_month(text: &str) -> anyhow::Result<(i32, u32)> {
    let (year, month) = text
        .split_once('-')
        .ok_or_else(|| anyhow::anyhow!("Invalid month '{text}' (expected YYYY-MM)"))?;
    let year: i32 = year.parse().with_context(|| format!("Invalid year in '{text}'"))?;
    let month: u32 = month.parse().with_context(|| format!("Invalid month in '{text}'"))?;
    if !(1..=12).contains(&month) {
        anyhow::bail!("Month out of range in '{text}'");
    }
    Ok((year, month))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let birth = parse_moment(&args.birth, "birth")?;
    let at = match &args.at {
        Some(text) => parse_moment(text, "report")?,
        None => Utc::now(),
    };
    let lunar_month = args.month.as_deref().map(parse_month).transpose()?;

    let settings = kronos_config::load_lifecycle_settings()?;
    log::info!("Cycle report for birth {} at {}", birth, at);
    let location = settings.location.as_ref();

    let mut adapter = SwissEphemerisAdapter::new(settings.ephemeris_path.clone(), EphemerisSettings::default())
        .context("Failed to initialise Swiss Ephemeris")?;

    let detector = LifecycleDetector::new(settings.reference_tables(), settings.detection_options());
    let feed = detector.detect_from_provider(&mut adapter, birth, at, location)?;

    let lunar_return = match lunar_month {
        Some((year, month)) => {
            let natal_moon = adapter.position_at(Body::Moon, birth, location)?.lon;
            let mut moon_only = SwissEphemerisAdapter::new(
                settings.ephemeris_path.clone(),
                EphemerisSettings {
                    include_objects: vec![Body::Moon],
                    ..EphemerisSettings::default()
                },
            )?;
            let config = settings.lunar_return_config();
            match find_lunar_return(&mut moon_only, natal_moon, year, month, location, &config) {
                Ok(result) => Some(LunarReturnReport::Found(result)),
                Err(e @ LunarReturnError::NotFound { .. }) => Some(LunarReturnReport::NotFound {
                    message: e.to_string(),
                }),
                Err(e) => return Err(e.into()),
            }
        }
        None => None,
    };

    let report = Report { feed, lunar_return };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
