//! Lunar return search: the instant in a calendar month when the transiting
//! Moon comes back to the natal Moon's longitude.
//!
//! Coarse scan at fixed steps to bracket the crossing, then bisection on the
//! signed distance to the natal longitude. Each sample is one provider call.

use crate::bodies::Body;
use crate::ephemeris::{ChartProvider, EphemerisError, GeoLocation};
use crate::orb::signed_orb;
use crate::time::days;
use chrono::{DateTime, Duration, TimeZone, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LunarReturnError {
    #[error("Invalid month {month} for year {year}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("Invalid lunar return search configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("No lunar return found in {year}-{month:02}: the Moon does not cross the natal longitude in this month")]
    NotFound { year: i32, month: u32 },
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
}

/// Search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LunarReturnConfig {
    /// Coarse scan cadence. The Moon moves about 3.3° in 6 hours.
    pub step_hours: f64,
    /// Accept a bisection midpoint this close to the natal longitude.
    pub tolerance_deg: f64,
    /// Stop bisecting once the bracket is narrower than this.
    pub convergence_secs: f64,
    /// Look-ahead used to read the direction of motion at a midpoint.
    pub probe_hours: f64,
    pub max_iterations: u32,
}

impl Default for LunarReturnConfig {
    fn default() -> Self {
        Self {
            step_hours: 6.0,
            tolerance_deg: 0.1,
            convergence_secs: 60.0,
            probe_hours: 1.0,
            max_iterations: 40,
        }
    }
}

impl LunarReturnConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.step_hours <= 0.0 {
            return Err("step_hours must be positive");
        }
        if self.step_hours > 24.0 {
            return Err("step_hours above 24 can skip a crossing");
        }
        if self.tolerance_deg <= 0.0 {
            return Err("tolerance_deg must be positive");
        }
        if self.convergence_secs < 1.0 {
            return Err("convergence_secs must be at least one second");
        }
        if self.probe_hours <= 0.0 {
            return Err("probe_hours must be positive");
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be > 0");
        }
        Ok(())
    }
}

/// A solved lunar return.
#[derive(Debug, Clone, Serialize)]
pub struct LunarReturn {
    pub moment: DateTime<Utc>,
    pub natal_longitude: f64,
    pub moon_longitude: f64,
    /// Signed distance from the natal longitude at `moment`.
    pub orb: f64,
    pub year: i32,
    pub month: u32,
    pub provider_calls: usize,
}

/// `[start, end)` of a calendar month in UTC.
fn month_bounds(year: i32, month: u32) -> Result<(DateTime<Utc>, DateTime<Utc>), LunarReturnError> {
    let invalid = || LunarReturnError::InvalidMonth { year, month };
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let start = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).single().ok_or_else(invalid)?;
    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()
        .ok_or_else(invalid)?;
    Ok((start, end))
}

/// Whether the Moon passed `target` moving from `prev` to `cur`, including
/// passes across the 0°/360° seam.
fn crossed(prev: f64, cur: f64, target: f64) -> bool {
    if prev <= cur {
        prev < target && target <= cur
    } else {
        prev < target || target <= cur
    }
}

/// Moon longitude sampler that counts provider calls.
struct MoonSampler<'a, P: ChartProvider + ?Sized> {
    provider: &'a mut P,
    location: Option<&'a GeoLocation>,
    calls: usize,
}

impl<P: ChartProvider + ?Sized> MoonSampler<'_, P> {
    fn longitude(&mut self, at: DateTime<Utc>) -> Result<f64, EphemerisError> {
        self.calls += 1;
        let position = self.provider.position_at(Body::Moon, at, self.location)?;
        Ok(position.lon.rem_euclid(360.0))
    }
}

fn midpoint(lo: DateTime<Utc>, hi: DateTime<Utc>) -> DateTime<Utc> {
    lo + (hi - lo) / 2
}

/// Find the lunar return for `year`/`month`.
///
/// Returns `NotFound` when the Moon never reaches `natal_moon_longitude`
/// within the month; provider failures propagate.
pub fn find_lunar_return<P: ChartProvider + ?Sized>(
    provider: &mut P,
    natal_moon_longitude: f64,
    year: i32,
    month: u32,
    location: Option<&GeoLocation>,
    config: &LunarReturnConfig,
) -> Result<LunarReturn, LunarReturnError> {
    config.validate().map_err(LunarReturnError::InvalidConfig)?;
    let (start, end) = month_bounds(year, month)?;
    let natal = natal_moon_longitude.rem_euclid(360.0);

    let mut sampler = MoonSampler { provider, location, calls: 0 };
    let step = days(config.step_hours / 24.0);

    // Coarse scan, with the month boundary as the final sample.
    let mut t_prev = start;
    let mut lon_prev = sampler.longitude(t_prev)?;
    let mut bracket = None;
    while t_prev < end {
        let t_cur = (t_prev + step).min(end);
        let lon_cur = sampler.longitude(t_cur)?;
        if crossed(lon_prev, lon_cur, natal) {
            bracket = Some((t_prev, t_cur));
            break;
        }
        t_prev = t_cur;
        lon_prev = lon_cur;
    }

    let Some((mut lo, mut hi)) = bracket else {
        info!("No lunar return in {}-{:02} ({} samples)", year, month, sampler.calls);
        return Err(LunarReturnError::NotFound { year, month });
    };
    debug!("Lunar return bracketed between {} and {}", lo, hi);

    let convergence = Duration::milliseconds((config.convergence_secs * 1000.0) as i64);
    let probe = days(config.probe_hours / 24.0);
    let mut solved = None;

    for iteration in 0..config.max_iterations {
        if hi - lo < convergence {
            break;
        }
        let mid = midpoint(lo, hi);
        let lon_mid = sampler.longitude(mid)?;
        let offset = signed_orb(natal, lon_mid);
        if offset.abs() < config.tolerance_deg {
            debug!("Accepted midpoint after {} iterations (orb {:.4})", iteration + 1, offset);
            solved = Some((mid, lon_mid, offset));
            break;
        }

        let lon_probe = sampler.longitude(mid + probe)?;
        let motion = signed_orb(lon_mid, lon_probe);
        // Moving toward the natal point means the crossing is still ahead.
        if offset * motion < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let (moment, moon_longitude, orb) = match solved {
        Some(found) => found,
        None => {
            let mid = midpoint(lo, hi);
            let lon_mid = sampler.longitude(mid)?;
            (mid, lon_mid, signed_orb(natal, lon_mid))
        }
    };

    // Every bracket lies inside [start, end] and the result is a midpoint.
    debug_assert!(moment < end);

    info!(
        "Lunar return for {}-{:02} at {} (orb {:.4}, {} provider calls)",
        year, month, moment, orb, sampler.calls
    );

    Ok(LunarReturn {
        moment,
        natal_longitude: natal,
        moon_longitude,
        orb,
        year,
        month,
        provider_calls: sampler.calls,
    })
}
