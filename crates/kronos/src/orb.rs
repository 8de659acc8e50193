//! Circular angular arithmetic and orb classification.
//!
//! Every comparison between two longitudes goes through [`signed_orb`], so the
//! 0°/360° seam is handled in exactly one place.

use serde::{Deserialize, Serialize};

/// Orbs at or below this are "exact" regardless of the tolerance band split.
pub const EXACT_ORB_DEGREES: f64 = 0.5;

const TIGHT_FRACTION: f64 = 0.33;
const MODERATE_FRACTION: f64 = 0.66;

/// Signed shortest-path distance from `reference` to `target`, in (-180, 180].
///
/// Positive when `target` leads `reference` along the zodiac.
/// `signed_orb(359.0, 1.0) == 2.0`.
pub fn signed_orb(reference: f64, target: f64) -> f64 {
    let diff = (target - reference).rem_euclid(360.0);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

/// Unsigned angular separation in [0, 180].
pub fn separation(a: f64, b: f64) -> f64 {
    signed_orb(a, b).abs()
}

/// Qualitative tightness band of an orb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrbStatus {
    Exact,
    Tight,
    Moderate,
    Loose,
    Inactive,
}

impl OrbStatus {
    /// Classify an orb against a tolerance. Negative tolerances are treated as 0.
    ///
    /// Bands: exact ≤ 0.5° (and within tolerance), tight ≤ 33%, moderate ≤ 66%,
    /// loose ≤ 100% of the tolerance, inactive beyond it.
    pub fn classify(orb: f64, tolerance: f64) -> Self {
        let abs_orb = orb.abs();
        let tolerance = tolerance.max(0.0);

        if abs_orb > tolerance {
            OrbStatus::Inactive
        } else if abs_orb <= EXACT_ORB_DEGREES {
            OrbStatus::Exact
        } else if abs_orb <= tolerance * TIGHT_FRACTION {
            OrbStatus::Tight
        } else if abs_orb <= tolerance * MODERATE_FRACTION {
            OrbStatus::Moderate
        } else {
            OrbStatus::Loose
        }
    }

    pub fn is_active(&self) -> bool {
        *self != OrbStatus::Inactive
    }
}

/// Cycle the subject is currently inside: `floor(age / period) + 1`.
///
/// The next return is the completion of this cycle, so the projector uses it as
/// the upcoming cycle number. Always at least 1.
pub fn cycle_number(age_years: f64, period_years: f64) -> u32 {
    if period_years <= 0.0 || age_years <= 0.0 {
        return 1;
    }
    (age_years / period_years).floor() as u32 + 1
}

/// Ordinal of the return nearest to `age`, for a return that is in orb now.
///
/// A body that came back to its natal place at 29.46 is still on its first
/// return at 29.5, even though the subject has entered the second cycle.
pub fn return_number(age_years: f64, period_years: f64) -> u32 {
    if period_years <= 0.0 || age_years <= 0.0 {
        return 1;
    }
    ((age_years / period_years).round() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_orb_basic() {
        assert!((signed_orb(10.0, 12.0) - 2.0).abs() < 1e-9);
        assert!((signed_orb(12.0, 10.0) + 2.0).abs() < 1e-9);
        assert_eq!(signed_orb(42.0, 42.0), 0.0);
    }

    #[test]
    fn test_signed_orb_wraparound() {
        assert!((signed_orb(359.0, 1.0) - 2.0).abs() < 1e-9);
        assert!((signed_orb(1.0, 359.0) + 2.0).abs() < 1e-9);
        assert!((signed_orb(-10.0, 730.0) - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_signed_orb_range_and_antisymmetry() {
        let samples = [0.0, 0.25, 17.5, 90.0, 179.9, 180.1, 271.3, 359.75, -45.0, 1234.5];
        for &a in &samples {
            for &b in &samples {
                let ab = signed_orb(a, b);
                assert!(ab > -180.0 && ab <= 180.0, "signed_orb({a}, {b}) = {ab}");
                if (ab.abs() - 180.0).abs() > 1e-9 {
                    assert!((ab + signed_orb(b, a)).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_half_circle_is_positive() {
        assert_eq!(signed_orb(0.0, 180.0), 180.0);
        assert_eq!(signed_orb(180.0, 0.0), 180.0);
    }

    #[test]
    fn test_classify_bands() {
        assert_eq!(OrbStatus::classify(0.0, 3.0), OrbStatus::Exact);
        assert_eq!(OrbStatus::classify(-0.5, 3.0), OrbStatus::Exact);
        assert_eq!(OrbStatus::classify(0.9, 3.0), OrbStatus::Tight);
        assert_eq!(OrbStatus::classify(1.5, 3.0), OrbStatus::Moderate);
        assert_eq!(OrbStatus::classify(-2.5, 3.0), OrbStatus::Loose);
        assert_eq!(OrbStatus::classify(3.0, 3.0), OrbStatus::Loose);
        assert_eq!(OrbStatus::classify(3.01, 3.0), OrbStatus::Inactive);
    }

    #[test]
    fn test_classify_zero_tolerance() {
        assert_eq!(OrbStatus::classify(0.0, 0.0), OrbStatus::Exact);
        assert_eq!(OrbStatus::classify(0.1, 0.0), OrbStatus::Inactive);
        assert_eq!(OrbStatus::classify(0.1, -1.0), OrbStatus::Inactive);
    }

    #[test]
    fn test_classify_is_monotonic() {
        for &tolerance in &[0.5, 1.0, 1.5, 2.0, 3.0, 8.0] {
            let mut previous = OrbStatus::classify(0.0, tolerance);
            assert_eq!(previous, OrbStatus::Exact);
            for step in 1..=1000 {
                let orb = step as f64 * 0.01;
                let status = OrbStatus::classify(orb, tolerance);
                assert!(status >= previous, "band tightened at orb {orb} tol {tolerance}");
                previous = status;
            }
        }
    }

    #[test]
    fn test_cycle_number_transitions_on_period_multiples() {
        let period = 11.86;
        assert_eq!(cycle_number(0.0, period), 1);
        assert_eq!(cycle_number(11.85, period), 1);
        assert_eq!(cycle_number(period, period), 2);
        assert_eq!(cycle_number(2.0 * period, period), 3);

        let mut previous = 1;
        for step in 0..1000 {
            let cycle = cycle_number(step as f64 * 0.1, period);
            assert!(cycle >= previous);
            previous = cycle;
        }
    }

    #[test]
    fn test_return_number_nearest() {
        assert_eq!(return_number(29.5, 29.46), 1);
        assert_eq!(return_number(29.2, 29.46), 1);
        assert_eq!(return_number(58.9, 29.46), 2);
        assert_eq!(return_number(0.3, 1.88), 1);
    }
}
