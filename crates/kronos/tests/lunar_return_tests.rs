mod common;

use chrono::{Datelike, TimeZone, Utc};
use common::{j2000, FailingProvider, SyntheticProvider, MOON_DEG_PER_DAY};
use kronos::lunar_return::{find_lunar_return, LunarReturnConfig, LunarReturnError};
use kronos::{signed_orb, Body, EphemerisError};

#[test]
fn test_january_2025_return_for_1990_birth() {
    let birth = Utc.with_ymd_and_hms(1990, 1, 15, 0, 0, 0).unwrap();
    let mut provider = SyntheticProvider::new(j2000()).with_body(Body::Moon, 218.32, MOON_DEG_PER_DAY);
    let natal_moon = provider.longitude(Body::Moon, birth).unwrap();

    let result = find_lunar_return(&mut provider, natal_moon, 2025, 1, None, &LunarReturnConfig::default())
        .expect("a lunar month fits inside January");

    assert_eq!(result.moment.year(), 2025);
    assert_eq!(result.moment.month(), 1);
    assert_eq!((result.year, result.month), (2025, 1));

    let actual = provider.longitude(Body::Moon, result.moment).unwrap();
    assert!(signed_orb(natal_moon, actual).abs() < 0.1);
    assert!(result.orb.abs() < 0.1);
    assert!((result.moon_longitude - actual).abs() < 1e-6);

    // Coarse scan plus refinement, never a uniform fine sweep.
    assert!(result.provider_calls <= 160);
    assert_eq!(result.provider_calls, provider.calls);
}

#[test]
fn test_crossing_at_seam() {
    // Natal Moon just past 0°; the scan straddles 359° -> 2°.
    let mut provider = SyntheticProvider::new(j2000()).with_body(Body::Moon, 10.0, MOON_DEG_PER_DAY);
    let result = find_lunar_return(&mut provider, 0.4, 2025, 3, None, &LunarReturnConfig::default()).unwrap();

    let actual = provider.longitude(Body::Moon, result.moment).unwrap();
    assert!(signed_orb(0.4, actual).abs() < 0.1);
}

#[test]
fn test_slow_moon_not_found() {
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    // 5°/day covers only 155° in January.
    let mut provider = SyntheticProvider::new(start).with_body(Body::Moon, 0.0, 5.0);

    let err = find_lunar_return(&mut provider, 200.0, 2025, 1, None, &LunarReturnConfig::default()).unwrap_err();
    assert!(matches!(err, LunarReturnError::NotFound { year: 2025, month: 1 }));
    assert!(err.to_string().contains("2025-01"));
}

#[test]
fn test_crossing_in_final_partial_step() {
    // Seven-hour steps end at 22:00 on the 31st; the crossing is at 23:00.
    let crossing = Utc.with_ymd_and_hms(2025, 1, 31, 23, 0, 0).unwrap();
    let mut provider = SyntheticProvider::new(crossing).with_body(Body::Moon, 90.0, 5.0);
    let config = LunarReturnConfig {
        step_hours: 7.0,
        ..LunarReturnConfig::default()
    };

    let result = find_lunar_return(&mut provider, 90.0, 2025, 1, None, &config).unwrap();
    assert_eq!(result.moment.day(), 31);
    assert!((result.moment - crossing).num_minutes().abs() <= 60);
    assert!(result.moment < Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());
}

#[test]
fn test_invalid_month_rejected_before_any_provider_call() {
    let mut provider = SyntheticProvider::new(j2000()).with_body(Body::Moon, 0.0, MOON_DEG_PER_DAY);
    let err = find_lunar_return(&mut provider, 10.0, 2025, 13, None, &LunarReturnConfig::default()).unwrap_err();
    assert!(matches!(err, LunarReturnError::InvalidMonth { month: 13, .. }));
    assert_eq!(provider.calls, 0);
}

#[test]
fn test_provider_failure_propagates() {
    let err = find_lunar_return(&mut FailingProvider, 10.0, 2025, 1, None, &LunarReturnConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        LunarReturnError::Ephemeris(EphemerisError::CalculationFailed { .. })
    ));
}

#[test]
fn test_missing_moon_is_an_ephemeris_error() {
    let mut provider = SyntheticProvider::new(j2000()).with_body(Body::Sun, 0.0, 0.9856);
    let err = find_lunar_return(&mut provider, 10.0, 2025, 1, None, &LunarReturnConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        LunarReturnError::Ephemeris(EphemerisError::BodyUnavailable { body: Body::Moon, .. })
    ));
}

#[test]
fn test_invalid_config() {
    let mut provider = SyntheticProvider::new(j2000()).with_body(Body::Moon, 0.0, MOON_DEG_PER_DAY);
    let config = LunarReturnConfig {
        tolerance_deg: 0.0,
        ..LunarReturnConfig::default()
    };
    let err = find_lunar_return(&mut provider, 10.0, 2025, 1, None, &config).unwrap_err();
    assert!(matches!(err, LunarReturnError::InvalidConfig(_)));
}
