//! Calendar helpers shared by the detectors and the projector.

use chrono::{DateTime, Duration, Utc};

/// Julian year, as used for every age and period conversion.
pub const DAYS_PER_YEAR: f64 = 365.25;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Elapsed years between `birth` and `at`; negative if `at` precedes `birth`.
pub fn age_in_years(birth: DateTime<Utc>, at: DateTime<Utc>) -> f64 {
    (at - birth).num_seconds() as f64 / (DAYS_PER_YEAR * SECONDS_PER_DAY)
}

/// Duration spanning a fractional number of days, to the second.
pub fn days(days: f64) -> Duration {
    Duration::seconds((days * SECONDS_PER_DAY).round() as i64)
}

/// `birth` plus a total elapsed age.
///
/// Predicted dates are always derived from the age since birth, never from a
/// years-until offset.
pub fn date_at_age(birth: DateTime<Utc>, age_years: f64) -> DateTime<Utc> {
    birth + days(age_years * DAYS_PER_YEAR)
}

/// Secondary-progression instant for `at`: one day after birth per year of life.
pub fn progressed_datetime(birth: DateTime<Utc>, at: DateTime<Utc>) -> DateTime<Utc> {
    birth + days(age_in_years(birth, at))
}
