//! # Rental Duration
//!
//! Turns a delivery date and a pickup date into a day count and a pricing
//! classification.
//!
//! ## Classification
//! ```text
//! ┌───────────┬────────────────┬────────────┬─────────────────────┐
//! │ day count │ classification │ multiplier │ flat surcharge      │
//! ├───────────┼────────────────┼────────────┼─────────────────────┤
//! │ 0         │ same-day       │ 1          │ 0                   │
//! │ 1         │ overnight      │ 1          │ overnight fee       │
//! │ 2         │ two-day        │ 2          │ 0                   │
//! │ n ≥ 3     │ multi-day      │ n          │ 0                   │
//! └───────────┴────────────────┴────────────┴─────────────────────┘
//! ```
//!
//! Dates are calendar dates, not instants. Both ends are pinned to local
//! noon before differencing so a daylight-saving shift inside the range can
//! never move the rounded day count.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::config::PricingConfig;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Parses a `YYYY-MM-DD` calendar date component by component.
///
/// ## Example
/// ```rust
/// use bounce_core::rental::parse_calendar_date;
///
/// let date = parse_calendar_date("2024-03-10").unwrap();
/// assert_eq!(date.to_string(), "2024-03-10");
/// assert!(parse_calendar_date("03/10/2024").is_err());
/// ```
pub fn parse_calendar_date(value: &str) -> CoreResult<NaiveDate> {
    let invalid = || CoreError::InvalidDate {
        value: value.to_string(),
    };

    let mut parts = value.trim().split('-');
    let (Some(year), Some(month), Some(day), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let numeric = |part: &str, len: usize| part.len() == len && part.bytes().all(|b| b.is_ascii_digit());
    if !numeric(year, 4) || !numeric(month, 2) || !numeric(day, 2) {
        return Err(invalid());
    }

    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    let day: u32 = day.parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Whole days between delivery and pickup.
///
/// Returns 0 when either date is missing. Negative when pickup precedes
/// delivery; the validator reports that case, pricing treats it as same-day.
pub fn calculate_rental_days(delivery: Option<NaiveDate>, pickup: Option<NaiveDate>) -> i32 {
    let noon = |date: NaiveDate| date.and_hms_opt(12, 0, 0);

    match (delivery.and_then(noon), pickup.and_then(noon)) {
        (Some(delivery), Some(pickup)) => {
            let millis = (pickup - delivery).num_milliseconds() as f64;
            (millis / MILLIS_PER_DAY).round() as i32
        }
        _ => 0,
    }
}

/// String form of [`calculate_rental_days`] for raw form values.
///
/// Empty strings count as absent. A malformed date is an error rather than
/// a silent zero.
pub fn calculate_rental_days_iso(delivery: Option<&str>, pickup: Option<&str>) -> CoreResult<i32> {
    let parse = |value: Option<&str>| -> CoreResult<Option<NaiveDate>> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => parse_calendar_date(v).map(Some),
            _ => Ok(None),
        }
    };

    Ok(calculate_rental_days(parse(delivery)?, parse(pickup)?))
}

// =============================================================================
// Rental Duration
// =============================================================================

/// Pricing classification of a rental's length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case", tag = "kind", content = "days")]
pub enum RentalDuration {
    SameDay,
    Overnight,
    TwoDay,
    MultiDay(u32),
}

impl RentalDuration {
    /// Classifies a day count. Anything at or below zero is same-day.
    pub fn classify(days: i32) -> Self {
        match days {
            i32::MIN..=0 => RentalDuration::SameDay,
            1 => RentalDuration::Overnight,
            2 => RentalDuration::TwoDay,
            n => RentalDuration::MultiDay(n.unsigned_abs()),
        }
    }

    /// Classifies the span between two optional dates.
    pub fn between(delivery: Option<NaiveDate>, pickup: Option<NaiveDate>) -> Self {
        Self::classify(calculate_rental_days(delivery, pickup))
    }

    /// Factor applied to rental items, extras and mixers.
    pub fn multiplier(&self) -> u32 {
        match self {
            RentalDuration::SameDay | RentalDuration::Overnight => 1,
            RentalDuration::TwoDay => 2,
            RentalDuration::MultiDay(n) => *n,
        }
    }

    pub fn is_overnight(&self) -> bool {
        matches!(self, RentalDuration::Overnight)
    }

    /// Flat surcharge; only one-night rentals carry it.
    pub fn overnight_fee(&self, config: &PricingConfig) -> Money {
        if self.is_overnight() {
            config.overnight_fee
        } else {
            Money::zero()
        }
    }
}

impl fmt::Display for RentalDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RentalDuration::SameDay => write!(f, "same-day"),
            RentalDuration::Overnight => write!(f, "overnight"),
            RentalDuration::TwoDay => write!(f, "two-day"),
            RentalDuration::MultiDay(n) => write!(f, "{}-day", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> Option<NaiveDate> {
        Some(parse_calendar_date(s).unwrap())
    }

    #[test]
    fn test_parse_calendar_date() {
        assert_eq!(
            parse_calendar_date("2024-07-04").unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 4).unwrap()
        );
        assert!(parse_calendar_date("2024-7-4").is_err());
        assert!(parse_calendar_date("2024-02-30").is_err());
        assert!(parse_calendar_date("2024-07-04T10:00").is_err());
        assert!(parse_calendar_date("").is_err());
        assert!(parse_calendar_date("2024-07-04-01").is_err());
    }

    #[test]
    fn test_missing_dates_are_zero() {
        assert_eq!(calculate_rental_days(None, date("2024-07-04")), 0);
        assert_eq!(calculate_rental_days(date("2024-07-04"), None), 0);
        assert_eq!(calculate_rental_days_iso(Some(""), Some("2024-07-04")).unwrap(), 0);
        assert_eq!(calculate_rental_days_iso(None, None).unwrap(), 0);
    }

    #[test]
    fn test_day_counts() {
        assert_eq!(calculate_rental_days(date("2024-07-04"), date("2024-07-04")), 0);
        assert_eq!(calculate_rental_days(date("2024-07-04"), date("2024-07-05")), 1);
        assert_eq!(calculate_rental_days(date("2024-07-04"), date("2024-07-07")), 3);
        assert_eq!(calculate_rental_days(date("2024-07-05"), date("2024-07-04")), -1);
        // Month and year boundaries
        assert_eq!(calculate_rental_days(date("2024-12-31"), date("2025-01-02")), 2);
        assert_eq!(calculate_rental_days(date("2024-02-28"), date("2024-03-01")), 2);
    }

    #[test]
    fn test_dst_boundaries_do_not_shift_count() {
        // US spring-forward 2024-03-10, fall-back 2024-11-03
        assert_eq!(calculate_rental_days(date("2024-03-09"), date("2024-03-10")), 1);
        assert_eq!(calculate_rental_days(date("2024-03-09"), date("2024-03-11")), 2);
        assert_eq!(calculate_rental_days(date("2024-11-02"), date("2024-11-03")), 1);
        assert_eq!(calculate_rental_days(date("2024-11-02"), date("2024-11-05")), 3);
    }

    #[test]
    fn test_weekday_invariance() {
        // A one-night span starting on every day of one week
        for start in 1..=7 {
            let d = NaiveDate::from_ymd_opt(2024, 6, start).unwrap();
            let p = d.succ_opt().unwrap();
            assert_eq!(calculate_rental_days(Some(d), Some(p)), 1);
        }
    }

    #[test]
    fn test_malformed_iso_is_error() {
        assert!(calculate_rental_days_iso(Some("07/04/2024"), Some("2024-07-05")).is_err());
    }

    #[test]
    fn test_classification_boundaries() {
        let config = PricingConfig::default();

        let same_day = RentalDuration::classify(0);
        assert_eq!(same_day, RentalDuration::SameDay);
        assert_eq!(same_day.multiplier(), 1);
        assert_eq!(same_day.overnight_fee(&config), Money::zero());

        let overnight = RentalDuration::classify(1);
        assert_eq!(overnight.multiplier(), 1);
        assert_eq!(overnight.overnight_fee(&config), config.overnight_fee);

        let two_day = RentalDuration::classify(2);
        assert_eq!(two_day.multiplier(), 2);
        assert_eq!(two_day.overnight_fee(&config), Money::zero());

        let three_day = RentalDuration::classify(3);
        assert_eq!(three_day, RentalDuration::MultiDay(3));
        assert_eq!(three_day.multiplier(), 3);
        assert_eq!(three_day.overnight_fee(&config), Money::zero());

        assert_eq!(RentalDuration::classify(-2), RentalDuration::SameDay);
    }
}
