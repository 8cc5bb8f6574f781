//! Free-text input parsing.
//!
//! # Responsibility
//! - Turn form and shell field values into validated domain values.
//! - Keep the duration field round-trippable: `parse_hms` accepts what
//!   `format_hms` produces.
//!
//! # Invariants
//! - Parsers never coerce garbage to defaults; bad input is an error.
//! - Minutes and seconds are bounded below 60, hours are unbounded.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::meeting::{MAX_RATING, MIN_RATING};
use crate::model::ValidationError;

static HMS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+):([0-5]?\d):([0-5]?\d)$").expect("valid duration pattern"));

/// Parses a salary field given in thousands of EUR, as salary forms
/// collect it. `"85.5"` means 85 500 EUR per year.
///
/// # Errors
/// - [`ValidationError::InvalidSalary`] when the field is not a finite
///   number.
/// - [`ValidationError::NonPositiveSalary`] when it is zero or negative.
pub fn parse_salary_k_eur(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    let value: f64 = trimmed.parse().map_err(|_| ValidationError::InvalidSalary {
        raw: trimmed.to_string(),
    })?;
    if !value.is_finite() {
        return Err(ValidationError::InvalidSalary {
            raw: trimmed.to_string(),
        });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveSalary { given: value });
    }
    Ok(value)
}

/// Parses a bulk-add participant count.
pub fn parse_count(raw: &str) -> Result<u32, ValidationError> {
    let trimmed = raw.trim();
    trimmed.parse().map_err(|_| ValidationError::InvalidCount {
        raw: trimmed.to_string(),
    })
}

/// Parses a rating field and checks the 1..=5 scale.
pub fn parse_rating(raw: &str) -> Result<u8, ValidationError> {
    let trimmed = raw.trim();
    let rating: u8 = trimmed.parse().map_err(|_| ValidationError::InvalidRating {
        raw: trimmed.to_string(),
    })?;
    validate_rating(rating)?;
    Ok(rating)
}

/// Checks a rating against the 1..=5 scale.
pub fn validate_rating(rating: u8) -> Result<(), ValidationError> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::RatingOutOfRange { given: rating });
    }
    Ok(())
}

/// Parses a strict `HH:MM:SS` duration into seconds.
///
/// Hours may run past two digits; minutes and seconds must stay below 60.
///
/// # Errors
/// [`ValidationError::InvalidDuration`] for anything else, including
/// values whose hour field overflows.
pub fn parse_hms(raw: &str) -> Result<u64, ValidationError> {
    let trimmed = raw.trim();
    let invalid = || ValidationError::InvalidDuration {
        raw: trimmed.to_string(),
    };
    let caps = HMS_RE.captures(trimmed).ok_or_else(invalid)?;
    let hours: u64 = caps[1].parse().map_err(|_| invalid())?;
    let minutes: u64 = caps[2].parse().map_err(|_| invalid())?;
    let seconds: u64 = caps[3].parse().map_err(|_| invalid())?;
    hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60 + seconds))
        .ok_or_else(invalid)
}

/// Renders seconds as zero-padded `HH:MM:SS`. Hours never wrap, so long
/// meetings stay readable (`27:46:40` after 100 000 seconds).
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salary_is_given_in_thousands() {
        assert_eq!(parse_salary_k_eur("85.5").unwrap(), 85.5);
        assert_eq!(parse_salary_k_eur(" 120 ").unwrap(), 120.0);
    }

    #[test]
    fn salary_rejects_garbage_and_non_positive() {
        assert!(matches!(
            parse_salary_k_eur("abc"),
            Err(ValidationError::InvalidSalary { .. })
        ));
        assert!(matches!(
            parse_salary_k_eur("NaN"),
            Err(ValidationError::InvalidSalary { .. })
        ));
        assert!(matches!(
            parse_salary_k_eur("0"),
            Err(ValidationError::NonPositiveSalary { .. })
        ));
        assert!(matches!(
            parse_salary_k_eur("-12"),
            Err(ValidationError::NonPositiveSalary { .. })
        ));
    }

    #[test]
    fn count_parses_whole_numbers_only() {
        assert_eq!(parse_count("7").unwrap(), 7);
        assert!(parse_count("7.5").is_err());
        assert!(parse_count("-1").is_err());
    }

    #[test]
    fn rating_scale_is_one_to_five() {
        assert_eq!(parse_rating("1").unwrap(), 1);
        assert_eq!(parse_rating("5").unwrap(), 5);
        assert!(matches!(
            parse_rating("0"),
            Err(ValidationError::RatingOutOfRange { given: 0 })
        ));
        assert!(matches!(
            parse_rating("6"),
            Err(ValidationError::RatingOutOfRange { given: 6 })
        ));
        assert!(matches!(
            parse_rating("five"),
            Err(ValidationError::InvalidRating { .. })
        ));
    }

    #[test]
    fn hms_parses_strict_fields() {
        assert_eq!(parse_hms("00:00:00").unwrap(), 0);
        assert_eq!(parse_hms("01:01:01").unwrap(), 3661);
        assert_eq!(parse_hms("100:00:00").unwrap(), 360_000);
        assert_eq!(parse_hms("0:5:9").unwrap(), 309);
    }

    #[test]
    fn hms_rejects_out_of_range_fields() {
        assert!(parse_hms("00:60:00").is_err());
        assert!(parse_hms("00:00:61").is_err());
        assert!(parse_hms("1:02").is_err());
        assert!(parse_hms("").is_err());
        assert!(parse_hms("01:02:03:04").is_err());
    }

    #[test]
    fn format_round_trips_through_parse() {
        for seconds in [0, 59, 60, 3599, 3600, 3661, 100_000] {
            assert_eq!(parse_hms(&format_hms(seconds)).unwrap(), seconds);
        }
    }

    #[test]
    fn format_pads_and_never_wraps() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(59), "00:00:59");
        assert_eq!(format_hms(3661), "01:01:01");
        assert_eq!(format_hms(100_000), "27:46:40");
    }
}
