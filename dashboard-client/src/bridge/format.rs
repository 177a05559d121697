//! Text formatting of reading values

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// Class every status card keeps regardless of comfort
pub const STATUS_CARD_BASE_CLASS: &str = "status-card";

/// Round to one decimal place, halves away from zero.
///
/// Negative values that round to zero are shown as `0.0`.
pub fn format_one_decimal(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0 + 0.0;
    format!("{:.1}", rounded)
}

pub fn format_celsius(value: f64) -> String {
    format!("{} °C", format_one_decimal(value))
}

pub fn format_percent(value: f64) -> String {
    format!("{} %", format_one_decimal(value))
}

/// Style class selected by a comfort label: `status-` + lowercased label.
///
/// Whitespace becomes `-` so the result is always a single class token.
pub fn comfort_class(comfort_status: &str) -> String {
    let key: String = comfort_status
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .collect();
    format!("status-{}", key)
}

/// Whether `format` is a usable `strftime` pattern
pub fn is_valid_timestamp_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

pub fn format_timestamp<Tz>(at: &DateTime<Tz>, format: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    at.format(format).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveDate};

    #[test]
    fn test_rounds_half_away_from_zero() {
        assert_eq!(format_one_decimal(23.45), "23.5");
        assert_eq!(format_one_decimal(23.44), "23.4");
        assert_eq!(format_one_decimal(-3.25), "-3.3");
    }

    #[test]
    fn test_always_one_decimal() {
        assert_eq!(format_one_decimal(20.0), "20.0");
        assert_eq!(format_one_decimal(0.0), "0.0");
        assert_eq!(format_one_decimal(99.96), "100.0");
    }

    #[test]
    fn test_no_negative_zero() {
        assert_eq!(format_one_decimal(-0.04), "0.0");
        assert_eq!(format_one_decimal(-0.0), "0.0");
    }

    #[test]
    fn test_unit_suffixes() {
        assert_eq!(format_celsius(23.45), "23.5 °C");
        assert_eq!(format_percent(61.0), "61.0 %");
    }

    #[test]
    fn test_comfort_class_lowercases() {
        assert_eq!(comfort_class("Confortável"), "status-confortável");
        assert_eq!(comfort_class("PERIGOSO"), "status-perigoso");
    }

    #[test]
    fn test_comfort_class_is_single_token() {
        assert_eq!(comfort_class(" Muito Quente "), "status-muito-quente");
        assert_eq!(comfort_class(""), "status-");
    }

    #[test]
    fn test_timestamp_format_validation() {
        assert!(is_valid_timestamp_format("%d/%m/%Y %H:%M:%S"));
        assert!(is_valid_timestamp_format("%c"));
        assert!(!is_valid_timestamp_format("%Q"));
    }

    #[test]
    fn test_format_timestamp() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap()
            .and_local_timezone(FixedOffset::west_opt(3 * 3600).unwrap())
            .unwrap();

        assert_eq!(format_timestamp(&at, "%d/%m/%Y %H:%M:%S"), "18/10/2026 09:05:07");
    }
}
