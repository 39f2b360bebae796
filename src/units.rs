//! Size strings with physical units.
//!
//! Sizes are accepted as a non-negative decimal number followed by an
//! optional unit suffix (`pt`, `in`, `cm`, `mm`, case-insensitive). A bare
//! number is in points. Results are rounded to whole points.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};

const POINTS_PER_INCH: f64 = 72.0;
const POINTS_PER_CM: f64 = 28.346457;
const POINTS_PER_MM: f64 = 2.8346457;

fn size_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([0-9]+(?:\.[0-9]*)?|\.[0-9]+)([A-Za-z]*)$").expect("valid size regex")
    })
}

/// Parse a size such as `"12pt"`, `"1in"`, `"2.5cm"` or `"10"` into points.
///
/// # Example
///
/// ```
/// use ptxt::units::parse_size;
///
/// assert_eq!(parse_size("1in").unwrap(), 72);
/// assert_eq!(parse_size("10").unwrap(), 10);
/// ```
pub fn parse_size(input: &str) -> Result<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidSize("size requires a value".to_string()));
    }

    let caps = size_pattern()
        .captures(trimmed)
        .ok_or_else(|| Error::InvalidSize(format!("\"{}\" is not numeric", input)))?;

    let raw: f64 = caps[1]
        .parse()
        .map_err(|_| Error::InvalidSize(format!("\"{}\" is not numeric", input)))?;

    let scale = match caps[2].to_ascii_lowercase().as_str() {
        "" | "pt" => 1.0,
        "in" => POINTS_PER_INCH,
        "cm" => POINTS_PER_CM,
        "mm" => POINTS_PER_MM,
        _ => {
            return Err(Error::InvalidSize(format!(
                "\"{}\" units not recognized",
                input
            )))
        }
    };

    let points = raw * scale;
    if !points.is_finite() || points > u32::MAX as f64 {
        return Err(Error::InvalidSize(format!("\"{}\" is too extreme", input)));
    }

    // Truncate to tenths, then round half up.
    let tenths = (points * 10.0) as u64;
    Ok(((tenths + 5) / 10) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_points() {
        assert_eq!(parse_size("72").unwrap(), 72);
        assert_eq!(parse_size("72pt").unwrap(), 72);
        assert_eq!(parse_size("0").unwrap(), 0);
    }

    #[test]
    fn test_units() {
        assert_eq!(parse_size("1in").unwrap(), 72);
        assert_eq!(parse_size("0.5IN").unwrap(), 36);
        assert_eq!(parse_size("1cm").unwrap(), 28);
        assert_eq!(parse_size("2.54cm").unwrap(), 72);
        assert_eq!(parse_size("10mm").unwrap(), 28);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(parse_size("10.4").unwrap(), 10);
        assert_eq!(parse_size("10.5").unwrap(), 11);
        assert_eq!(parse_size(".5").unwrap(), 1);
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(parse_size(""), Err(Error::InvalidSize(_))));
        assert!(matches!(parse_size("abc"), Err(Error::InvalidSize(_))));
        assert!(matches!(parse_size("-5"), Err(Error::InvalidSize(_))));
        assert!(matches!(parse_size("10 pt"), Err(Error::InvalidSize(_))));
        assert!(matches!(parse_size("10px"), Err(Error::InvalidSize(_))));
    }
}
