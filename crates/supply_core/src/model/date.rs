//! Calendar date parsing shared by order validation and record decoding.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

/// Parses a caller-supplied calendar date.
///
/// Accepts `YYYY-MM-DD` and RFC 3339 timestamps (date part kept), after
/// trimming surrounding whitespace. Returns `None` for anything else.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|timestamp| timestamp.date_naive())
}

/// Serde adapter decoding a required date through [`parse_date`].
pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid calendar date `{raw}`")))
}

/// Serde adapter decoding an optional date through [`parse_date`].
pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_date(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid calendar date `{raw}`"))),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_date;
    use chrono::NaiveDate;

    #[test]
    fn parse_date_accepts_plain_and_rfc3339_forms() {
        let expected = NaiveDate::from_ymd_opt(2025, 10, 25).unwrap();
        assert_eq!(parse_date("2025-10-25"), Some(expected));
        assert_eq!(parse_date("  2025-10-25 "), Some(expected));
        assert_eq!(parse_date("2025-10-25T08:30:00.000Z"), Some(expected));
    }

    #[test]
    fn parse_date_rejects_garbage_and_impossible_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("next tuesday"), None);
        assert_eq!(parse_date("2025-02-30"), None);
    }
}
