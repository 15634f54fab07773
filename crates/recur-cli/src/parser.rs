use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_english::{parse_date_string, Dialect};

/// Parses a due date given as `YYYY-MM-DD`, RFC 3339, or English ("next friday").
///
/// The service stores due dates at day precision, so plain dates map to midnight UTC.
pub fn parse_due_date(date_str: &str) -> Result<DateTime<Utc>> {
    parse_due_date_at(date_str, Utc::now())
}

pub fn parse_due_date_at(date_str: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let input = date_str.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Ok(parsed.with_timezone(&Utc));
    }
    parse_date_string(input, now, Dialect::Us)
        .map_err(|e| anyhow::anyhow!("Failed to parse due date '{}': {}", date_str, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 10, 0, 0).unwrap()
    }

    #[rstest]
    #[case("2024-06-01", Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())]
    #[case("2024-06-01T08:30:00Z", Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap())]
    #[case("2024-06-01T10:30:00+02:00", Utc.with_ymd_and_hms(2024, 6, 1, 8, 30, 0).unwrap())]
    fn test_explicit_formats(#[case] input: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_due_date_at(input, now()).unwrap(), expected);
    }

    #[test]
    fn test_english() {
        let tomorrow = parse_due_date_at("tomorrow", now()).unwrap();
        assert_eq!(tomorrow.date_naive(), (now() + Duration::days(1)).date_naive());
    }

    #[test]
    fn test_garbage() {
        assert!(parse_due_date_at("whenever", now()).is_err());
    }
}
