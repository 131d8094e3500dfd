use chrono::{DateTime, NaiveDate, Utc};

const ISO_DATE: &str = "%Y-%m-%d";

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp into a UTC calendar day.
///
/// Impossible days such as `2024-02-30` are rejected instead of rolling over,
/// and a date-only string must be in canonical zero-padded form.
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(text, ISO_DATE) {
        return (format_iso_date(date) == text).then_some(date);
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc).date_naive())
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE).to_string()
}

/// Current UTC calendar day, read at call time.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
