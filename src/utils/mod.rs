use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Parse a `from`/`to` filter bound. Accepts RFC 3339 (converted to UTC),
/// `YYYY-MM-DDTHH:MM:SS[.fff]`, `YYYY-MM-DD HH:MM:SS` and plain dates (midnight).
pub fn parse_date_bound(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Convert probability to fair decimal odds
pub fn probability_to_odds(probability: f64) -> f64 {
    if probability <= 0.0 || probability >= 1.0 {
        return 1000.0; // Very high odds for impossible/certain events
    }
    1.0 / probability
}
