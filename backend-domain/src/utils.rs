use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};

/// Accepts `YYYY-MM-DD` and the legacy `DD-MM-YYYY` form.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    let trimmed = date.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d-%m-%Y"))
        .map_err(|err| anyhow!("invalid date '{}': {}", trimmed, err))
}

/// Calendar day in the server's local timezone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}
