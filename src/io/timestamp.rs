//! ISO-8601 timestamp handling for frame records.
//!
//! Input accepts `YYYY-MM-DDTHH:MM:SS` with optional fractional seconds;
//! output is canonical with exactly six fractional digits. Timestamps are
//! UTC and travel through the engine as f64 seconds since the epoch, which
//! holds microsecond precision exactly for any realistic date.

use chrono::{DateTime, NaiveDateTime};

use crate::error::Error;

const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Parse an ISO-8601 UTC timestamp into seconds since the epoch.
pub fn parse_iso(value: &str) -> Result<f64, Error> {
    let naive = NaiveDateTime::parse_from_str(value, INPUT_FORMAT).map_err(|source| {
        Error::Timestamp {
            value: value.to_string(),
            source,
        }
    })?;
    Ok(naive.and_utc().timestamp_micros() as f64 / 1e6)
}

/// Format seconds since the epoch canonically, microseconds rounded to
/// nearest.
pub fn format_iso(seconds: f64) -> String {
    let micros = (seconds * 1e6).round() as i64;
    let secs = micros.div_euclid(1_000_000);
    let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
    let utc = DateTime::from_timestamp(secs, nanos)
        .expect("timestamp out of representable range");
    utc.format(OUTPUT_FORMAT).to_string()
}
