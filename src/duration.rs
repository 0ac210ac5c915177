//! Human-readable durations like "15m", "24h" for config values.

use std::time::Duration;

use serde::{de, Deserialize, Deserializer};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParseDurationError {
    #[error("duration {0:?} must end with d, h, m, or s")]
    MissingUnit(String),
    #[error("invalid number in duration {0:?}")]
    InvalidNumber(String),
    #[error("duration {0:?} is too large")]
    Overflow(String),
}

/// Parse a duration string like "7d", "24h", "15m", "90s".
///
/// Units: `d` days, `h` hours, `m` minutes, `s` seconds. Case-insensitive,
/// surrounding whitespace is ignored.
pub fn parse_duration(s: &str) -> Result<Duration, ParseDurationError> {
    let trimmed = s.trim().to_lowercase();
    let (number, per_unit) = match trimmed.strip_suffix(['d', 'h', 'm', 's']) {
        Some(number) => {
            let per_unit: u64 = match trimmed.as_bytes()[trimmed.len() - 1] {
                b'd' => 24 * 60 * 60,
                b'h' => 60 * 60,
                b'm' => 60,
                _ => 1,
            };
            (number, per_unit)
        }
        None => return Err(ParseDurationError::MissingUnit(s.to_string())),
    };

    let number: u64 = number
        .trim()
        .parse()
        .map_err(|_| ParseDurationError::InvalidNumber(s.to_string()))?;
    let secs = number
        .checked_mul(per_unit)
        .ok_or_else(|| ParseDurationError::Overflow(s.to_string()))?;

    Ok(Duration::from_secs(secs))
}

/// Format a duration with the largest unit that divides it evenly.
pub fn format_duration(d: Duration) -> String {
    const SECS_PER_DAY: u64 = 24 * 60 * 60;
    const SECS_PER_HOUR: u64 = 60 * 60;
    const SECS_PER_MINUTE: u64 = 60;

    let secs = d.as_secs();
    if secs >= SECS_PER_DAY && secs % SECS_PER_DAY == 0 {
        format!("{}d", secs / SECS_PER_DAY)
    } else if secs >= SECS_PER_HOUR && secs % SECS_PER_HOUR == 0 {
        format!("{}h", secs / SECS_PER_HOUR)
    } else if secs >= SECS_PER_MINUTE && secs % SECS_PER_MINUTE == 0 {
        format!("{}m", secs / SECS_PER_MINUTE)
    } else {
        format!("{secs}s")
    }
}

/// Serde deserializer for duration strings.
///
/// Use with `#[serde(deserialize_with = "deserialize_duration")]`.
pub fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_duration(&s).map_err(de::Error::custom)
}
