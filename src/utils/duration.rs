//! Duration parsing utilities.
//!
//! Command-line overrides for the simulation window and hello interval are
//! given as short strings (e.g. "500ms", "5s", "1m").

use std::time::Duration;

/// Parse a duration string into a [`Duration`]
///
/// Supports:
/// - Raw seconds: "5"
/// - Milliseconds: "250ms", "250msec", "250millis"
/// - Seconds: "5s", "5sec", "5secs", "5second", "5seconds"
/// - Minutes: "2m", "2min", "2mins", "2minute", "2minutes"
///
/// # Examples
/// ```
/// use netlab::utils::duration::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("5"), Ok(Duration::from_secs(5)));
/// assert_eq!(parse_duration("250ms"), Ok(Duration::from_millis(250)));
/// assert!(parse_duration("soon").is_err());
/// ```
pub fn parse_duration(duration: &str) -> Result<Duration, String> {
    let duration = duration.trim();
    let (num_str, unit) = duration.split_at(number_end(duration));

    let value = num_str
        .parse::<u64>()
        .map_err(|_| format!("Invalid duration format: {}", duration))?;

    // Longer suffixes first so "ms" is not read as minutes
    match unit {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => Ok(Duration::from_secs(value)),
        "ms" | "msec" | "millis" => Ok(Duration::from_millis(value)),
        "m" | "min" | "mins" | "minute" | "minutes" => value
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("Duration out of range: {}", duration)),
        _ => Err(format!("Invalid duration format: {}", duration)),
    }
}

/// Index of the first non-digit character
fn number_end(duration: &str) -> usize {
    duration
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(duration.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("0"), Ok(Duration::ZERO));
        assert_eq!(parse_duration("5s"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_duration("5seconds"), Ok(Duration::from_secs(5)));
        assert_eq!(parse_duration(" 750ms "), Ok(Duration::from_millis(750)));
        assert_eq!(parse_duration("2m"), Ok(Duration::from_secs(120)));
        assert_eq!(parse_duration("2minutes"), Ok(Duration::from_secs(120)));

        assert!(parse_duration("").is_err());
        assert!(parse_duration("ms").is_err());
        assert!(parse_duration("5x").is_err());
        assert!(parse_duration("5secondsx").is_err());
    }

    #[test]
    fn test_parse_duration_overflow() {
        assert!(parse_duration("307445734561825861m").is_err());
        assert!(parse_duration("99999999999999999999").is_err());
        assert_eq!(
            parse_duration("307445734561825860m"),
            Ok(Duration::from_secs(307_445_734_561_825_860 * 60))
        );
    }
}
