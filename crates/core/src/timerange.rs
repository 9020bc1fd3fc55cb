//! Parsing of `<integer><unit>` time range strings (`"30m"`, `"1h"`, `"7d"`, `"2w"`).
//!
//! Malformed input degrades to the one-hour default instead of failing; the
//! query path must never reject a request over a bad range string.

use chrono::Duration;

/// Fallback window applied when a range string cannot be parsed.
fn default_range() -> Duration {
    Duration::hours(1)
}

/// Parse a time range string into a duration.
///
/// The accepted grammar is a positive integer followed by one of `m`
/// (minutes), `h` (hours), `d` (days), or `w` (weeks). Anything else,
/// including a zero or negative count, yields the one-hour default.
pub fn parse_time_range(range: &str) -> Duration {
    let range = range.trim();

    let split = range
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i);

    let Some(split) = split else {
        return default_range();
    };

    let (count, unit) = range.split_at(split);
    let Ok(count) = count.parse::<i64>() else {
        return default_range();
    };
    if count <= 0 {
        return default_range();
    }

    match unit {
        "m" => Duration::minutes(count),
        "h" => Duration::hours(count),
        "d" => Duration::days(count),
        "w" => Duration::weeks(count),
        _ => default_range(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_unit() {
        assert_eq!(parse_time_range("30m"), Duration::minutes(30));
        assert_eq!(parse_time_range("1h"), Duration::hours(1));
        assert_eq!(parse_time_range("7d"), Duration::days(7));
        assert_eq!(parse_time_range("2w"), Duration::weeks(2));
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(parse_time_range(" 24h "), Duration::hours(24));
    }

    #[test]
    fn malformed_input_defaults_to_one_hour() {
        for input in ["", "h", "12", "5y", "7dd", "-3h", "1.5h", "abc"] {
            assert_eq!(parse_time_range(input), Duration::hours(1), "input: {input:?}");
        }
    }

    #[test]
    fn zero_count_defaults_to_one_hour() {
        assert_eq!(parse_time_range("0m"), Duration::hours(1));
    }
}
