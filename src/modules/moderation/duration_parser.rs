use chrono::Duration;
use regex::Regex;

/// Parses a duration of the form `<digits><unit>` with unit one of
/// s, m, h, d (case-insensitive). The whole input must match: trailing
/// characters make it invalid.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let re = Regex::new(r"(?i)^(\d+)([dhms])$").unwrap();
    let cap = re.captures(s)?;

    let value: i64 = cap[1].parse().ok()?;
    let multiplier = match cap[2].to_lowercase().as_str() {
        "d" => 24 * 3600,
        "h" => 3600,
        "m" => 60,
        "s" => 1,
        _ => return None,
    };

    value.checked_mul(multiplier).and_then(Duration::try_seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("10s"), Some(Duration::seconds(10)));
        assert_eq!(parse_duration("5m"), Some(Duration::seconds(300)));
        assert_eq!(parse_duration("1h"), Some(Duration::seconds(3600)));
        assert_eq!(parse_duration("2d"), Some(Duration::seconds(172800)));
    }

    #[test]
    fn test_parse_duration_case_insensitive() {
        assert_eq!(parse_duration("2D"), Some(Duration::seconds(172800)));
        assert_eq!(parse_duration("10S"), Some(Duration::seconds(10)));
    }

    #[test]
    fn test_parse_duration_invalid() {
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("10"), None);
        assert_eq!(parse_duration("s"), None);
        assert_eq!(parse_duration("10x"), None);
    }

    #[test]
    fn test_parse_duration_rejects_trailing_garbage() {
        assert_eq!(parse_duration("10s extra"), None);
        assert_eq!(parse_duration("10sx"), None);
        assert_eq!(parse_duration(" 10s"), None);
        // Exactly one value+unit pair is accepted.
        assert_eq!(parse_duration("10m30s"), None);
    }

    #[test]
    fn test_parse_duration_overflow() {
        assert_eq!(parse_duration("9999999999999999999999s"), None);
        assert_eq!(parse_duration("999999999999999d"), None);
    }
}
