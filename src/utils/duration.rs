//! Human-readable durations for V8 log timestamps (microseconds).

/// Format a timestamp delta in microseconds
///
/// `None` means the duration could not be measured and renders as `?s`.
/// The microsecond remainder is always shown; milliseconds appear above
/// 1000μs and whole seconds above one second.
///
/// # Example
/// ```
/// use v8_insights::utils::format_duration;
///
/// assert_eq!(format_duration(Some(1500)), "1ms 500μs");
/// ```
pub fn format_duration(micros: Option<u64>) -> String {
    let Some(value) = micros else {
        return "?s".to_string();
    };

    let mut result = format!("{}μs", value % 1000);

    if value > 1000 {
        result = format!("{}ms {}", (value / 1000) % 1000, result);
    }

    if value > 1000 * 1000 {
        result = format!("{}s {}", value / 1000 / 1000, result);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_duration() {
        assert_eq!(format_duration(None), "?s");
    }

    #[test]
    fn test_tiers() {
        assert_eq!(format_duration(Some(500)), "500μs");
        assert_eq!(format_duration(Some(1500)), "1ms 500μs");
        assert_eq!(format_duration(Some(2_500_000)), "2s 500ms 0μs");
    }

    #[test]
    fn test_boundaries_are_exclusive() {
        assert_eq!(format_duration(Some(1000)), "0μs");
        assert_eq!(format_duration(Some(1_000_000)), "0ms 0μs");
        assert_eq!(format_duration(Some(0)), "0μs");
    }
}
