use chrono::{DateTime, Local};

/// This is the standard way of converting a report timestamp to a string in focus-recommender.
pub fn report_timestamp(date: DateTime<Local>) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}

/// Human readable form of a minute count, e.g. `1h30m`. Negative values keep their sign. Works
/// for the whole `i64` range, totals of malformed logs can get that far.
pub fn format_minutes(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let v = minutes.unsigned_abs();
    let (hours, rest) = (v / 60, v % 60);
    if hours > 0 {
        format!("{sign}{hours}h{rest}m")
    } else {
        format!("{sign}{rest}m")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};

    use super::{format_minutes, report_timestamp};

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "0m");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(90), "1h30m");
        assert_eq!(format_minutes(600), "10h0m");
        assert_eq!(format_minutes(-30), "-30m");
        assert_eq!(format_minutes(-90), "-1h30m");
    }

    #[test]
    fn test_format_minutes_extremes() {
        assert_eq!(format_minutes(i64::MIN), "-153722867280912930h8m");
        assert_eq!(format_minutes(i64::MAX), "153722867280912930h7m");
        assert_eq!(format_minutes(-1_000_000_000_000_000_000), "-16666666666666666h40m");
    }

    #[test]
    fn test_report_timestamp() {
        let date = Local.with_ymd_and_hms(2024, 3, 15, 9, 5, 0).unwrap();
        assert_eq!(report_timestamp(date), "2024-03-15 09:05");
    }
}
