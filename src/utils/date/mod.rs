// Date utility functions
// Labels shown by the timeline header and the edit panel

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// "October 2026"
pub fn month_year_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}

/// "Mon"
pub fn weekday_short(date: NaiveDate) -> String {
    date.format("%a").to_string()
}

/// "Monday, October 19"
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

/// "07:00" for the time column
pub fn hour_label(hour: u32) -> String {
    format!("{hour:02}:00")
}

/// 24-hour "HH:MM"
pub fn format_hm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// 12-hour "09:15 AM"
pub fn format_12h(date_time: NaiveDateTime) -> String {
    date_time.format("%I:%M %p").to_string()
}

/// "45 minutes", "1h 30m" or "2h"
pub fn duration_label(duration: Duration) -> String {
    let minutes = duration.num_minutes().abs();
    if minutes < 60 {
        return format!("{minutes} minutes");
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    if rest > 0 {
        format!("{hours}h {rest}m")
    } else {
        format!("{hours}h")
    }
}

pub fn is_same_day(a: NaiveDateTime, b: NaiveDateTime) -> bool {
    a.date() == b.date()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_header_labels() {
        assert_eq!(month_year_label(date()), "October 2026");
        assert_eq!(weekday_short(date()), "Mon");
        assert_eq!(long_date(date()), "Monday, October 19");
        assert_eq!(hour_label(7), "07:00");
    }

    #[test]
    fn test_time_labels() {
        let at = date().and_hms_opt(21, 5, 0).unwrap();
        assert_eq!(format_hm(at.time()), "21:05");
        assert_eq!(format_12h(at), "09:05 PM");
    }

    #[test_case(0 => "0 minutes")]
    #[test_case(45 => "45 minutes")]
    #[test_case(60 => "1h")]
    #[test_case(90 => "1h 30m")]
    #[test_case(-135 => "2h 15m"; "negative spans are measured by length")]
    fn test_duration_label(minutes: i64) -> String {
        duration_label(Duration::minutes(minutes))
    }

    #[test]
    fn test_is_same_day() {
        let morning = date().and_hms_opt(8, 0, 0).unwrap();
        assert!(is_same_day(morning, morning + Duration::hours(15)));
        assert!(!is_same_day(morning, morning + Duration::hours(16)));
    }
}
