use chrono::{DateTime, Utc};

/// `93784` seconds → `"1d 2h 3m"`.
pub fn format_uptime(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let days = total / 86_400;
    let hours = (total % 86_400) / 3_600;
    let minutes = (total % 3_600) / 60;
    format!("{}d {}h {}m", days, hours, minutes)
}

/// Coarse age of `then` relative to `now`.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();
    let hours = minutes / 60;
    let days = hours / 24;

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{} min ago", minutes)
    } else if hours < 24 {
        format!("{} h ago", hours)
    } else {
        format!("{} days ago", days)
    }
}

/// Bytes as mebibytes with one decimal.
pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(93_784.9), "1d 2h 3m");
        assert_eq!(format_uptime(59.0), "0d 0h 0m");
        assert_eq!(format_uptime(-5.0), "0d 0h 0m");
        assert_eq!(format_uptime(f64::NAN), "0d 0h 0m");
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = Utc::now();
        assert_eq!(relative_time(now - Duration::seconds(30), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5 min ago");
        assert_eq!(relative_time(now - Duration::minutes(150), now), "2 h ago");
        assert_eq!(relative_time(now - Duration::hours(50), now), "2 days ago");
        assert_eq!(relative_time(now + Duration::minutes(5), now), "just now");
    }

    #[test]
    fn test_format_megabytes() {
        assert_eq!(format_megabytes(52_428_800), "50.0 MB");
    }
}
