/// Human-readable formatting for sizes, counts and file ages.
///
/// Everything is stored as integer bytes / `SystemTime`; floating point
/// only appears at this display boundary.
use std::time::{Duration, SystemTime};

const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];

/// Format a byte count with a binary unit (1 KB = 1024 B).
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    // Two decimals from GB upwards, one below.
    if unit >= 2 {
        format!("{value:.2} {}", UNITS[unit])
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Format a count with thousand separators.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Describe how long ago `modified` was, relative to `now`.
///
/// Returns `None` for timestamps in the future (clock skew, odd mounts).
pub fn format_age(modified: SystemTime, now: SystemTime) -> Option<String> {
    let elapsed: Duration = now.duration_since(modified).ok()?;
    let days = elapsed.as_secs() / 86_400;
    Some(match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=364 => format!("{days} days ago"),
        _ => format!("{:.1} years ago", days as f64 / 365.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_below_a_kilobyte_are_exact() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn sizes_pick_the_largest_fitting_unit() {
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_048_576), "1.0 MB");
        assert_eq!(format_size(1_073_741_824), "1.00 GB");
        assert_eq!(format_size(1_099_511_627_776), "1.00 TB");
    }

    #[test]
    fn counts_get_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn ages_are_bucketed_by_day() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000 * 86_400);
        let day = Duration::from_secs(86_400);
        assert_eq!(format_age(now, now).as_deref(), Some("Today"));
        assert_eq!(format_age(now - day, now).as_deref(), Some("Yesterday"));
        assert_eq!(format_age(now - day * 30, now).as_deref(), Some("30 days ago"));
        assert_eq!(format_age(now - day * 730, now).as_deref(), Some("2.0 years ago"));
        assert_eq!(format_age(now + day, now), None);
    }
}
