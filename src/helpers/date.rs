//! Date helper functions

use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;

use super::html::html_escape;

/// Format a date using Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "YYYY-MM-DD") // -> "2024-01-15"
/// ```
pub fn format_date<Tz2: TimeZone>(date: &DateTime<Tz2>, format: &str) -> String
where
    Tz2::Offset: std::fmt::Display,
{
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// Generate a <time> HTML element
pub fn time_tag(date: &DateTime<Utc>, tz: Tz, format: &str, class: &str) -> String {
    let local = date.with_timezone(&tz);
    let datetime = local.format("%Y-%m-%dT%H:%M:%S%:z").to_string();
    let display = format_date(&local, format);
    format!(
        r#"<time datetime="{}" class="{}">{}</time>"#,
        datetime,
        html_escape(class),
        html_escape(&display)
    )
}

/// Convert Moment.js format to chrono format
fn moment_to_chrono_format(format: &str) -> String {
    // Longest tokens first within each unit
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DDDD", "%j"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
        ("ZZ", "%z"),
        ("SSS", "%3f"),
    ];

    let mut result = format.to_string();

    for (from, to) in replacements {
        result = result.replace(from, to);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> DateTime<Utc> {
        "2024-01-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&date(), "YYYY-MM-DD"), "2024-01-01");
        assert_eq!(format_date(&date(), "YYYY/MM/DD HH:mm"), "2024/01/01 00:00");
    }

    #[test]
    fn test_time_tag_in_timezone() {
        // the previous evening in New York
        assert_eq!(
            time_tag(&date(), chrono_tz::America::New_York, "YYYY-MM-DD", "d"),
            r#"<time datetime="2023-12-31T19:00:00-05:00" class="d">2023-12-31</time>"#
        );
    }

    #[test]
    fn test_time_tag() {
        assert_eq!(
            time_tag(&date(), Tz::UTC, "YYYY-MM-DD", "date"),
            r#"<time datetime="2024-01-01T00:00:00+00:00" class="date">2024-01-01</time>"#
        );
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
    }
}
