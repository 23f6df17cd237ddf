//! Availability parsing and formatting
//!
//! Best-effort lexical extraction of hours from free-form text. An unlabeled
//! number is read as hours per week; that convention is relied on by stored
//! profiles and changes plan intensity if altered.

use std::sync::LazyLock;

use profilestore::Profile;
use regex::Regex;
use tracing::debug;

static PER_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*h\s*/\s*day").expect("per-day pattern is valid"));

static PER_WEEK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+(?:\.[0-9]+)?)\s*h\s*/\s*week").expect("per-week pattern is valid"));

static BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+(?:\.[0-9]+)?)").expect("number pattern is valid"));

/// Hours extracted from availability text
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Availability {
    pub hours_per_day: Option<f64>,
    pub hours_per_week: Option<f64>,
}

impl Availability {
    /// Parse free-form availability text
    ///
    /// "h/day" and "h/week" figures are matched independently, so both may be
    /// set. When neither matches, the first bare number becomes hours per week.
    pub fn parse(text: &str) -> Self {
        debug!(%text, "Availability::parse: called");
        let lower = text.to_lowercase();

        let hours_per_day = first_number(&PER_DAY, &lower);
        let hours_per_week = first_number(&PER_WEEK, &lower);

        if hours_per_day.is_none() && hours_per_week.is_none() {
            let bare = first_number(&BARE_NUMBER, &lower);
            debug!(?bare, "Availability::parse: no unit matched, using bare number as weekly");
            return Self {
                hours_per_day: None,
                hours_per_week: bare,
            };
        }

        Self {
            hours_per_day,
            hours_per_week,
        }
    }

    /// Availability recorded on a profile
    pub fn of(profile: &Profile) -> Self {
        Self {
            hours_per_day: profile.hours_per_day,
            hours_per_week: profile.hours_per_week,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hours_per_day.is_none() && self.hours_per_week.is_none()
    }

    /// Populated segments, e.g. `["~2.0h/day", "~10.0h/week"]`
    ///
    /// A zero figure counts as not populated.
    pub fn segments(&self) -> Vec<String> {
        let mut segments = Vec::new();
        if let Some(day) = self.hours_per_day.filter(|h| *h != 0.0) {
            segments.push(format!("~{}h/day", format_hours(day)));
        }
        if let Some(week) = self.hours_per_week.filter(|h| *h != 0.0) {
            segments.push(format!("~{}h/week", format_hours(week)));
        }
        segments
    }

    /// Segments joined with ", ", or "unspecified availability"
    pub fn describe(&self) -> String {
        let segments = self.segments();
        if segments.is_empty() {
            "unspecified availability".to_string()
        } else {
            segments.join(", ")
        }
    }
}

/// Parse free-form availability text
pub fn parse_availability(text: &str) -> Availability {
    Availability::parse(text)
}

/// Render hours the way stored profiles have always shown them: `2.0`, `1.5`
pub fn format_hours(hours: f64) -> String {
    if hours.is_finite() && hours.fract() == 0.0 && hours.abs() < 1e16 {
        format!("{:.1}", hours)
    } else {
        format!("{}", hours)
    }
}

fn first_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_daily() {
        let a = Availability::parse("2h/day");
        assert_eq!(a.hours_per_day, Some(2.0));
        assert_eq!(a.hours_per_week, None);
    }

    #[test]
    fn test_parse_weekly() {
        let a = Availability::parse("10h/week");
        assert_eq!(a.hours_per_day, None);
        assert_eq!(a.hours_per_week, Some(10.0));
    }

    #[test]
    fn test_parse_both() {
        let a = Availability::parse("2h/day and 10h/week");
        assert_eq!(a.hours_per_day, Some(2.0));
        assert_eq!(a.hours_per_week, Some(10.0));
    }

    #[test]
    fn test_parse_bare_number_is_weekly() {
        let a = Availability::parse("just 5");
        assert_eq!(a.hours_per_day, None);
        assert_eq!(a.hours_per_week, Some(5.0));

        // Unit words that don't match the h/day pattern still count as bare numbers
        let a = Availability::parse("2 hours");
        assert_eq!(a.hours_per_week, Some(2.0));
    }

    #[test]
    fn test_parse_no_numbers() {
        let a = Availability::parse("no numbers here");
        assert_eq!(a, Availability::default());
        assert!(a.is_empty());
    }

    #[test]
    fn test_parse_case_spacing_and_decimals() {
        let a = Availability::parse("About 1.5 H / Day, maybe 8 h/WEEK");
        assert_eq!(a.hours_per_day, Some(1.5));
        assert_eq!(a.hours_per_week, Some(8.0));
    }

    #[test]
    fn test_parse_first_match_wins() {
        let a = Availability::parse("3h/day on weekdays, 5h/day on weekends");
        assert_eq!(a.hours_per_day, Some(3.0));
        assert_eq!(a.hours_per_week, None);
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(2.0), "2.0");
        assert_eq!(format_hours(10.0), "10.0");
        assert_eq!(format_hours(1.5), "1.5");
        assert_eq!(format_hours(0.25), "0.25");
    }

    #[test]
    fn test_describe() {
        let both = Availability {
            hours_per_day: Some(2.0),
            hours_per_week: Some(10.0),
        };
        assert_eq!(both.describe(), "~2.0h/day, ~10.0h/week");

        let weekly = Availability {
            hours_per_day: None,
            hours_per_week: Some(14.0),
        };
        assert_eq!(weekly.describe(), "~14.0h/week");

        assert_eq!(Availability::default().describe(), "unspecified availability");

        let zero = Availability {
            hours_per_day: Some(0.0),
            hours_per_week: None,
        };
        assert_eq!(zero.describe(), "unspecified availability");
    }
}
