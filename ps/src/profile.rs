//! Profile record gathered during onboarding

use serde::{Deserialize, Serialize};

/// Persisted per-user attributes
///
/// Created when onboarding completes and overwritten wholesale when the user
/// onboards again. Availability figures are whatever the user typed, so either,
/// both, or neither may be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub hours_per_day: Option<f64>,

    #[serde(default)]
    pub hours_per_week: Option<f64>,
}

impl Profile {
    /// Create a profile with no availability set
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            hours_per_day: None,
            hours_per_week: None,
        }
    }

    /// Set the daily availability
    pub fn with_hours_per_day(mut self, hours: f64) -> Self {
        self.hours_per_day = Some(hours);
        self
    }

    /// Set the weekly availability
    pub fn with_hours_per_week(mut self, hours: f64) -> Self {
        self.hours_per_week = Some(hours);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_with_nulls() {
        let json = r#"{"name":"Ada","role":"student","hours_per_day":null,"hours_per_week":10.0}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name, "Ada");
        assert_eq!(profile.hours_per_day, None);
        assert_eq!(profile.hours_per_week, Some(10.0));
    }

    #[test]
    fn test_deserialize_missing_fields() {
        let profile: Profile = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();
        assert_eq!(profile.role, "");
        assert_eq!(profile.hours_per_day, None);
        assert_eq!(profile.hours_per_week, None);
    }

    #[test]
    fn test_builders() {
        let profile = Profile::new("Ada", "engineer").with_hours_per_day(1.5);
        assert_eq!(profile.hours_per_day, Some(1.5));
        assert_eq!(profile.hours_per_week, None);
    }
}
