// Settings module
// User preferences persisted as TOML in the platform config directory

use serde::{Deserialize, Serialize};

pub const DEFAULT_REFERENCE_TIMEZONE: &str = "Asia/Kolkata";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// IANA name of the zone the "now" indicator follows
    pub reference_timezone: String,
    /// "light" or "dark"
    pub theme: String,
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            reference_timezone: DEFAULT_REFERENCE_TIMEZONE.to_string(),
            theme: "light".to_string(),
            window_width: 1200.0,
            window_height: 800.0,
        }
    }
}

impl Settings {
    pub fn is_dark_theme(&self) -> bool {
        self.theme.eq_ignore_ascii_case("dark")
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.window_width < 320.0 || self.window_height < 220.0 {
            return Err("Window size is too small".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.reference_timezone, "Asia/Kolkata");
        assert!(!settings.is_dark_theme());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_dark_theme_is_case_insensitive() {
        let settings = Settings {
            theme: "Dark".to_string(),
            ..Settings::default()
        };
        assert!(settings.is_dark_theme());
    }

    #[test]
    fn test_validate_rejects_tiny_window() {
        let settings = Settings {
            window_width: 100.0,
            ..Settings::default()
        };
        assert_eq!(settings.validate().unwrap_err(), "Window size is too small");
    }
}
