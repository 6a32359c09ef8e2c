use crate::models::settings::Settings;
use chrono_tz::Tz;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to access settings file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
    #[error("unknown timezone '{0}'")]
    UnknownTimezone(String),
}

/// Reads and writes [`Settings`] as TOML.
pub struct SettingsService {
    path: PathBuf,
}

impl SettingsService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `settings.toml` in the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "RustPlanner", "Planner")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings. A missing file yields the defaults.
    pub fn get(&self) -> Result<Settings, SettingsError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {:?}, using defaults", self.path);
                return Ok(Settings::default());
            }
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let settings: Settings = toml::from_str(&contents)?;
        settings.validate().map_err(SettingsError::Invalid)?;
        Self::reference_timezone(&settings)?;
        Ok(settings)
    }

    /// Load settings, falling back to the defaults on any error.
    pub fn get_or_default(&self) -> Settings {
        self.get().unwrap_or_else(|err| {
            log::warn!("Failed to load settings: {}", err);
            Settings::default()
        })
    }

    pub fn update(&self, settings: &Settings) -> Result<(), SettingsError> {
        settings.validate().map_err(SettingsError::Invalid)?;
        Self::reference_timezone(settings)?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let contents = toml::to_string_pretty(settings)?;
        std::fs::write(&self.path, contents).map_err(|source| SettingsError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::info!("Saved settings to {:?}", self.path);
        Ok(())
    }

    pub fn reference_timezone(settings: &Settings) -> Result<Tz, SettingsError> {
        settings
            .reference_timezone
            .parse::<Tz>()
            .map_err(|_| SettingsError::UnknownTimezone(settings.reference_timezone.clone()))
    }
}
