use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::model::Location;

/// Environment variable the fetch step reads its API key from.
pub const API_KEY_VAR: &str = "OPENWEATHERMAP_API_KEY";

/// Top-level configuration stored on disk. Everything here is optional;
/// CLI flags override it, and built-in defaults fill whatever is left.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// [location]
    /// lat = 47.608
    /// lon = -122.3352
    /// name = "Seattle"
    pub location: Option<Location>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "wxarchive", "wxarchive")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Configured location, or the built-in default when none is set.
    pub fn location_or_default(&self) -> Location {
        self.location.clone().unwrap_or_default()
    }
}

/// Read the API key from the environment. The fetch step calls this before
/// building any request and refuses to run when the variable is unset.
pub fn api_key_from_env() -> Result<String> {
    api_key_from(std::env::var(API_KEY_VAR).ok())
}

fn api_key_from(value: Option<String>) -> Result<String> {
    value.ok_or_else(|| {
        anyhow!("OpenWeatherMap API key not found; set the {API_KEY_VAR} environment variable")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("config.toml")).expect("load");

        assert!(cfg.location.is_none());

        let loc = cfg.location_or_default();
        assert_eq!(loc.name, "Seattle");
        assert_eq!(loc.lat, 47.608);
        assert_eq!(loc.lon, -122.3352);
    }

    #[test]
    fn location_parsed_from_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let mut file = fs::File::create(&path).expect("create");
        writeln!(
            file,
            "[location]\nlat = 51.5072\nlon = -0.1276\nname = \"London\""
        )
        .expect("write");

        let cfg = Config::load_from(&path).expect("load");
        let loc = cfg.location_or_default();

        assert_eq!(loc.name, "London");
        assert_eq!(loc.lat, 51.5072);
    }

    #[test]
    fn missing_api_key_is_an_error() {
        let err = api_key_from(None).unwrap_err();
        assert!(err.to_string().contains(API_KEY_VAR));
    }

    #[test]
    fn present_api_key_is_returned() {
        let key = api_key_from(Some("KEY".to_string())).expect("key should be accepted");
        assert_eq!(key, "KEY");
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "location = 12").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
