use std::fs;
use std::path::{Path, PathBuf};

use reqwest::Url;
use thiserror::Error;

use crate::config::types::Config;

/// Largest page size the photos endpoint accepts.
pub const MAX_PER_PAGE: u32 = 30;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `~/.config/photofeed/config.toml` on Unix/macOS,
    /// or equivalent on other platforms via `dirs::config_dir()`.
    /// Falls back to current directory if config_dir is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("photofeed").join("config.toml")
    }

    /// Loads configuration from the default config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from an explicit path.
    ///
    /// - If the file doesn't exist, returns `Config::default()`.
    /// - If the file exists, parses it as TOML and validates.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - `per_page` is within 1..=30
    /// - every endpoint URL parses and uses http or https
    pub fn validate(&self) -> Result<(), ConfigError> {
        let per_page = self.defaults.per_page;
        if per_page == 0 || per_page > MAX_PER_PAGE {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "per_page must be between 1 and {}, got {}",
                    MAX_PER_PAGE, per_page
                ),
            });
        }

        for (field, value) in [
            ("api.base_url", &self.api.base_url),
            ("api.token_url", &self.api.token_url),
            ("api.authorize_url", &self.api.authorize_url),
        ] {
            validate_http_url(field, value)?;
        }

        Ok(())
    }

    /// Location of the token file, honoring `storage.token_path`.
    pub fn token_path(&self) -> PathBuf {
        if let Some(path) = &self.storage.token_path {
            return path.clone();
        }
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        data_dir.join("photofeed").join("token.toml")
    }
}

fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::ValidationError {
        message: format!("{} is not a valid URL ('{}'): {}", field, value, e),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::ValidationError {
            message: format!("{} must use http or https, got '{}'", field, other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_zero_per_page_rejected() {
        let mut config = Config::default();
        config.defaults.per_page = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_non_http_url_rejected() {
        let mut config = Config::default();
        config.api.base_url = "ftp://api.unsplash.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api.base_url"));
    }

    #[test]
    fn test_token_path_override() {
        let mut config = Config::default();
        config.storage.token_path = Some(PathBuf::from("/tmp/photofeed-token.toml"));
        assert_eq!(
            config.token_path(),
            PathBuf::from("/tmp/photofeed-token.toml")
        );
    }
}
