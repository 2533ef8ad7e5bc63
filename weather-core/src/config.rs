use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api";
pub const DEFAULT_ICON_BASE: &str = "https://openweathermap.org/img/wn";
pub const DEFAULT_CITY: &str = "Johannesburg";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_base = "http://localhost:5000/api"
/// default_city = "Pretoria"
/// history_days = 7
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the weather backend, without a trailing `/weather`.
    pub api_base: String,

    /// Prefix for condition icon images.
    pub icon_base: String,

    /// Days of history requested per search.
    pub history_days: u32,

    /// Seconds before the error banner hides itself.
    pub error_dismiss_secs: u64,

    /// City used when none is given on the command line.
    pub default_city: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            icon_base: DEFAULT_ICON_BASE.to_string(),
            history_days: 7,
            error_dismiss_secs: 5,
            default_city: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse and validate TOML contents.
    pub fn parse(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents).context("Invalid TOML")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.api_base_url()?;

        if self.history_days == 0 {
            return Err(anyhow!("history_days must be at least 1"));
        }

        Ok(())
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// The backend base as a parsed URL; only absolute http(s) URLs are accepted.
    pub fn api_base_url(&self) -> Result<Url> {
        let url = Url::parse(self.api_base.trim())
            .with_context(|| format!("api_base '{}' is not a valid URL", self.api_base))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(anyhow!(
                "api_base must use http or https, got '{other}://'.\n\
                 Hint: run `weather configure` to fix it."
            )),
        }
    }

    /// Replace the backend base, e.g. from a command-line flag.
    pub fn set_api_base(&mut self, api_base: impl Into<String>) -> Result<()> {
        let previous = std::mem::replace(&mut self.api_base, api_base.into());
        if let Err(err) = self.api_base_url() {
            self.api_base = previous;
            return Err(err);
        }
        Ok(())
    }

    pub fn default_city(&self) -> &str {
        self.default_city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CITY)
    }

    pub fn error_dismiss_after(&self) -> Duration {
        Duration::from_secs(self.error_dismiss_secs)
    }
}
