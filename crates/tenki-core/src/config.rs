use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Default JMA area directory endpoint
pub const DEFAULT_AREA_LIST_URL: &str = "http://www.jma.go.jp/bosai/common/const/area.json";

/// Default JMA forecast endpoint; `{code}` is replaced by the area code
pub const DEFAULT_FORECAST_URL_TEMPLATE: &str =
    "https://www.jma.go.jp/bosai/forecast/data/forecast/{code}.json";

/// Placeholder substituted into the forecast URL template
pub const AREA_CODE_PLACEHOLDER: &str = "{code}";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory; the forecast store lives here too
    pub config_dir: PathBuf,

    /// JMA endpoints
    #[serde(default)]
    pub jma: JmaConfig,

    /// Local forecast store
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JmaConfig {
    /// Area directory URL
    #[serde(default = "default_area_list_url")]
    pub area_list_url: String,

    /// Forecast URL with a `{code}` placeholder
    #[serde(default = "default_forecast_url_template")]
    pub forecast_url_template: String,

    /// HTTP request timeout in seconds; unset leaves the HTTP client default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_area_list_url() -> String {
    DEFAULT_AREA_LIST_URL.to_string()
}

fn default_forecast_url_template() -> String {
    DEFAULT_FORECAST_URL_TEMPLATE.to_string()
}

impl Default for JmaConfig {
    fn default() -> Self {
        Self {
            area_list_url: default_area_list_url(),
            forecast_url_template: default_forecast_url_template(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Cache fetched areas and forecasts locally for offline browsing
    #[serde(default = "default_store_enabled")]
    pub enabled: bool,

    /// SQLite file name, resolved inside `config_dir`
    #[serde(default = "default_store_file_name")]
    pub file_name: String,
}

fn default_store_enabled() -> bool {
    true
}

fn default_store_file_name() -> String {
    "forecasts.db".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            enabled: default_store_enabled(),
            file_name: default_store_file_name(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tenki");

        Self {
            config_dir,
            jma: JmaConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, writing defaults there if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.jma.area_list_url, "jma.area_list_url", &mut result);

        if !self
            .jma
            .forecast_url_template
            .contains(AREA_CODE_PLACEHOLDER)
        {
            result.add_error(
                "jma.forecast_url_template",
                format!("Template must contain {}", AREA_CODE_PLACEHOLDER),
            );
        } else {
            // Validate with a representative code substituted in
            let sample = self
                .jma
                .forecast_url_template
                .replace(AREA_CODE_PLACEHOLDER, "130000");
            self.validate_url(&sample, "jma.forecast_url_template", &mut result);
        }

        if self.jma.timeout_secs == Some(0) {
            result.add_error("jma.timeout_secs", "Timeout must be greater than 0");
        } else if self.jma.timeout_secs.is_some_and(|secs| secs > 120) {
            result.add_warning(
                "jma.timeout_secs",
                "Timeout is unusually long (>120 seconds); the UI blocks while waiting",
            );
        }

        if self.store.file_name.trim().is_empty() {
            result.add_error("store.file_name", "Store file name must not be empty");
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Full path of the SQLite forecast store
    pub fn store_path(&self) -> PathBuf {
        self.config_dir.join(&self.store.file_name)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("tenki");

        Ok(config_dir.join("config.toml"))
    }
}
