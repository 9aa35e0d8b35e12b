use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_format")]
    pub default_format: String,
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_format() -> String {
    "text".to_string()
}
fn default_color() -> String {
    "auto".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            color: default_color(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_cost_type")]
    pub cost_type: String,
    /// Pause after every HTTP call
    #[serde(default = "default_request_pause_ms")]
    pub request_pause_ms: u64,
    /// Pause after each subscription has been fully analysed
    #[serde(default = "default_subscription_pause_ms")]
    pub subscription_pause_ms: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    "https://management.azure.com".to_string()
}
fn default_api_version() -> String {
    "2021-10-01".to_string()
}
fn default_cost_type() -> String {
    "ActualCost".to_string()
}
fn default_request_pause_ms() -> u64 {
    1000
}
fn default_subscription_pause_ms() -> u64 {
    2000
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_version: default_api_version(),
            cost_type: default_cost_type(),
            request_pause_ms: default_request_pause_ms(),
            subscription_pause_ms: default_subscription_pause_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BillingConfig {
    pub fn request_pause(&self) -> Duration {
        Duration::from_millis(self.request_pause_ms)
    }

    pub fn subscription_pause(&self) -> Duration {
        Duration::from_millis(self.subscription_pause_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_period_days")]
    pub period_days: u32,
    /// Absolute amount, in billing currency units, above the baseline average
    #[serde(default = "default_alert_margin")]
    pub alert_margin: f64,
}

fn default_period_days() -> u32 {
    crate::core::analysis::timeframe::DEFAULT_PERIOD_DAYS
}
fn default_alert_margin() -> f64 {
    crate::core::analysis::classifier::DEFAULT_ALERT_MARGIN
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            period_days: default_period_days(),
            alert_margin: default_alert_margin(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub billing: BillingConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl AppConfig {
    /// Get the config file path, respecting COSTWATCH_CONFIG and XDG_CONFIG_HOME
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("COSTWATCH_CONFIG") {
            return PathBuf::from(path);
        }
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".config")
            });
        config_dir.join("costwatch").join("config.toml")
    }

    /// Load config from the default path, falling back to defaults if not found
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Validate the config
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if !["text", "json"].contains(&self.settings.default_format.as_str()) {
            issues.push(format!(
                "Invalid default_format: '{}' (must be 'text' or 'json')",
                self.settings.default_format
            ));
        }
        if !["auto", "always", "never"].contains(&self.settings.color.as_str()) {
            issues.push(format!(
                "Invalid color: '{}' (must be 'auto', 'always', or 'never')",
                self.settings.color
            ));
        }
        if let Err(e) =
            crate::core::billing::client::validate_endpoint(&self.billing.endpoint)
        {
            issues.push(e.to_string());
        }
        if self.billing.api_version.trim().is_empty() {
            issues.push("Empty billing.api_version".to_string());
        }
        if self.analysis.period_days == 0 {
            issues.push("Invalid period_days: must be at least 1".to_string());
        }
        if !self.analysis.alert_margin.is_finite() || self.analysis.alert_margin < 0.0 {
            issues.push(format!(
                "Invalid alert_margin: {} (must be a non-negative amount)",
                self.analysis.alert_margin
            ));
        }
        issues
    }

    /// Validate and turn any issue into an error.
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        let issues = self.validate();
        if issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(issues))
        }
    }
}
