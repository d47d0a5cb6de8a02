//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::application::errors::ConfigError;
use crate::infrastructure::adapters::telegram;
use crate::infrastructure::weather::openweather::API_BASE;

/// Bot configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    pub bot: BotConfig,
    pub weather: WeatherConfig,
    pub telegram: TelegramConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub prefix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub api_base: String,
    pub poll_timeout_seconds: i64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "weather-bot".to_string(),
            prefix: "/".to_string(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: API_BASE.to_string(),
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: telegram::API_BASE.to_string(),
            poll_timeout_seconds: 30,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Parse(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))
    }

    /// Loads the file if it exists, otherwise starts from defaults.
    /// Environment variables are applied on top either way.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            Self::load(path)?
        } else {
            tracing::debug!("Config file {} not found, using defaults", path.display());
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Overlay values from the process environment
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok());
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(token) = var("TELEGRAM_BOT_TOKEN").or_else(|| var("BOT_TOKEN")) {
            self.telegram.token = Some(token);
        }

        if let Some(key) = var("WEATHER_API_KEY") {
            self.weather.api_key = Some(key);
        }

        if let Some(url) = var("WEATHER_BASE_URL") {
            self.weather.base_url = url;
        }

        if let Some(prefix) = var("BOT_PREFIX") {
            self.bot.prefix = prefix;
        }
    }

    /// Bot token, required to serve Telegram
    pub fn telegram_token(&self) -> Result<&str, ConfigError> {
        required(self.telegram.token.as_deref(), "telegram.token (TELEGRAM_BOT_TOKEN)")
    }

    /// Weather API key, required for any lookup
    pub fn weather_api_key(&self) -> Result<&str, ConfigError> {
        required(self.weather.api_key.as_deref(), "weather.api-key (WEATHER_API_KEY)")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.weather.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue("weather.base-url is empty".to_string()));
        }
        if self.telegram.api_base.trim().is_empty() {
            return Err(ConfigError::InvalidValue("telegram.api-base is empty".to_string()));
        }
        if self.telegram.poll_timeout_seconds < 0 {
            return Err(ConfigError::InvalidValue(format!(
                "telegram.poll-timeout-seconds must not be negative, got {}",
                self.telegram.poll_timeout_seconds
            )));
        }
        Ok(())
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ConfigError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingField(field.to_string())),
    }
}
