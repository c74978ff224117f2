use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::forecast::{Scenario, DEFAULT_FORECAST_MONTHS},
    errors::CashflowError,
    ledger::ContextFilter,
    utils::paths::{ensure_dir, write_atomic, PathResolver},
};

/// Longest horizon the forecast accepts.
pub const MAX_FORECAST_MONTHS: u32 = 60;

/// Persistent user preferences for the engine and CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    pub forecast_months: u32,
    pub default_scenario: Scenario,
    pub default_context: ContextFilter,
    pub notifications_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            forecast_months: DEFAULT_FORECAST_MONTHS,
            default_scenario: Scenario::Realistic,
            default_context: ContextFilter::All,
            notifications_enabled: true,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), CashflowError> {
        if self.forecast_months == 0 || self.forecast_months > MAX_FORECAST_MONTHS {
            return Err(CashflowError::ConfigError(format!(
                "forecast_months must be between 1 and {MAX_FORECAST_MONTHS}, got {}",
                self.forecast_months
            )));
        }
        if self.currency.trim().is_empty() {
            return Err(CashflowError::ConfigError("currency must not be empty".into()));
        }
        Ok(())
    }
}

/// Loads and saves [`Config`] under the application data directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, CashflowError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, CashflowError> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Returns the stored config, or defaults when none has been saved yet.
    pub fn load(&self) -> Result<Config, CashflowError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: Config = serde_json::from_str(&data)
            .map_err(|err| CashflowError::ConfigError(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &Config) -> Result<(), CashflowError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
