//! Service endpoints and credentials from the environment, and execution
//! config files from disk.

use std::path::Path;

use crate::domain::error::DomainError;
use crate::domain::values::execution_config::ExecutionConfig;

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub forecast_url: Option<String>,
    pub forecast_session: String,
    pub broker_url: Option<String>,
    pub broker_data_url: Option<String>,
    pub broker_key_id: String,
    pub broker_secret: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            forecast_url: non_empty("AUTOTRADER_FORECAST_URL"),
            forecast_session: non_empty("AUTOTRADER_FORECAST_SESSION").unwrap_or_default(),
            broker_url: non_empty("AUTOTRADER_BROKER_URL"),
            broker_data_url: non_empty("AUTOTRADER_BROKER_DATA_URL"),
            broker_key_id: non_empty("AUTOTRADER_BROKER_KEY_ID").unwrap_or_default(),
            broker_secret: non_empty("AUTOTRADER_BROKER_SECRET").unwrap_or_default(),
        }
    }

    pub fn require_forecast_session(&self) -> Result<(), DomainError> {
        if self.forecast_session.is_empty() {
            return Err(DomainError::Settings(
                "AUTOTRADER_FORECAST_SESSION is not set".into(),
            ));
        }
        Ok(())
    }

    pub fn require_broker_credentials(&self) -> Result<(), DomainError> {
        if self.broker_key_id.is_empty() || self.broker_secret.is_empty() {
            return Err(DomainError::Settings(
                "AUTOTRADER_BROKER_KEY_ID and AUTOTRADER_BROKER_SECRET must be set".into(),
            ));
        }
        Ok(())
    }
}

/// Read and validate an execution config JSON file.
pub fn load_execution_config(path: &Path) -> Result<ExecutionConfig, DomainError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| DomainError::InvalidConfig(format!("{}: {e}", path.display())))?;
    ExecutionConfig::from_json(&json)
}
