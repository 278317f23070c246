pub mod predicto;

use crate::domain::error::DomainError;

#[derive(Debug)]
pub enum ForecastError {
    /// HTTP or network error
    Network(String),
    /// Response parsing error
    Parse(String),
    /// Session rejected by the service
    Auth(String),
}

impl std::fmt::Display for ForecastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastError::Network(msg) => write!(f, "Network error: {msg}"),
            ForecastError::Parse(msg) => write!(f, "Parse error: {msg}"),
            ForecastError::Auth(msg) => write!(f, "Auth error: {msg}"),
        }
    }
}

impl std::error::Error for ForecastError {}

impl From<ForecastError> for DomainError {
    fn from(e: ForecastError) -> Self {
        DomainError::Forecast(e.to_string())
    }
}
