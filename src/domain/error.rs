use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid pick: {0}")]
    InvalidPick(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Forecast service error: {0}")]
    Forecast(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

impl From<serde_json::Error> for DomainError {
    fn from(e: serde_json::Error) -> Self {
        DomainError::Parse(e.to_string())
    }
}
