pub mod alpaca;
pub mod dry_run;

use crate::domain::ports::brokerage::BrokerError;

/// Classify a non-success HTTP response from a brokerage.
///
/// 401 is an authentication failure; 403 and 422 carry business rejections
/// (short-sell restrictions, buying power); everything else is transport.
pub fn classify_status(status: u16, body: &str) -> BrokerError {
    match status {
        401 => BrokerError::Auth(error_message(body)),
        403 | 422 => BrokerError::Rejected {
            status,
            message: error_message(body),
        },
        _ => BrokerError::Transport(format!("HTTP {status}: {}", error_message(body))),
    }
}

/// Pull `message` out of a JSON error body, or fall back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["message"].as_str().map(String::from))
        .unwrap_or_else(|| body.trim().to_string())
}
