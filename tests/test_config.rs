//! Loading execution config files from disk.

use autotrader::domain::error::DomainError;
use autotrader::domain::values::order_type::{TakeProfitAnchor, TradeOrderType};
use autotrader::domain::values::trade_action::TradeAction;
use autotrader::infrastructure::settings::load_execution_config;
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_config_file() {
    let file = write_config(
        r#"{
            "investmentPerTrade": 1000,
            "allowedActions": ["Buy"],
            "maxAverageUncertainty": 0.1,
            "tradeOrderType": "TrailingStop",
            "takeProfitAnchor": "forecast",
            "skipIfPositionOpen": false
        }"#,
    );

    let config = load_execution_config(file.path()).unwrap();

    assert_eq!(config.investment_per_trade, dec!(1000));
    assert_eq!(config.allowed_actions.iter().copied().collect::<Vec<_>>(), vec![TradeAction::Buy]);
    assert_eq!(config.max_average_uncertainty, Some(dec!(0.1)));
    assert_eq!(config.trade_order_type, TradeOrderType::TrailingStop);
    assert_eq!(config.take_profit_anchor, TakeProfitAnchor::Forecast);
    assert!(!config.skip_if_position_open);
}

#[test]
fn test_unknown_field_is_rejected() {
    let file = write_config(r#"{"investmentPerTrade": 1000, "investment": 5}"#);
    let err = load_execution_config(file.path()).unwrap_err();
    assert!(matches!(err, DomainError::InvalidConfig(_)));
}

#[test]
fn test_invalid_values_are_rejected() {
    let file = write_config(r#"{"investmentPerTrade": 1000, "stopLossFixedPct": 1.5}"#);
    let err = load_execution_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("stopLossFixedPct"));
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_execution_config(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, DomainError::InvalidConfig(_)));
}

#[test]
fn test_malformed_json_is_config_error() {
    let file = write_config("{ investmentPerTrade: ");
    let err = load_execution_config(file.path()).unwrap_err();
    assert!(matches!(err, DomainError::InvalidConfig(_)));
}
