//! Run-scoped execution policy.
//!
//! Deserialised from camelCase JSON (`investmentPerTrade`, `allowedActions`, ...).
//! Absent thresholds mean "no constraint", never zero tolerance.

use std::collections::BTreeSet;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::values::order_type::{TakeProfitAnchor, TradeOrderType};
use crate::domain::values::price::DEFAULT_PRICE_DECIMALS;
use crate::domain::values::trade_action::TradeAction;

const MAX_PRICE_DECIMALS: u32 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Cash budget per pick. Required, must be positive.
    pub investment_per_trade: Decimal,
    #[serde(default = "default_allowed_actions")]
    pub allowed_actions: BTreeSet<TradeAction>,
    /// Minimum |expected change| (fraction) to act on.
    #[serde(default)]
    pub abs_change_pct_threshold: Option<Decimal>,
    /// Picks with a higher model uncertainty are rejected.
    #[serde(default)]
    pub max_average_uncertainty: Option<Decimal>,
    /// Picks with a lower historical model ROI are rejected.
    #[serde(default)]
    pub min_model_avg_roi: Option<Decimal>,
    #[serde(default)]
    pub symbol_allowlist: Option<BTreeSet<String>>,
    #[serde(default)]
    pub trade_order_type: TradeOrderType,
    /// Fixed stop distance as a fraction of the live price.
    #[serde(default)]
    pub stop_loss_fixed_pct: Option<Decimal>,
    #[serde(default = "default_price_decimals")]
    pub price_decimals: u32,
    #[serde(default)]
    pub take_profit_anchor: TakeProfitAnchor,
    #[serde(default)]
    pub min_reward_risk_ratio: Option<Decimal>,
    #[serde(default = "default_true")]
    pub skip_if_position_open: bool,
    #[serde(default)]
    pub recent_trade_cooldown_hours: Option<u32>,
    #[serde(default = "default_max_concurrent_picks")]
    pub max_concurrent_picks: usize,
    #[serde(default)]
    pub batch_timeout_secs: Option<u64>,
}

fn default_allowed_actions() -> BTreeSet<TradeAction> {
    TradeAction::ALL.into_iter().collect()
}

fn default_price_decimals() -> u32 {
    DEFAULT_PRICE_DECIMALS
}

fn default_true() -> bool {
    true
}

fn default_max_concurrent_picks() -> usize {
    1
}

impl ExecutionConfig {
    /// Config with the given budget and every other field at its default.
    pub fn new(investment_per_trade: Decimal) -> Self {
        Self {
            investment_per_trade,
            allowed_actions: default_allowed_actions(),
            abs_change_pct_threshold: None,
            max_average_uncertainty: None,
            min_model_avg_roi: None,
            symbol_allowlist: None,
            trade_order_type: TradeOrderType::default(),
            stop_loss_fixed_pct: None,
            price_decimals: DEFAULT_PRICE_DECIMALS,
            take_profit_anchor: TakeProfitAnchor::default(),
            min_reward_risk_ratio: None,
            skip_if_position_open: true,
            recent_trade_cooldown_hours: None,
            max_concurrent_picks: 1,
            batch_timeout_secs: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let config: ExecutionConfig =
            serde_json::from_str(json).map_err(|e| DomainError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn batch_timeout(&self) -> Option<Duration> {
        self.batch_timeout_secs.map(Duration::from_secs)
    }

    /// Reject configurations that make the whole batch meaningless.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.investment_per_trade <= Decimal::ZERO {
            return Err(DomainError::InvalidConfig(format!(
                "investmentPerTrade must be positive, got {}",
                self.investment_per_trade
            )));
        }
        if let Some(t) = self.abs_change_pct_threshold {
            if t < Decimal::ZERO {
                return Err(DomainError::InvalidConfig(format!(
                    "absChangePctThreshold must not be negative, got {t}"
                )));
            }
        }
        if let Some(u) = self.max_average_uncertainty {
            if u < Decimal::ZERO || u > Decimal::ONE {
                return Err(DomainError::InvalidConfig(format!(
                    "maxAverageUncertainty must be between 0 and 1, got {u}"
                )));
            }
        }
        if let Some(pct) = self.stop_loss_fixed_pct {
            if pct <= Decimal::ZERO || pct >= Decimal::ONE {
                return Err(DomainError::InvalidConfig(format!(
                    "stopLossFixedPct must be between 0 and 1 (exclusive), got {pct}"
                )));
            }
        }
        if let Some(ratio) = self.min_reward_risk_ratio {
            if ratio <= Decimal::ZERO {
                return Err(DomainError::InvalidConfig(format!(
                    "minRewardRiskRatio must be positive, got {ratio}"
                )));
            }
        }
        if self.max_concurrent_picks == 0 {
            return Err(DomainError::InvalidConfig(
                "maxConcurrentPicks must be at least 1".into(),
            ));
        }
        if self.price_decimals > MAX_PRICE_DECIMALS {
            return Err(DomainError::InvalidConfig(format!(
                "priceDecimals must be at most {MAX_PRICE_DECIMALS}, got {}",
                self.price_decimals
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_minimal_json_uses_defaults() {
        let config = ExecutionConfig::from_json(r#"{"investmentPerTrade": 1000}"#).unwrap();
        assert_eq!(config.investment_per_trade, dec!(1000));
        assert_eq!(config.allowed_actions.len(), 2);
        assert_eq!(config.trade_order_type, TradeOrderType::Bracket);
        assert_eq!(config.price_decimals, 2);
        assert!(config.skip_if_position_open);
        assert_eq!(config.max_concurrent_picks, 1);
        assert!(config.abs_change_pct_threshold.is_none());
    }

    #[test]
    fn test_full_json() {
        let json = r#"{
            "investmentPerTrade": "2500.50",
            "allowedActions": ["Sell"],
            "absChangePctThreshold": 0.02,
            "maxAverageUncertainty": 0.15,
            "minModelAvgRoi": 0.0,
            "symbolAllowlist": ["NFLX", "V"],
            "tradeOrderType": "TrailingStop",
            "stopLossFixedPct": 0.03,
            "recentTradeCooldownHours": 7,
            "maxConcurrentPicks": 4,
            "batchTimeoutSecs": 120
        }"#;
        let config = ExecutionConfig::from_json(json).unwrap();
        assert_eq!(config.investment_per_trade, dec!(2500.50));
        assert!(config.allowed_actions.contains(&TradeAction::Sell));
        assert!(!config.allowed_actions.contains(&TradeAction::Buy));
        assert_eq!(config.trade_order_type, TradeOrderType::TrailingStop);
        assert_eq!(config.stop_loss_fixed_pct, Some(dec!(0.03)));
        assert_eq!(config.batch_timeout(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_missing_investment_is_config_error() {
        let err = ExecutionConfig::from_json(r#"{"tradeOrderType": "Bracket"}"#).unwrap_err();
        assert!(matches!(err, DomainError::InvalidConfig(_)));
    }

    #[test]
    fn test_unknown_order_type_is_config_error() {
        let err = ExecutionConfig::from_json(
            r#"{"investmentPerTrade": 1000, "tradeOrderType": "Oco"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::InvalidConfig(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(ExecutionConfig::new(dec!(0)).validate().is_err());
        assert!(ExecutionConfig::new(dec!(-5)).validate().is_err());

        let mut config = ExecutionConfig::new(dec!(1000));
        config.stop_loss_fixed_pct = Some(dec!(1));
        assert!(config.validate().is_err());

        let mut config = ExecutionConfig::new(dec!(1000));
        config.max_average_uncertainty = Some(dec!(1.5));
        assert!(config.validate().is_err());

        let mut config = ExecutionConfig::new(dec!(1000));
        config.max_concurrent_picks = 0;
        assert!(config.validate().is_err());

        assert!(ExecutionConfig::new(dec!(1000)).validate().is_ok());
    }
}
