use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::values::trade_action::TradeAction;

/// One forecast-derived recommendation for a single symbol and date.
///
/// Percentages are signed fractions (`0.02` is two percent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePick {
    pub symbol: String,
    pub as_of: NaiveDate,
    pub action: TradeAction,
    pub expected_change_pct: Decimal,
    /// Model uncertainty, 0 to 1. Lower is more confident.
    pub average_uncertainty: Decimal,
    pub model_avg_roi: Decimal,
    pub entry_price: Decimal,
    pub stop_loss_price: Decimal,
    pub take_profit_price: Option<Decimal>,
}

impl TradePick {
    /// Price the forecast expects to reach.
    ///
    /// Falls back to the entry price moved by the expected change when the pick
    /// carries no explicit take-profit. `None` if that product overflows.
    pub fn target_price(&self) -> Option<Decimal> {
        match self.take_profit_price {
            Some(target) => Some(target),
            None => Decimal::ONE
                .checked_add(self.expected_change_pct)
                .and_then(|factor| self.entry_price.checked_mul(factor)),
        }
    }

    /// Check the pick is internally consistent before any price is fetched.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.symbol.trim().is_empty() {
            return Err(DomainError::InvalidPick("symbol is empty".into()));
        }
        if self.entry_price <= Decimal::ZERO {
            return Err(DomainError::InvalidPick(format!(
                "{}: entry price must be positive, got {}",
                self.symbol, self.entry_price
            )));
        }
        if self.stop_loss_price <= Decimal::ZERO {
            return Err(DomainError::InvalidPick(format!(
                "{}: stop-loss price must be positive, got {}",
                self.symbol, self.stop_loss_price
            )));
        }
        if self.average_uncertainty < Decimal::ZERO || self.average_uncertainty > Decimal::ONE {
            return Err(DomainError::InvalidPick(format!(
                "{}: uncertainty must be between 0 and 1, got {}",
                self.symbol, self.average_uncertainty
            )));
        }

        let target = self.target_price().ok_or_else(|| {
            DomainError::InvalidPick(format!(
                "{}: target price overflows (entry {}, change {})",
                self.symbol, self.entry_price, self.expected_change_pct
            ))
        })?;
        if target <= Decimal::ZERO {
            return Err(DomainError::InvalidPick(format!(
                "{}: target price must be positive, got {target}",
                self.symbol
            )));
        }

        let ordered = match self.action {
            TradeAction::Buy => self.stop_loss_price < self.entry_price && self.entry_price < target,
            TradeAction::Sell => target < self.entry_price && self.entry_price < self.stop_loss_price,
        };
        if !ordered {
            return Err(DomainError::InvalidPick(format!(
                "{}: {} pick needs entry {} between stop-loss {} and target {target}",
                self.symbol, self.action, self.entry_price, self.stop_loss_price
            )));
        }
        Ok(())
    }
}
