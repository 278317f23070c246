//! Stop-loss and take-profit levels recomputed against the live price.
//!
//! The stop distance is a fraction of price: either the configured fixed
//! percentage, or the forecast's own `|stop - entry| / entry` carried over
//! unchanged. The take-profit keeps the forecast's proportional move
//! (`target / entry`) applied to the live price, unless anchored to the
//! forecast target by config.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::entities::trade_pick::TradePick;
use crate::domain::values::execution_config::ExecutionConfig;
use crate::domain::values::order_type::{TakeProfitAnchor, TradeOrderType};
use crate::domain::values::price::{fractional_distance, round_price};
use crate::domain::values::trade_action::TradeAction;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RiskError {
    #[error("forecast entry price must be positive, got {0}")]
    InvalidEntry(Decimal),

    #[error("stop distance must be between 0 and 1 (exclusive), got {0}")]
    InvalidDistance(Decimal),

    #[error("{0} overflows at live price {1}")]
    Overflow(&'static str, Decimal),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskLevels {
    pub live_price: Decimal,
    pub stop_loss_price: Decimal,
    /// Fraction of the live price between entry and stop.
    pub stop_distance: Decimal,
    pub take_profit_price: Decimal,
}

impl RiskLevels {
    /// Fractional distance from the live price to the take-profit.
    pub fn reward_fraction(&self) -> Option<Decimal> {
        fractional_distance(self.take_profit_price, self.live_price)
    }

    /// `None` when the ratio does not fit in a `Decimal`.
    pub fn reward_risk_ratio(&self) -> Option<Decimal> {
        self.reward_fraction()?.checked_div(self.stop_distance)
    }

    /// True when rounding put a protective level on or across the live price.
    pub fn collapsed(&self, action: TradeAction, order_type: TradeOrderType) -> bool {
        let stop_ok = match action {
            TradeAction::Buy => self.stop_loss_price < self.live_price,
            TradeAction::Sell => self.stop_loss_price > self.live_price,
        };
        let target_ok = match (order_type, action) {
            (TradeOrderType::TrailingStop, _) => true,
            (TradeOrderType::Bracket, TradeAction::Buy) => self.take_profit_price > self.live_price,
            (TradeOrderType::Bracket, TradeAction::Sell) => self.take_profit_price < self.live_price,
        };
        !(stop_ok && target_ok)
    }
}

/// Stop distance as a fraction, from config or from the forecast levels.
pub fn stop_distance(pick: &TradePick, config: &ExecutionConfig) -> Result<Decimal, RiskError> {
    let distance = match config.stop_loss_fixed_pct {
        Some(pct) => pct,
        None => {
            if pick.entry_price <= Decimal::ZERO {
                return Err(RiskError::InvalidEntry(pick.entry_price));
            }
            fractional_distance(pick.stop_loss_price, pick.entry_price)
                .ok_or(RiskError::Overflow("stop distance", pick.entry_price))?
        }
    };
    if distance <= Decimal::ZERO || distance >= Decimal::ONE {
        return Err(RiskError::InvalidDistance(distance));
    }
    Ok(distance)
}

/// Recompute protective levels for `pick` at `live_price`.
///
/// Pure: the same pick, live price and config always give the same levels.
pub fn compute_risk_levels(
    pick: &TradePick,
    live_price: Decimal,
    config: &ExecutionConfig,
) -> Result<RiskLevels, RiskError> {
    if pick.entry_price <= Decimal::ZERO {
        return Err(RiskError::InvalidEntry(pick.entry_price));
    }
    let distance = stop_distance(pick, config)?;
    let decimals = config.price_decimals;

    // Stop sits on the adverse side: below for longs, above for shorts.
    let stop_factor = match pick.action {
        TradeAction::Buy => Decimal::ONE - distance,
        TradeAction::Sell => Decimal::ONE + distance,
    };
    let stop_loss_price = live_price
        .checked_mul(stop_factor)
        .map(|p| round_price(p, decimals))
        .ok_or(RiskError::Overflow("stop-loss", live_price))?;

    let target = pick
        .target_price()
        .ok_or(RiskError::Overflow("forecast target", live_price))?;
    let take_profit_price = match config.take_profit_anchor {
        TakeProfitAnchor::Live => live_price
            .checked_mul(target)
            .and_then(|p| p.checked_div(pick.entry_price)),
        TakeProfitAnchor::Forecast => Some(target),
    }
    .map(|p| round_price(p, decimals))
    .ok_or(RiskError::Overflow("take-profit", live_price))?;

    Ok(RiskLevels {
        live_price,
        stop_loss_price,
        stop_distance: distance,
        take_profit_price,
    })
}
