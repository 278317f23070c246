//! Eligibility filter applied to a batch before any per-pick work.

use crate::domain::entities::trade_pick::TradePick;
use crate::domain::values::execution_config::ExecutionConfig;

/// Whether a single pick passes every configured threshold.
///
/// Boundaries are inclusive: a pick whose |expected change| equals the
/// threshold is eligible, as is one whose uncertainty equals the maximum.
pub fn is_eligible(pick: &TradePick, config: &ExecutionConfig) -> bool {
    if !config.allowed_actions.contains(&pick.action) {
        return false;
    }
    if let Some(threshold) = config.abs_change_pct_threshold {
        if pick.expected_change_pct.abs() < threshold {
            return false;
        }
    }
    if let Some(max_uncertainty) = config.max_average_uncertainty {
        if pick.average_uncertainty > max_uncertainty {
            return false;
        }
    }
    if let Some(min_roi) = config.min_model_avg_roi {
        if pick.model_avg_roi < min_roi {
            return false;
        }
    }
    if let Some(allowlist) = &config.symbol_allowlist {
        if !allowlist.contains(&pick.symbol) {
            return false;
        }
    }
    true
}

/// Stable filter: eligible picks in input order.
pub fn filter_picks(picks: &[TradePick], config: &ExecutionConfig) -> Vec<TradePick> {
    picks
        .iter()
        .filter(|p| is_eligible(p, config))
        .cloned()
        .collect()
}
