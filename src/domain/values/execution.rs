/// Domain types for per-pick execution outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a pick was not turned into an order. Never fatal to the batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    InsufficientBudget,
    PriceAlreadyMoved,
    PositionAlreadyOpen,
    RecentlyTraded,
    RewardBelowRisk,
    ProtectiveLevelsCollapsed,
    /// Business rejection from the brokerage, with its message.
    BrokerRejected(String),
    BatchTimeout,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InsufficientBudget => write!(f, "insufficient budget"),
            SkipReason::PriceAlreadyMoved => write!(f, "price already moved"),
            SkipReason::PositionAlreadyOpen => write!(f, "position already open"),
            SkipReason::RecentlyTraded => write!(f, "recently traded"),
            SkipReason::RewardBelowRisk => write!(f, "reward below risk"),
            SkipReason::ProtectiveLevelsCollapsed => write!(f, "protective levels collapsed"),
            SkipReason::BrokerRejected(msg) => write!(f, "{msg}"),
            SkipReason::BatchTimeout => write!(f, "batch timeout"),
        }
    }
}

/// Result of processing one eligible pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Submitted { order_id: String, symbol: String },
    Skipped { symbol: String, reason: SkipReason },
    Failed { symbol: String, error_detail: String },
}

impl ExecutionOutcome {
    pub fn submitted(order_id: impl Into<String>, symbol: impl Into<String>) -> Self {
        ExecutionOutcome::Submitted {
            order_id: order_id.into(),
            symbol: symbol.into(),
        }
    }

    pub fn skipped(symbol: impl Into<String>, reason: SkipReason) -> Self {
        ExecutionOutcome::Skipped {
            symbol: symbol.into(),
            reason,
        }
    }

    pub fn failed(symbol: impl Into<String>, error_detail: impl Into<String>) -> Self {
        ExecutionOutcome::Failed {
            symbol: symbol.into(),
            error_detail: error_detail.into(),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            ExecutionOutcome::Submitted { symbol, .. }
            | ExecutionOutcome::Skipped { symbol, .. }
            | ExecutionOutcome::Failed { symbol, .. } => symbol,
        }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self, ExecutionOutcome::Submitted { .. })
    }
}

impl fmt::Display for ExecutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionOutcome::Submitted { order_id, symbol } => {
                write!(f, "{symbol}: submitted ({order_id})")
            }
            ExecutionOutcome::Skipped { symbol, reason } => write!(f, "{symbol}: skipped ({reason})"),
            ExecutionOutcome::Failed {
                symbol,
                error_detail,
            } => write!(f, "{symbol}: failed ({error_detail})"),
        }
    }
}

/// Execution mode for a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    DryRun,
    Live,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::DryRun => write!(f, "dry_run"),
            ExecutionMode::Live => write!(f, "live"),
        }
    }
}
