use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::entities::trade_pick::TradePick;
use crate::domain::error::DomainError;

/// A tradeable instrument known to the forecasting service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedTicker {
    pub symbol: String,
    pub company_name: String,
}

/// Which picks to pull for a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickScope {
    /// Picks the user curated by hand.
    MyPicks,
    /// Every qualifying pick the service generated.
    #[default]
    All,
}

impl fmt::Display for PickScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickScope::MyPicks => write!(f, "my_picks"),
            PickScope::All => write!(f, "all"),
        }
    }
}

impl FromStr for PickScope {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "my_picks" | "my" | "mine" => Ok(PickScope::MyPicks),
            "all" => Ok(PickScope::All),
            _ => Err(format!("Unknown pick scope: {s}")),
        }
    }
}

/// Source of instruments and daily trade picks.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Name of this source for logging.
    fn name(&self) -> &str;

    async fn supported_tickers(&self) -> Result<Vec<SupportedTicker>, DomainError>;

    async fn trade_picks_for_date(
        &self,
        date: NaiveDate,
        scope: PickScope,
    ) -> Result<Vec<TradePick>, DomainError>;
}
