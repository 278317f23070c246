use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order shape used for every pick in a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TradeOrderType {
    /// Entry plus fixed take-profit and fixed stop-loss.
    #[default]
    Bracket,
    /// Entry plus a stop that trails the market by a fixed fraction.
    TrailingStop,
}

impl fmt::Display for TradeOrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeOrderType::Bracket => write!(f, "Bracket"),
            TradeOrderType::TrailingStop => write!(f, "TrailingStop"),
        }
    }
}

impl FromStr for TradeOrderType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', '-'], "").as_str() {
            "bracket" => Ok(TradeOrderType::Bracket),
            "trailingstop" => Ok(TradeOrderType::TrailingStop),
            _ => Err(format!("Unknown order type: {s}")),
        }
    }
}

/// Where the bracket take-profit is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TakeProfitAnchor {
    /// Re-scale the forecast move onto the live price.
    #[default]
    Live,
    /// Keep the forecast target unchanged.
    Forecast,
}
