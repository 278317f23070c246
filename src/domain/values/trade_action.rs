use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TradeAction {
    Buy,
    Sell,
}

impl TradeAction {
    pub const ALL: [TradeAction; 2] = [TradeAction::Buy, TradeAction::Sell];

    /// Side of the protective exit legs.
    pub fn opposite(&self) -> TradeAction {
        match self {
            TradeAction::Buy => TradeAction::Sell,
            TradeAction::Sell => TradeAction::Buy,
        }
    }

    /// Wire name used by the brokerage (`buy` / `sell`).
    pub fn as_side(&self) -> &'static str {
        match self {
            TradeAction::Buy => "buy",
            TradeAction::Sell => "sell",
        }
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "Buy"),
            TradeAction::Sell => write!(f, "Sell"),
        }
    }
}

impl FromStr for TradeAction {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "buy" | "long" => Ok(TradeAction::Buy),
            "sell" | "short" => Ok(TradeAction::Sell),
            _ => Err(format!("Unknown trade action: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("BUY".parse::<TradeAction>().unwrap(), TradeAction::Buy);
        assert_eq!("short".parse::<TradeAction>().unwrap(), TradeAction::Sell);
        assert!("hold".parse::<TradeAction>().is_err());
    }

    #[test]
    fn test_opposite_side() {
        assert_eq!(TradeAction::Buy.opposite(), TradeAction::Sell);
        assert_eq!(TradeAction::Sell.opposite().as_side(), "buy");
    }
}
