//! Shared test helpers: deterministic forecast source and brokerage fakes.

#![allow(dead_code)]

use async_trait::async_trait;
use autotrader::domain::entities::trade_pick::TradePick;
use autotrader::domain::error::DomainError;
use autotrader::domain::ports::brokerage::{
    BracketOrderRequest, BrokerError, Brokerage, TrailingStopOrderRequest,
};
use autotrader::domain::ports::forecast_source::{ForecastSource, PickScope, SupportedTicker};
use autotrader::domain::values::trade_action::TradeAction;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
}

/// A pick with an explicit take-profit target.
pub fn pick(
    symbol: &str,
    action: TradeAction,
    entry: Decimal,
    stop: Decimal,
    target: Decimal,
) -> TradePick {
    TradePick {
        symbol: symbol.to_string(),
        as_of: as_of(),
        action,
        expected_change_pct: (target - entry) / entry,
        average_uncertainty: Decimal::new(8, 2),
        model_avg_roi: Decimal::new(1, 2),
        entry_price: entry,
        stop_loss_price: stop,
        take_profit_price: Some(target),
    }
}

pub struct FakeForecastSource {
    pub tickers: Vec<SupportedTicker>,
    pub picks: Vec<TradePick>,
    pub fail: bool,
}

impl FakeForecastSource {
    pub fn with_picks(picks: Vec<TradePick>) -> Self {
        let tickers = picks
            .iter()
            .map(|p| SupportedTicker {
                symbol: p.symbol.clone(),
                company_name: format!("{} Inc.", p.symbol),
            })
            .collect();
        Self {
            tickers,
            picks,
            fail: false,
        }
    }
}

#[async_trait]
impl ForecastSource for FakeForecastSource {
    fn name(&self) -> &str {
        "fake-forecasts"
    }

    async fn supported_tickers(&self) -> Result<Vec<SupportedTicker>, DomainError> {
        if self.fail {
            return Err(DomainError::Forecast("service unavailable".into()));
        }
        Ok(self.tickers.clone())
    }

    async fn trade_picks_for_date(
        &self,
        date: NaiveDate,
        _scope: PickScope,
    ) -> Result<Vec<TradePick>, DomainError> {
        if self.fail {
            return Err(DomainError::Forecast("service unavailable".into()));
        }
        Ok(self.picks.iter().filter(|p| p.as_of == date).cloned().collect())
    }
}

/// A submit call the fake brokerage received.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmittedOrder {
    Bracket(BracketOrderRequest),
    TrailingStop(TrailingStopOrderRequest),
}

impl SubmittedOrder {
    pub fn symbol(&self) -> &str {
        match self {
            SubmittedOrder::Bracket(o) => &o.symbol,
            SubmittedOrder::TrailingStop(o) => &o.symbol,
        }
    }
}

/// Brokerage fake with scripted prices and responses per symbol.
#[derive(Default)]
pub struct FakeBroker {
    pub prices: HashMap<String, Decimal>,
    pub rejections: HashMap<String, String>,
    pub failures: HashMap<String, BrokerError>,
    pub positions: HashMap<String, Decimal>,
    pub recent_fills: HashMap<String, usize>,
    /// Per-symbol delay before a submit returns.
    pub delays: HashMap<String, Duration>,
    pub submitted: Mutex<Vec<SubmittedOrder>>,
    pub price_calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FakeBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn price(mut self, symbol: &str, price: Decimal) -> Self {
        self.prices.insert(symbol.to_string(), price);
        self
    }

    pub fn reject(mut self, symbol: &str, message: &str) -> Self {
        self.rejections.insert(symbol.to_string(), message.to_string());
        self
    }

    pub fn fail(mut self, symbol: &str, error: BrokerError) -> Self {
        self.failures.insert(symbol.to_string(), error);
        self
    }

    pub fn position(mut self, symbol: &str, qty: Decimal) -> Self {
        self.positions.insert(symbol.to_string(), qty);
        self
    }

    pub fn fills(mut self, symbol: &str, count: usize) -> Self {
        self.recent_fills.insert(symbol.to_string(), count);
        self
    }

    pub fn delay(mut self, symbol: &str, delay: Duration) -> Self {
        self.delays.insert(symbol.to_string(), delay);
        self
    }

    pub fn submitted(&self) -> Vec<SubmittedOrder> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn submitted_symbols(&self) -> Vec<String> {
        self.submitted().iter().map(|o| o.symbol().to_string()).collect()
    }

    /// Most submit calls observed running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.lock().unwrap().len()
    }

    async fn respond(&self, symbol: &str, order: SubmittedOrder) -> Result<String, BrokerError> {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(symbol) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.submitted.lock().unwrap().push(order);
        if let Some(message) = self.rejections.get(symbol) {
            return Err(BrokerError::Rejected {
                status: 403,
                message: message.clone(),
            });
        }
        if let Some(err) = self.failures.get(symbol) {
            return Err(err.clone());
        }
        Ok(format!("order-{symbol}"))
    }
}

#[async_trait]
impl Brokerage for FakeBroker {
    fn name(&self) -> &str {
        "fake-broker"
    }

    async fn latest_price(&self, symbol: &str) -> Result<Decimal, BrokerError> {
        self.price_calls.lock().unwrap().push(symbol.to_string());
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| BrokerError::Transport(format!("no quote for {symbol}")))
    }

    async fn submit_bracket_order(&self, order: &BracketOrderRequest) -> Result<String, BrokerError> {
        self.respond(&order.symbol, SubmittedOrder::Bracket(order.clone()))
            .await
    }

    async fn submit_trailing_stop_order(
        &self,
        order: &TrailingStopOrderRequest,
    ) -> Result<String, BrokerError> {
        self.respond(&order.symbol, SubmittedOrder::TrailingStop(order.clone()))
            .await
    }

    async fn open_position(&self, symbol: &str) -> Result<Option<Decimal>, BrokerError> {
        Ok(self.positions.get(symbol).copied())
    }

    async fn filled_orders_since(
        &self,
        symbol: &str,
        _since: DateTime<Utc>,
    ) -> Result<usize, BrokerError> {
        Ok(self.recent_fills.get(symbol).copied().unwrap_or(0))
    }
}
