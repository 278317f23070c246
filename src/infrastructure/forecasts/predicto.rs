//! Forecasting-service adapter.
//!
//! Authenticates with a session cookie. Trade picks arrive as
//! `{"Recommendations": [...]}` where `TradeAction` is `0` (no action),
//! `1` (buy) or `2` (sell); no-action rows are dropped during conversion.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::header::COOKIE;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;

use super::ForecastError;
use crate::domain::entities::trade_pick::TradePick;
use crate::domain::error::DomainError;
use crate::domain::ports::forecast_source::{ForecastSource, PickScope, SupportedTicker};
use crate::domain::values::trade_action::TradeAction;

pub const DEFAULT_BASE_URL: &str = "https://predic.to";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent("autotrader/0.1")
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

pub struct PredictoClient {
    session_id: String,
    base_url: String,
    client: reqwest::Client,
}

impl PredictoClient {
    pub fn new(session_id: String, base_url: Option<String>) -> Self {
        Self {
            session_id,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            client: http_client(REQUEST_TIMEOUT),
        }
    }

    /// Replace the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.client = http_client(timeout);
        self
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ForecastError> {
        let resp = self
            .client
            .get(url)
            .header(COOKIE, format!("session={}", self.session_id))
            .send()
            .await
            .map_err(|e| ForecastError::Network(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ForecastError::Auth(format!("{url} returned {status}")));
        }
        if !status.is_success() {
            return Err(ForecastError::Network(format!("{url} returned {status}")));
        }

        resp.json()
            .await
            .map_err(|e| ForecastError::Parse(e.to_string()))
    }

    async fn fetch_ticker_pick(
        &self,
        symbol: &str,
        date: NaiveDate,
    ) -> Result<Option<TradePick>, ForecastError> {
        let url = format!(
            "{}/api/forecasting/tradepicks/{symbol}/{date}/_,0.0,0",
            self.base_url
        );
        let data: RecommendationsResponse = self.get_json(&url).await?;
        match data.recommendations.into_iter().next() {
            Some(rec) => rec.into_trade_pick(Some(symbol), date),
            None => Ok(None),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TickerRow {
    #[serde(rename = "Symbol", alias = "Ticker", alias = "symbol")]
    symbol: String,
    #[serde(rename = "CompanyName", alias = "Name", alias = "companyName", default)]
    company_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RecommendationsResponse {
    #[serde(rename = "Recommendations", default)]
    recommendations: Vec<Recommendation>,
}

#[derive(Debug, Deserialize)]
struct Recommendation {
    #[serde(rename = "Ticker", alias = "Symbol", default)]
    ticker: Option<String>,
    #[serde(rename = "TradeAction")]
    trade_action: i64,
    #[serde(rename = "StartingPrice")]
    starting_price: Decimal,
    #[serde(rename = "TargetSellPrice")]
    target_sell_price: Option<Decimal>,
    #[serde(rename = "TargetStopLossPrice")]
    target_stop_loss_price: Decimal,
    #[serde(rename = "ChangePercentage", default)]
    change_percentage: Option<Decimal>,
    #[serde(rename = "AverageUncertainty", default)]
    average_uncertainty: Option<Decimal>,
    #[serde(rename = "ModelAvgRoi", default)]
    model_avg_roi: Option<Decimal>,
}

impl Recommendation {
    fn into_trade_pick(
        self,
        fallback_symbol: Option<&str>,
        date: NaiveDate,
    ) -> Result<Option<TradePick>, ForecastError> {
        let symbol = match self.ticker.as_deref().or(fallback_symbol) {
            Some(s) => s.to_string(),
            None => return Err(ForecastError::Parse("recommendation without ticker".into())),
        };

        let action = match self.trade_action {
            0 => {
                debug!("{symbol}: no-action recommendation dropped");
                return Ok(None);
            }
            1 => TradeAction::Buy,
            2 => TradeAction::Sell,
            other => {
                return Err(ForecastError::Parse(format!(
                    "{symbol}: unknown trade action {other}"
                )))
            }
        };

        let expected_change_pct = match (self.change_percentage, self.target_sell_price) {
            (Some(change), _) => change,
            (None, Some(target)) if self.starting_price > Decimal::ZERO => target
                .checked_sub(self.starting_price)
                .and_then(|d| d.checked_div(self.starting_price))
                .unwrap_or(Decimal::ZERO),
            _ => Decimal::ZERO,
        };

        Ok(Some(TradePick {
            symbol,
            as_of: date,
            action,
            expected_change_pct,
            // Unknown uncertainty is treated as the least confident value.
            average_uncertainty: self.average_uncertainty.unwrap_or(Decimal::ONE),
            model_avg_roi: self.model_avg_roi.unwrap_or(Decimal::ZERO),
            entry_price: self.starting_price,
            stop_loss_price: self.target_stop_loss_price,
            take_profit_price: self.target_sell_price,
        }))
    }
}

/// Convert a recommendations payload into trade picks for `date`.
pub fn parse_trade_picks(json: &str, date: NaiveDate) -> Result<Vec<TradePick>, ForecastError> {
    let data: RecommendationsResponse =
        serde_json::from_str(json).map_err(|e| ForecastError::Parse(e.to_string()))?;
    collect_picks(data, date)
}

fn collect_picks(data: RecommendationsResponse, date: NaiveDate) -> Result<Vec<TradePick>, ForecastError> {
    let mut picks = Vec::new();
    for rec in data.recommendations {
        if let Some(pick) = rec.into_trade_pick(None, date)? {
            picks.push(pick);
        }
    }
    Ok(picks)
}

#[async_trait]
impl ForecastSource for PredictoClient {
    fn name(&self) -> &str {
        "predicto"
    }

    async fn supported_tickers(&self) -> Result<Vec<SupportedTicker>, DomainError> {
        let url = format!("{}/stocks/all", self.base_url);
        let rows: Vec<TickerRow> = self.get_json(&url).await?;
        Ok(rows
            .into_iter()
            .map(|r| SupportedTicker {
                company_name: r.company_name.unwrap_or_else(|| r.symbol.clone()),
                symbol: r.symbol,
            })
            .collect())
    }

    async fn trade_picks_for_date(
        &self,
        date: NaiveDate,
        scope: PickScope,
    ) -> Result<Vec<TradePick>, DomainError> {
        match scope {
            PickScope::MyPicks => {
                let url = format!("{}/api/forecasting/tradepicks/{date}?my=1", self.base_url);
                let data: RecommendationsResponse = self.get_json(&url).await?;
                Ok(collect_picks(data, date)?)
            }
            PickScope::All => {
                let tickers = self.supported_tickers().await?;
                let mut picks = Vec::new();
                for ticker in &tickers {
                    match self.fetch_ticker_pick(&ticker.symbol, date).await {
                        Ok(Some(pick)) => picks.push(pick),
                        Ok(None) => {}
                        Err(e) => warn!("Failed to fetch trade pick for {}: {e}", ticker.symbol),
                    }
                }
                Ok(picks)
            }
        }
    }
}
