//! Brokerage adapter over the Alpaca v2 REST API.
//!
//! Entries are market orders; `entry_price` is the live price the levels were
//! computed against and is only used for logging here.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, error, info};
use reqwest::{Client, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::classify_status;
use crate::domain::ports::brokerage::{
    BracketOrderRequest, BrokerError, Brokerage, TrailingStopOrderRequest,
};
use crate::domain::values::price::round_price;

pub const PAPER_TRADING_URL: &str = "https://paper-api.alpaca.markets";
pub const MARKET_DATA_URL: &str = "https://data.alpaca.markets";
/// Upper bound on a single brokerage HTTP call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct AlpacaClient {
    client: Client,
    trading_url: String,
    data_url: String,
    key_id: String,
    secret_key: String,
}

fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .user_agent("autotrader/0.1")
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

#[derive(Debug, Serialize)]
struct OrderBody<'a> {
    symbol: &'a str,
    qty: String,
    side: &'a str,
    #[serde(rename = "type")]
    order_type: &'a str,
    time_in_force: &'a str,
    client_order_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_class: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    take_profit: Option<TakeProfitLeg>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_loss: Option<StopLossLeg>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trail_percent: Option<Decimal>,
}

#[derive(Debug, Serialize)]
struct TakeProfitLeg {
    limit_price: Decimal,
}

#[derive(Debug, Serialize)]
struct StopLossLeg {
    stop_price: Decimal,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct LatestTradeResponse {
    trade: LatestTrade,
}

#[derive(Debug, Deserialize)]
struct LatestTrade {
    #[serde(rename = "p")]
    price: Decimal,
}

#[derive(Debug, Deserialize)]
struct PositionResponse {
    qty: Decimal,
}

#[derive(Debug, Deserialize)]
struct ClosedOrder {
    symbol: String,
    status: String,
}

impl AlpacaClient {
    pub fn new(
        key_id: String,
        secret_key: String,
        trading_url: Option<String>,
        data_url: Option<String>,
    ) -> Self {
        Self {
            client: http_client(REQUEST_TIMEOUT),
            trading_url: trading_url.unwrap_or_else(|| PAPER_TRADING_URL.into()),
            data_url: data_url.unwrap_or_else(|| MARKET_DATA_URL.into()),
            key_id,
            secret_key,
        }
    }

    /// Replace the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.client = http_client(timeout);
        self
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("APCA-API-KEY-ID", &self.key_id)
            .header("APCA-API-SECRET-KEY", &self.secret_key)
    }

    async fn send_raw(&self, req: RequestBuilder) -> Result<Response, BrokerError> {
        self.authed(req)
            .send()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, BrokerError> {
        let resp = self.send_raw(req).await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }
        Ok(resp)
    }

    async fn post_order(&self, body: &OrderBody<'_>) -> Result<String, BrokerError> {
        debug!("POST order {body:?}");
        let resp = self
            .send(
                self.client
                    .post(format!("{}/v2/orders", self.trading_url))
                    .json(body),
            )
            .await?;
        let order: OrderResponse = resp
            .json()
            .await
            .map_err(|e| BrokerError::Decode(e.to_string()))?;
        Ok(order.id)
    }
}

/// Resolve the two-leg trailing-stop submission to the entry order id.
///
/// Once the entry is accepted the position exists at the brokerage, so the
/// order is reported as submitted even if the exit leg was refused.
fn settle_trailing_exit(symbol: &str, entry_id: String, exit: Result<String, BrokerError>) -> String {
    match exit {
        Ok(exit_id) => debug!("{symbol}: trailing stop {exit_id} protects entry {entry_id}"),
        Err(e) => error!("{symbol}: entry {entry_id} is UNPROTECTED, trailing stop failed: {e}"),
    }
    entry_id
}

/// Percent value for `trail_percent` from a 0-1 fraction.
pub fn trail_percent(trail_fraction: Decimal) -> Decimal {
    round_price(trail_fraction * Decimal::ONE_HUNDRED, 2)
}

#[async_trait]
impl Brokerage for AlpacaClient {
    fn name(&self) -> &str {
        "alpaca"
    }

    async fn latest_price(&self, symbol: &str) -> Result<Decimal, BrokerError> {
        let resp = self
            .send(
                self.client
                    .get(format!("{}/v2/stocks/{symbol}/trades/latest", self.data_url)),
            )
            .await?;
        let data: LatestTradeResponse = resp
            .json()
            .await
            .map_err(|e| BrokerError::Decode(e.to_string()))?;
        Ok(data.trade.price)
    }

    async fn submit_bracket_order(&self, order: &BracketOrderRequest) -> Result<String, BrokerError> {
        info!(
            "{}: bracket {} x{} at ~{} (tp {}, sl {})",
            order.symbol,
            order.side,
            order.quantity,
            order.entry_price,
            order.take_profit_price,
            order.stop_loss_price
        );
        self.post_order(&OrderBody {
            symbol: &order.symbol,
            qty: order.quantity.to_string(),
            side: order.side.as_side(),
            order_type: "market",
            time_in_force: "gtc",
            client_order_id: order.client_order_id.clone(),
            order_class: Some("bracket"),
            take_profit: Some(TakeProfitLeg {
                limit_price: order.take_profit_price,
            }),
            stop_loss: Some(StopLossLeg {
                stop_price: order.stop_loss_price,
            }),
            trail_percent: None,
        })
        .await
    }

    async fn submit_trailing_stop_order(
        &self,
        order: &TrailingStopOrderRequest,
    ) -> Result<String, BrokerError> {
        let percent = trail_percent(order.trail_fraction);
        info!(
            "{}: trailing stop {} x{} at ~{} (trail {percent}%)",
            order.symbol, order.side, order.quantity, order.entry_price
        );

        let entry_id = self
            .post_order(&OrderBody {
                symbol: &order.symbol,
                qty: order.quantity.to_string(),
                side: order.side.as_side(),
                order_type: "market",
                time_in_force: "gtc",
                client_order_id: order.client_order_id.clone(),
                order_class: None,
                take_profit: None,
                stop_loss: None,
                trail_percent: None,
            })
            .await?;

        let exit = self
            .post_order(&OrderBody {
                symbol: &order.symbol,
                qty: order.quantity.to_string(),
                side: order.side.opposite().as_side(),
                order_type: "trailing_stop",
                time_in_force: "gtc",
                client_order_id: format!("{}-trail", order.client_order_id),
                order_class: None,
                take_profit: None,
                stop_loss: None,
                trail_percent: Some(percent),
            })
            .await;

        Ok(settle_trailing_exit(&order.symbol, entry_id, exit))
    }

    async fn open_position(&self, symbol: &str) -> Result<Option<Decimal>, BrokerError> {
        let resp = self
            .send_raw(self.client.get(format!("{}/v2/positions/{symbol}", self.trading_url)))
            .await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }
        let position: PositionResponse = resp
            .json()
            .await
            .map_err(|e| BrokerError::Decode(e.to_string()))?;
        Ok(Some(position.qty))
    }

    async fn filled_orders_since(
        &self,
        symbol: &str,
        since: DateTime<Utc>,
    ) -> Result<usize, BrokerError> {
        let after = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let resp = self
            .send(
                self.client
                    .get(format!("{}/v2/orders", self.trading_url))
                    .query(&[
                        ("status", "closed"),
                        ("after", after.as_str()),
                        ("direction", "desc"),
                        ("limit", "500"),
                        ("symbols", symbol),
                    ]),
            )
            .await?;
        let orders: Vec<ClosedOrder> = resp
            .json()
            .await
            .map_err(|e| BrokerError::Decode(e.to_string()))?;
        Ok(orders
            .iter()
            .filter(|o| o.symbol == symbol && o.status == "filled")
            .count())
    }
}
