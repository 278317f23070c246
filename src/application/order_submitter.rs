use std::sync::Arc;

use log::{info, warn};

use crate::domain::entities::order_intent::{ExitLeg, OrderIntent};
use crate::domain::ports::brokerage::{
    BracketOrderRequest, BrokerError, Brokerage, TrailingStopOrderRequest,
};
use crate::domain::values::execution::{ExecutionOutcome, SkipReason};

/// Sends one order per intent and classifies the brokerage response.
///
/// No retries: each intent gets exactly one submission call.
pub struct OrderSubmitter {
    broker: Arc<dyn Brokerage>,
}

impl OrderSubmitter {
    pub fn new(broker: Arc<dyn Brokerage>) -> Self {
        Self { broker }
    }

    pub async fn submit(&self, intent: &OrderIntent) -> ExecutionOutcome {
        let result = match &intent.exit {
            ExitLeg::TakeProfit { price } => {
                self.broker
                    .submit_bracket_order(&BracketOrderRequest {
                        client_order_id: intent.client_order_id.clone(),
                        symbol: intent.symbol.clone(),
                        side: intent.side,
                        quantity: intent.quantity,
                        entry_price: intent.entry_price,
                        take_profit_price: *price,
                        stop_loss_price: intent.stop_loss_price,
                    })
                    .await
            }
            ExitLeg::TrailingStop { trail_fraction } => {
                self.broker
                    .submit_trailing_stop_order(&TrailingStopOrderRequest {
                        client_order_id: intent.client_order_id.clone(),
                        symbol: intent.symbol.clone(),
                        side: intent.side,
                        quantity: intent.quantity,
                        entry_price: intent.entry_price,
                        trail_fraction: *trail_fraction,
                    })
                    .await
            }
        };
        classify(&intent.symbol, result)
    }
}

/// Map a brokerage response onto the outcome taxonomy.
pub fn classify(symbol: &str, result: Result<String, BrokerError>) -> ExecutionOutcome {
    match result {
        Ok(order_id) => {
            info!("{symbol}: order submitted ({order_id})");
            ExecutionOutcome::submitted(order_id, symbol)
        }
        Err(BrokerError::Rejected { status, message }) => {
            warn!("{symbol}: brokerage rejected order ({status}): {message}");
            ExecutionOutcome::skipped(symbol, SkipReason::BrokerRejected(message))
        }
        Err(e) => {
            warn!("{symbol}: order submission failed: {e}");
            ExecutionOutcome::failed(symbol, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_submitted() {
        let outcome = classify("LYFT", Ok("ord-1".into()));
        assert_eq!(outcome, ExecutionOutcome::submitted("ord-1", "LYFT"));
    }

    #[test]
    fn test_business_rejection_is_skip() {
        let outcome = classify(
            "NFLX",
            Err(BrokerError::Rejected {
                status: 422,
                message: "asset NFLX cannot be sold short".into(),
            }),
        );
        match outcome {
            ExecutionOutcome::Skipped { symbol, reason } => {
                assert_eq!(symbol, "NFLX");
                assert!(reason.to_string().contains("cannot be sold short"));
            }
            other => panic!("expected skip, got {other:?}"),
        }
    }

    #[test]
    fn test_transport_and_auth_are_failures() {
        let outcome = classify("V", Err(BrokerError::Transport("connection reset".into())));
        assert!(matches!(outcome, ExecutionOutcome::Failed { .. }));

        let outcome = classify("V", Err(BrokerError::Auth("bad key".into())));
        match outcome {
            ExecutionOutcome::Failed { error_detail, .. } => assert!(error_detail.contains("bad key")),
            other => panic!("expected failure, got {other:?}"),
        }
    }
}
