//! Batch pipeline: filter, then per pick size, staleness-check, price the
//! protective levels, shape the order and submit it.
//!
//! Picks are independent. A pick's failure is recorded in the report and never
//! aborts the batch; only invalid config does, before any network call.

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use log::{debug, error, info, warn};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;

use crate::application::execution_report::ExecutionReport;
use crate::application::order_strategy::OrderTypeStrategy;
use crate::application::order_submitter::OrderSubmitter;
use crate::application::pick_filter::filter_picks;
use crate::application::position_sizer::size_position;
use crate::application::risk_prices::compute_risk_levels;
use crate::application::staleness_guard::{check_staleness, Staleness};
use crate::domain::entities::trade_pick::TradePick;
use crate::domain::error::DomainError;
use crate::domain::ports::brokerage::Brokerage;
use crate::domain::values::execution::{ExecutionOutcome, SkipReason};
use crate::domain::values::execution_config::ExecutionConfig;

pub struct RunBatchUseCase {
    broker: Arc<dyn Brokerage>,
}

impl RunBatchUseCase {
    pub fn new(broker: Arc<dyn Brokerage>) -> Self {
        Self { broker }
    }

    /// Process a batch of picks and return one outcome per eligible pick, in
    /// input order regardless of completion order.
    pub async fn execute(
        &self,
        picks: &[TradePick],
        config: &ExecutionConfig,
    ) -> Result<ExecutionReport, DomainError> {
        config.validate()?;

        let eligible = filter_picks(picks, config);
        info!(
            "{} of {} picks eligible ({} order type, {} per trade, via {})",
            eligible.len(),
            picks.len(),
            config.trade_order_type,
            config.investment_per_trade,
            self.broker.name()
        );
        if eligible.is_empty() {
            return Ok(ExecutionReport::new());
        }

        let deadline = config
            .batch_timeout()
            .and_then(|t| Instant::now().checked_add(t));
        let pipeline = Arc::new(PickPipeline {
            broker: self.broker.clone(),
            config: config.clone(),
            strategy: OrderTypeStrategy::from_config(config),
            submitter: OrderSubmitter::new(self.broker.clone()),
        });

        let report = if config.max_concurrent_picks <= 1 {
            run_sequential(pipeline, eligible, deadline).await
        } else {
            run_bounded(pipeline, eligible, deadline, config.max_concurrent_picks).await
        };

        info!(
            "Batch complete: {} processed, {} submitted, {} skipped, {} failed",
            report.total(),
            report.submitted_count(),
            report.skipped_count(),
            report.failed_count()
        );
        Ok(report)
    }
}

fn past_deadline(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

fn timeout_outcome(pick: &TradePick) -> ExecutionOutcome {
    warn!("{}: not started before batch deadline", pick.symbol);
    ExecutionOutcome::skipped(pick.symbol.clone(), SkipReason::BatchTimeout)
}

async fn run_sequential(
    pipeline: Arc<PickPipeline>,
    picks: Vec<TradePick>,
    deadline: Option<Instant>,
) -> ExecutionReport {
    let mut report = ExecutionReport::new();
    for pick in &picks {
        let outcome = if past_deadline(deadline) {
            timeout_outcome(pick)
        } else {
            pipeline.process(pick).await
        };
        report.push(outcome);
    }
    report
}

async fn run_bounded(
    pipeline: Arc<PickPipeline>,
    picks: Vec<TradePick>,
    deadline: Option<Instant>,
    max_concurrent: usize,
) -> ExecutionReport {
    let semaphore = Arc::new(Semaphore::new(max_concurrent));
    let mut tasks = JoinSet::new();

    for (index, pick) in picks.iter().cloned().enumerate() {
        let semaphore = semaphore.clone();
        let pipeline = pipeline.clone();
        tasks.spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => return (index, ExecutionOutcome::failed(pick.symbol.clone(), e.to_string())),
            };
            let outcome = if past_deadline(deadline) {
                timeout_outcome(&pick)
            } else {
                pipeline.process(&pick).await
            };
            (index, outcome)
        });
    }

    // Single writer: outcomes land in their input slot as tasks finish.
    let mut slots: Vec<Option<ExecutionOutcome>> = vec![None; picks.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, outcome)) => slots[index] = Some(outcome),
            Err(e) => error!("pick task aborted: {e}"),
        }
    }

    let outcomes = slots
        .into_iter()
        .zip(&picks)
        .map(|(slot, pick)| {
            slot.unwrap_or_else(|| ExecutionOutcome::failed(pick.symbol.clone(), "processing task aborted"))
        })
        .collect();
    ExecutionReport::from_outcomes(outcomes)
}

struct PickPipeline {
    broker: Arc<dyn Brokerage>,
    config: ExecutionConfig,
    strategy: OrderTypeStrategy,
    submitter: OrderSubmitter,
}

impl PickPipeline {
    async fn process(&self, pick: &TradePick) -> ExecutionOutcome {
        let symbol = pick.symbol.as_str();

        if let Err(e) = pick.validate() {
            warn!("{symbol}: malformed pick: {e}");
            return ExecutionOutcome::failed(symbol, e.to_string());
        }

        let live_price = match self.broker.latest_price(symbol).await {
            Ok(price) => price,
            Err(e) => {
                warn!("{symbol}: could not fetch live price: {e}");
                return ExecutionOutcome::failed(symbol, format!("live price unavailable: {e}"));
            }
        };

        let quantity = match size_position(self.config.investment_per_trade, live_price) {
            Ok(0) => {
                info!(
                    "{symbol}: budget {} below live price {live_price}",
                    self.config.investment_per_trade
                );
                return ExecutionOutcome::skipped(symbol, SkipReason::InsufficientBudget);
            }
            Ok(quantity) => quantity,
            Err(e) => {
                warn!("{symbol}: bad live price: {e}");
                return ExecutionOutcome::failed(symbol, e.to_string());
            }
        };

        let Some(target) = pick.target_price() else {
            return ExecutionOutcome::failed(symbol, "target price overflows");
        };
        if check_staleness(pick.action, live_price, target) == Staleness::AlreadyMoved {
            info!(
                "{symbol}: price already moved ({} with live {live_price}, target {target})",
                pick.action
            );
            return ExecutionOutcome::skipped(symbol, SkipReason::PriceAlreadyMoved);
        }

        if let Some(outcome) = self.check_account_guards(symbol).await {
            return outcome;
        }

        let levels = match compute_risk_levels(pick, live_price, &self.config) {
            Ok(levels) => levels,
            Err(e) => {
                warn!("{symbol}: cannot price protective levels: {e}");
                return ExecutionOutcome::failed(symbol, e.to_string());
            }
        };

        if levels.collapsed(pick.action, self.strategy.order_type()) {
            info!(
                "{symbol}: protective levels collapsed (live {live_price}, stop {}, target {})",
                levels.stop_loss_price, levels.take_profit_price
            );
            return ExecutionOutcome::skipped(symbol, SkipReason::ProtectiveLevelsCollapsed);
        }

        if let Some(min_ratio) = self.config.min_reward_risk_ratio {
            // An overflowing ratio is above any configurable minimum.
            match levels.reward_risk_ratio() {
                Some(ratio) if ratio < min_ratio => {
                    info!("{symbol}: reward/risk {ratio:.2} below {min_ratio}");
                    return ExecutionOutcome::skipped(symbol, SkipReason::RewardBelowRisk);
                }
                _ => {}
            }
        }

        let intent = self.strategy.build_intent(pick, quantity, &levels);
        debug!(
            "{symbol}: expected {}, live {live_price}, forecast stop {} -> {}, notional {}",
            pick.entry_price,
            pick.stop_loss_price,
            intent.stop_loss_price,
            intent.notional()
        );
        self.submitter.submit(&intent).await
    }

    /// Open-position and recent-fill checks against the brokerage account.
    async fn check_account_guards(&self, symbol: &str) -> Option<ExecutionOutcome> {
        if self.config.skip_if_position_open {
            match self.broker.open_position(symbol).await {
                Ok(Some(qty)) if !qty.is_zero() => {
                    info!("{symbol}: already holding {qty} shares");
                    return Some(ExecutionOutcome::skipped(symbol, SkipReason::PositionAlreadyOpen));
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("{symbol}: position lookup failed: {e}");
                    return Some(ExecutionOutcome::failed(symbol, format!("position lookup failed: {e}")));
                }
            }
        }

        if let Some(hours) = self.config.recent_trade_cooldown_hours {
            let since = Utc::now()
                .checked_sub_signed(ChronoDuration::hours(i64::from(hours)))
                .unwrap_or(DateTime::<Utc>::MIN_UTC);
            match self.broker.filled_orders_since(symbol, since).await {
                Ok(0) => {}
                Ok(n) => {
                    info!("{symbol}: {n} fills in the last {hours}h");
                    return Some(ExecutionOutcome::skipped(symbol, SkipReason::RecentlyTraded));
                }
                Err(e) => {
                    warn!("{symbol}: order history lookup failed: {e}");
                    return Some(ExecutionOutcome::failed(
                        symbol,
                        format!("order history lookup failed: {e}"),
                    ));
                }
            }
        }
        None
    }
}
