pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

use crate::application::execution_report::{BatchRun, ExecutionReport};
use crate::application::run_batch::RunBatchUseCase;
use crate::domain::entities::trade_pick::TradePick;
use crate::domain::error::DomainError;
use crate::domain::ports::brokerage::Brokerage;
use crate::domain::ports::forecast_source::{ForecastSource, PickScope, SupportedTicker};
use crate::domain::values::execution::ExecutionMode;
use crate::domain::values::execution_config::ExecutionConfig;
use crate::infrastructure::brokers::alpaca::AlpacaClient;
use crate::infrastructure::brokers::dry_run::DryRunBrokerage;
use crate::infrastructure::forecasts::predicto::PredictoClient;
use crate::infrastructure::settings::Settings;
use chrono::NaiveDate;
use log::info;
use std::sync::Arc;

pub struct AutoTrader {
    forecasts: Arc<dyn ForecastSource>,
    run_batch_uc: RunBatchUseCase,
    mode: ExecutionMode,
}

impl AutoTrader {
    /// Build from `AUTOTRADER_*` environment variables.
    pub fn new(mode: ExecutionMode) -> Self {
        Self::from_settings(&Settings::from_env(), mode)
    }

    pub fn from_settings(settings: &Settings, mode: ExecutionMode) -> Self {
        let forecasts: Arc<dyn ForecastSource> = Arc::new(PredictoClient::new(
            settings.forecast_session.clone(),
            settings.forecast_url.clone(),
        ));
        let broker: Arc<dyn Brokerage> = Arc::new(AlpacaClient::new(
            settings.broker_key_id.clone(),
            settings.broker_secret.clone(),
            settings.broker_url.clone(),
            settings.broker_data_url.clone(),
        ));
        Self::with_providers(forecasts, broker, mode)
    }

    /// In `DryRun` mode the brokerage is wrapped so nothing is submitted.
    pub fn with_providers(
        forecasts: Arc<dyn ForecastSource>,
        broker: Arc<dyn Brokerage>,
        mode: ExecutionMode,
    ) -> Self {
        let broker: Arc<dyn Brokerage> = match mode {
            ExecutionMode::Live => broker,
            ExecutionMode::DryRun => Arc::new(DryRunBrokerage::new(broker)),
        };
        Self {
            forecasts,
            run_batch_uc: RunBatchUseCase::new(broker),
            mode,
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub async fn supported_tickers(&self) -> Result<Vec<SupportedTicker>, DomainError> {
        self.forecasts.supported_tickers().await
    }

    pub async fn trade_picks(
        &self,
        date: NaiveDate,
        scope: PickScope,
    ) -> Result<Vec<TradePick>, DomainError> {
        self.forecasts.trade_picks_for_date(date, scope).await
    }

    pub async fn run_batch(
        &self,
        picks: &[TradePick],
        config: &ExecutionConfig,
    ) -> Result<ExecutionReport, DomainError> {
        self.run_batch_uc.execute(picks, config).await
    }

    /// Fetch the picks for `date` and execute them as one batch.
    pub async fn submit_trade_picks(
        &self,
        date: NaiveDate,
        scope: PickScope,
        config: &ExecutionConfig,
    ) -> Result<BatchRun, DomainError> {
        config.validate()?;

        let picks = self.trade_picks(date, scope).await?;
        info!(
            "Fetched {} {scope} picks for {date} from {}",
            picks.len(),
            self.forecasts.name()
        );
        let report = self.run_batch(&picks, config).await?;

        Ok(BatchRun {
            as_of: date,
            scope,
            mode: self.mode,
            picks_received: picks.len(),
            // One outcome per eligible pick.
            picks_eligible: report.total(),
            summary: report.summary(),
            report,
        })
    }
}
