use autotrader::cli::commands::{Cli, Commands};
use autotrader::domain::ports::forecast_source::PickScope;
use autotrader::domain::values::execution::ExecutionMode;
use autotrader::infrastructure::settings::{load_execution_config, Settings};
use autotrader::AutoTrader;
use chrono::NaiveDate;
use clap::Parser;
use std::path::Path;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run_command(cli.command).await {
        log::error!("{e}");
        std::process::exit(1);
    }
}

async fn run_command(cmd: Commands) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env();
    settings.require_forecast_session()?;

    match cmd {
        Commands::Tickers => {
            let at = AutoTrader::from_settings(&settings, ExecutionMode::DryRun);
            let tickers = at.supported_tickers().await?;
            println!("{}", serde_json::to_string_pretty(&tickers)?);
        }
        Commands::Picks { date, scope } => {
            let date = parse_date(&date)?;
            let scope: PickScope = scope.parse()?;
            let at = AutoTrader::from_settings(&settings, ExecutionMode::DryRun);
            let picks = at.trade_picks(date, scope).await?;
            println!("{}", serde_json::to_string_pretty(&picks)?);
        }
        Commands::Run {
            date,
            scope,
            config,
            dry_run,
        } => {
            let date = parse_date(&date)?;
            let scope: PickScope = scope.parse()?;
            let config = load_execution_config(Path::new(&config))?;
            settings.require_broker_credentials()?;

            let mode = if dry_run {
                ExecutionMode::DryRun
            } else {
                ExecutionMode::Live
            };
            let at = AutoTrader::from_settings(&settings, mode);
            let run = at.submit_trade_picks(date, scope, &config).await?;
            println!("{}", serde_json::to_string_pretty(&run)?);
        }
    }
    Ok(())
}

fn parse_date(s: &Option<String>) -> Result<NaiveDate, String> {
    match s {
        None => Ok(chrono::Utc::now().date_naive()),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date format: {s}. Use YYYY-MM-DD")),
    }
}
