use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "autotrader", about = "Submit daily forecast trade picks as protected orders")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List instruments supported by the forecasting service
    Tickers,
    /// Show trade picks for a date
    Picks {
        /// Forecast date (YYYY-MM-DD), defaults to today (UTC)
        #[arg(long)]
        date: Option<String>,
        /// Pick scope (all, my_picks)
        #[arg(long, default_value = "all")]
        scope: String,
    },
    /// Execute the trade picks for a date
    Run {
        /// Forecast date (YYYY-MM-DD), defaults to today (UTC)
        #[arg(long)]
        date: Option<String>,
        /// Pick scope (all, my_picks)
        #[arg(long, default_value = "all")]
        scope: String,
        /// Path to the execution config JSON
        #[arg(long)]
        config: String,
        /// Price everything but submit nothing
        #[arg(long)]
        dry_run: bool,
    },
}
