pub mod brokers;
pub mod forecasts;
pub mod settings;
