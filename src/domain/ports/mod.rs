pub mod brokerage;
pub mod forecast_source;
