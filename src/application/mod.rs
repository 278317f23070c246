pub mod execution_report;
pub mod order_strategy;
pub mod order_submitter;
pub mod pick_filter;
pub mod position_sizer;
pub mod risk_prices;
pub mod run_batch;
pub mod staleness_guard;
