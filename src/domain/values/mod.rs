pub mod execution;
pub mod execution_config;
pub mod order_type;
pub mod price;
pub mod trade_action;
