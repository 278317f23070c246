pub mod order_intent;
pub mod trade_pick;
