pub mod bonds;
pub mod money_market;
