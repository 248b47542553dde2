pub mod actuarial;
pub mod crypto;
pub mod derivatives;
pub mod fixed_income;
pub mod monetary;
pub mod portfolio;
pub mod scenarios;
pub mod time_value;
pub mod valuation;
