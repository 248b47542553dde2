//! Actuarial models: mortality and insurer solvency.

pub mod gompertz;
pub mod ruin;
