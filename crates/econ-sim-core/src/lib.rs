pub mod error;
pub mod primitives;
pub mod types;

#[cfg(feature = "fixed_income")]
pub mod time_value;

#[cfg(feature = "monetary")]
pub mod monetary;

#[cfg(feature = "fixed_income")]
pub mod fixed_income;

#[cfg(feature = "fixed_income")]
pub mod valuation;

#[cfg(feature = "fixed_income")]
pub mod portfolio;

#[cfg(feature = "derivatives")]
pub mod derivatives;

#[cfg(feature = "crypto")]
pub mod crypto;

#[cfg(feature = "actuarial")]
pub mod actuarial;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::EconSimError;
pub use types::*;

/// Standard result type for all econ-sim operations
pub type EconSimResult<T> = Result<T, EconSimError>;
