use thiserror::Error;

#[derive(Debug, Error)]
pub enum EconSimError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for EconSimError {
    fn from(e: serde_json::Error) -> Self {
        EconSimError::SerializationError(e.to_string())
    }
}

/// Reject a non-finite input field. Every scenario parameter must be a
/// finite number before a model sees it.
pub(crate) fn require_finite(field: &str, value: f64) -> Result<f64, EconSimError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EconSimError::InvalidInput {
            field: field.into(),
            reason: format!("must be a finite number, got {value}"),
        })
    }
}
