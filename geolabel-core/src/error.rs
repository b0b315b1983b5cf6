use thiserror::Error;

/// Errors originating from the transform and navigation core.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid {what}: {value} (must be positive and finite)")]
    InvalidDimension { what: &'static str, value: f64 },

    #[error("no labelling session is active")]
    UninitializedState,
}
