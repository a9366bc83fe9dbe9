use thiserror::Error;

/// Errors surfaced by the engine.
///
/// Every variant is raised before any simulation state exists, so a failed
/// call never leaves partial results behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl EngineError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        EngineError::InvalidInput(msg.into())
    }
}
