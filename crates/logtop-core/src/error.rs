use thiserror::Error;

/// Errors returned when building an engine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("window capacity must be at least 1")]
    ZeroCapacity,

    #[error("unknown rank strategy '{0}' (expected 'scan' or 'ordered')")]
    UnknownStrategy(String),
}
