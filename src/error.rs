//! Error types for the proximity engine and the distance-service boundary.

use thiserror::Error;

/// Errors raised while building an index, planning batches or running a pipeline.
#[derive(Error, Debug)]
pub enum WalkwaysError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown stop: {0}")]
    UnknownStop(String),

    #[error("No stops to index")]
    EmptyInput,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),
}

/// Failure reported by a distance-matrix service for one request.
///
/// The orchestrator recovers from these per batch, so they never abort a
/// run; they only surface to callers that talk to a service directly.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("Service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, WalkwaysError>;
