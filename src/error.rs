//! Error type shared by the engine and the JNI bridge.
//!
//! Malformed geometry is never an error here: it is dropped where it is
//! decoded. Only caller mistakes and I/O-ish failures at the boundary
//! (JSON, GPX) surface as `EngineError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("waypoint spacing must be at least 0.1 m, got {0}")]
    InvalidSpacing(f64),
    #[error("failed to decode JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to build GPX document: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
    #[error("no route has been loaded")]
    NoRoute,
}
