// error.rs - Error types for the engine and its persistence seam

use thiserror::Error;

/// Errors raised while building a grid or a shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifeError {
    /// Width or height below one, or too large for `i32` coordinates.
    #[error("invalid grid dimension: {width}x{height}")]
    InvalidDimension {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// Shape points farther apart along one axis than `i32` can hold.
    #[error("shape spans {span} cells, more than a coordinate can hold")]
    ShapeOutOfRange { span: i64 },
}

/// Errors raised by a [`ShapeStore`](crate::ShapeStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("shape store io error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored data is not a valid shape list.
    #[error("shape store json error: {0}")]
    Json(#[from] serde_json::Error),
}
