//! Error types for buffer allocation and pixel conversion
//!
//! None of these are fatal to a call: the renderer drops the offending
//! frame, logs the error and carries on with the next one.

use thiserror::Error;

use crate::format::{FrameSize, PixelFormat};

/// Errors from [`PixelBufferPool`](crate::pool::PixelBufferPool)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// Requested geometry has a zero dimension or cannot be addressed
    #[error("Invalid buffer geometry: {0}")]
    InvalidGeometry(FrameSize),

    /// Every buffer of the pool is still in flight
    ///
    /// Buffers return to the pool when the sample holding them is dropped
    /// by the display sink. Allocation never waits for that to happen.
    #[error("Pixel buffer pool exhausted: {capacity} buffers outstanding")]
    Exhausted {
        /// Pool capacity
        capacity: usize,
    },
}

/// Errors from [`ColorConverter`](crate::convert::ColorConverter)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    /// Payload or destination format cannot be handled
    #[error("Unsupported pixel format: {0}")]
    UnsupportedFormat(PixelFormat),

    /// Frame has a zero dimension
    #[error("Frame has no pixels")]
    EmptyFrame,

    /// Plane stride shorter than its visible row
    #[error("{plane} plane stride {stride} is shorter than row width {row_bytes}")]
    InvalidStride {
        /// Plane name (Y, U or V)
        plane: &'static str,
        /// Declared stride
        stride: usize,
        /// Visible bytes per row
        row_bytes: usize,
    },

    /// Plane data does not cover the declared geometry
    #[error("{plane} plane too small: need {needed} bytes, got {actual}")]
    PlaneTooSmall {
        /// Plane name (Y, U or V)
        plane: &'static str,
        /// Bytes required by geometry and stride
        needed: usize,
        /// Bytes available
        actual: usize,
    },

    /// Frame geometry cannot be addressed in memory
    #[error("Frame geometry {0} is too large")]
    GeometryTooLarge(FrameSize),

    /// Destination buffer geometry differs from the source frame
    #[error("Destination buffer is {actual}, source frame is {expected}")]
    DestinationMismatch {
        /// Source frame size
        expected: FrameSize,
        /// Destination buffer size
        actual: FrameSize,
    },

    /// Destination buffer could not be allocated
    #[error("Buffer allocation failed: {0}")]
    Pool(#[from] PoolError),
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConversionError>;

impl ConversionError {
    /// Whether the failure comes from resource exhaustion rather than bad input
    #[must_use]
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(self, Self::Pool(PoolError::Exhausted { .. }))
    }
}
