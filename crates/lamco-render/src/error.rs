//! Error types for the render pipeline
//!
//! Errors raised while a frame is in flight never reach the frame source;
//! the render lane logs them and drops the frame. The remaining variants
//! are construction-time failures.

use lamco_frame::ConversionError;
use thiserror::Error;

/// Errors from renderers, the compositor and the presentation context
#[derive(Error, Debug)]
pub enum RenderError {
    /// Frame could not be turned into a displayable buffer
    #[error("Frame conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    /// Image has no geometry to describe
    #[error("Missing format description for image buffer")]
    MissingFormatDescription,

    /// Lanes must be spawned from inside a Tokio runtime
    #[error("No Tokio runtime available to spawn render lanes")]
    NoRuntime,

    /// Presentation context no longer accepts work
    #[error("Presentation context closed")]
    PresentationClosed,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for render operations
pub type Result<T> = std::result::Result<T, RenderError>;

impl RenderError {
    pub(crate) fn invalid_config(issues: &[String]) -> Self {
        Self::InvalidConfig(issues.join(", "))
    }

    /// Whether the error only affects a single frame
    #[must_use]
    pub fn is_frame_local(&self) -> bool {
        matches!(self, Self::Conversion(_) | Self::MissingFormatDescription)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lamco_frame::PixelFormat;

    #[test]
    fn test_error_display() {
        let err = RenderError::from(ConversionError::UnsupportedFormat(PixelFormat::I420));
        assert_eq!(err.to_string(), "Frame conversion failed: Unsupported pixel format: I420");

        let err = RenderError::invalid_config(&["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "Invalid configuration: a, b");
    }

    #[test]
    fn test_frame_local_classification() {
        assert!(RenderError::MissingFormatDescription.is_frame_local());
        assert!(!RenderError::NoRuntime.is_frame_local());
        assert!(!RenderError::PresentationClosed.is_frame_local());
    }
}
