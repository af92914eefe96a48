//! Error types for PiP and bridge operations
//!
//! Provides typed errors that callers can match on. The native bridge logs
//! and swallows all of them; the typed API returns them.

use lamco_render::RenderError;
use thiserror::Error;

/// Errors that can occur while setting up PiP or wiring tracks
///
/// # Examples
///
/// ```no_run
/// # use lamco_overlay::{PipContext, PipError};
/// # fn example(context: &PipContext) {
/// match context.setup_pip() {
///     Ok(()) => println!("PiP configured"),
///     Err(PipError::Unsupported) => eprintln!("Device cannot do PiP"),
///     Err(PipError::NoRootSurface) => eprintln!("UI not ready yet"),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # }
/// ```
#[derive(Error, Debug)]
pub enum PipError {
    /// The platform cannot show a PiP window
    #[error("Picture-in-picture not supported on this device")]
    Unsupported,

    /// The UI layer has no root surface to anchor the PiP window
    ///
    /// Usually means setup ran before the UI finished launching. Calling
    /// setup again later is fine.
    #[error("No root surface available for picture-in-picture")]
    NoRootSurface,

    /// The track registry has no track with this id
    #[error("No track registered for id {0}")]
    TrackNotFound(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Rendering could not be started or drained
    #[error("Render pipeline error: {0}")]
    Render(#[from] RenderError),
}

/// Result type for PiP operations
pub type Result<T> = std::result::Result<T, PipError>;

impl PipError {
    pub(crate) fn track_not_found(track_id: impl Into<String>) -> Self {
        Self::TrackNotFound(track_id.into())
    }

    pub(crate) fn invalid_config(issues: &[String]) -> Self {
        Self::InvalidConfig(issues.join(", "))
    }

    /// Whether retrying later may succeed
    ///
    /// A missing root surface or track can appear once the UI or the call
    /// catches up; an unsupported device or bad configuration will not.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoRootSurface | Self::TrackNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipError::track_not_found("video-1");
        assert_eq!(err.to_string(), "No track registered for id video-1");

        let err = PipError::from(RenderError::NoRuntime);
        assert_eq!(
            err.to_string(),
            "Render pipeline error: No Tokio runtime available to spawn render lanes"
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(PipError::NoRootSurface.is_recoverable());
        assert!(PipError::track_not_found("x").is_recoverable());
        assert!(!PipError::Unsupported.is_recoverable());
        assert!(!PipError::invalid_config(&["bad".to_string()]).is_recoverable());
    }
}
