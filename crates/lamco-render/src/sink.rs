//! Display sink abstraction
//!
//! A sink is whatever puts samples on screen: an on-screen layer, a PiP
//! surface, a test recorder. Sinks are not safe for concurrent driving, so
//! renderers only call into them from the presentation context.

use std::fmt;

use crate::sample::MediaSample;

/// Internal status reported by a display sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkStatus {
    /// Nothing enqueued yet
    #[default]
    Unknown,
    /// Displaying samples
    Rendering,
    /// Sink hit an internal fault and needs a flush
    Failed,
}

impl SinkStatus {
    /// Whether a flush is needed before the next enqueue
    #[must_use]
    pub fn needs_flush(self) -> bool {
        self == Self::Failed
    }
}

impl fmt::Display for SinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Rendering => write!(f, "rendering"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Surface that displays enqueued samples
///
/// Methods take `&self`; implementations keep their own interior state.
pub trait DisplaySink: Send + Sync {
    /// Current status
    fn status(&self) -> SinkStatus;

    /// Drop queued samples and clear any failure
    fn flush(&self);

    /// Queue `sample` for display
    fn enqueue(&self, sample: MediaSample);

    /// Flush and also clear the image currently on screen
    fn flush_and_remove_image(&self) {
        self.flush();
    }
}
