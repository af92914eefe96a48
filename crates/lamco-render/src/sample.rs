//! Timed samples handed to display sinks
//!
//! A [`MediaSample`] wraps a displayable [`PixelBuffer`] with a description
//! of its geometry and the timing the sink should honor. Live call video
//! only carries a presentation time: duration and decode time are invalid.

use std::fmt;
use std::sync::Arc;

use lamco_frame::{FrameSize, PixelBuffer, PixelFormat};

use crate::error::{RenderError, Result};

/// Timescale of a [`MediaTime`] built from nanoseconds
pub const NANOS_PER_SECOND: i32 = 1_000_000_000;

/// Rational timestamp, `value / timescale` seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MediaTime {
    /// Tick count
    pub value: i64,

    /// Ticks per second
    pub timescale: i32,

    valid: bool,
}

impl MediaTime {
    /// A time that carries no value
    pub const INVALID: Self = Self {
        value: 0,
        timescale: 0,
        valid: false,
    };

    /// Create a valid time of `value` ticks at `timescale` ticks per second
    ///
    /// A non-positive timescale produces [`MediaTime::INVALID`].
    #[must_use]
    pub const fn new(value: i64, timescale: i32) -> Self {
        if timescale <= 0 {
            return Self::INVALID;
        }
        Self {
            value,
            timescale,
            valid: true,
        }
    }

    /// Time from a nanosecond timestamp
    #[must_use]
    pub const fn from_nanos(nanos: i64) -> Self {
        Self::new(nanos, NANOS_PER_SECOND)
    }

    /// Whether this time carries a value
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Seconds, if valid
    #[must_use]
    pub fn as_secs_f64(&self) -> Option<f64> {
        self.valid
            .then(|| self.value as f64 / f64::from(self.timescale))
    }
}

impl Default for MediaTime {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for MediaTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_secs_f64() {
            Some(secs) => write!(f, "{secs:.6}s"),
            None => f.write_str("invalid"),
        }
    }
}

/// Timing attached to a sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SampleTiming {
    /// How long the sample is displayed
    pub duration: MediaTime,

    /// When the sample is displayed
    pub presentation: MediaTime,

    /// When the sample is decoded
    pub decode: MediaTime,
}

impl SampleTiming {
    /// Timing for live video: presentation time only
    #[must_use]
    pub const fn live(presentation: MediaTime) -> Self {
        Self {
            duration: MediaTime::INVALID,
            presentation,
            decode: MediaTime::INVALID,
        }
    }
}

/// Geometry and format of a sample's image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatDescription {
    /// Image dimensions
    pub size: FrameSize,

    /// Image pixel format
    pub pixel_format: PixelFormat,
}

impl FormatDescription {
    /// Describe `image`, or `None` if it has no pixels
    #[must_use]
    pub fn for_image(image: &PixelBuffer) -> Option<Self> {
        if image.size().is_empty() || image.plane_count() == 0 {
            return None;
        }
        Some(Self {
            size: image.size(),
            pixel_format: image.format(),
        })
    }
}

/// A displayable image ready to be enqueued on a sink
#[derive(Clone)]
pub struct MediaSample {
    image: Arc<PixelBuffer>,
    format: FormatDescription,
    timing: SampleTiming,
}

impl MediaSample {
    /// Wrap `image` with `timing`
    ///
    /// The image is described first; an image that cannot be described is
    /// rejected with [`RenderError::MissingFormatDescription`].
    pub fn ready_with_image(image: Arc<PixelBuffer>, timing: SampleTiming) -> Result<Self> {
        let format = FormatDescription::for_image(&image).ok_or(RenderError::MissingFormatDescription)?;
        Ok(Self { image, format, timing })
    }

    /// Image buffer
    pub fn image(&self) -> &Arc<PixelBuffer> {
        &self.image
    }

    /// Format description
    pub fn format(&self) -> &FormatDescription {
        &self.format
    }

    /// Sample timing
    pub fn timing(&self) -> &SampleTiming {
        &self.timing
    }

    /// Presentation time
    pub fn presentation_time(&self) -> MediaTime {
        self.timing.presentation
    }
}

impl fmt::Debug for MediaSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaSample")
            .field("size", &self.format.size)
            .field("format", &self.format.pixel_format)
            .field("pool", &self.image.pool_id())
            .field("pts", &self.timing.presentation)
            .finish()
    }
}
