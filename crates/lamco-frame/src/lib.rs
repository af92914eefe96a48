//! # lamco-frame
//!
//! Video frame types, pooled pixel buffers and I420 to NV12 conversion for
//! rendering live call video.
//!
//! This crate is part of the [lamco-pip](https://github.com/lamco-admin/lamco-pip)
//! workspace and provides the pixel-level building blocks used by
//! [`lamco-render`](https://crates.io/crates/lamco-render).
//!
//! # Features
//!
//! - **Frame Types**: Native (zero-copy) and planar I420 payloads
//! - **Buffer Pooling**: Bounded, geometry-keyed pools that never block
//! - **NV12 Conversion**: Stride-aware luma copy and chroma interleave
//! - **Throttling**: Deterministic every-Nth-frame admission
//!
//! # Quick Start
//!
//! ```rust
//! use lamco_frame::{ColorConverter, FrameSize, FrameThrottler, I420Buffer, PixelBufferPool, PoolConfig, VideoFrame};
//!
//! let throttler = FrameThrottler::new(2);
//! let mut pool = PixelBufferPool::new(PoolConfig::default());
//! let mut converter = ColorConverter::new();
//!
//! for index in 1..=4u64 {
//!     let planar = I420Buffer::from_packed(FrameSize::new(4, 4), &[16u8; 24]).expect("frame");
//!     let frame = VideoFrame::i420(planar, index as i64 * 33_000_000);
//!
//!     if !throttler.admit(index) {
//!         continue;
//!     }
//!     let nv12 = converter.convert(&frame, &mut pool)?;
//!     assert_eq!(nv12.width(), 4);
//! }
//! assert_eq!(converter.stats().frames_converted, 2);
//! # Ok::<(), lamco_frame::ConversionError>(())
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────┐
//! │  VideoFrame        │  Native buffer or I420 planes
//! └─────────┬──────────┘
//!           ▼
//! ┌────────────────────┐
//! │  FrameThrottler    │ ◄── Every Nth frame, drop the rest
//! └─────────┬──────────┘
//!           ▼
//! ┌────────────────────┐
//! │  ColorConverter    │ ◄── Native passthrough
//! │                    │     I420 → NV12
//! └─────────┬──────────┘
//!           ▼
//! ┌────────────────────┐
//! │  PixelBufferPool   │ ◄── One pool per geometry
//! └────────────────────┘
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod buffer;
pub mod config;
pub mod convert;
pub mod error;
pub mod format;
pub mod frame;
pub mod pool;
pub mod throttle;

// =============================================================================
// RE-EXPORTS - PRIMARY API
// =============================================================================

pub use buffer::{PixelBuffer, Plane};
pub use config::{PoolConfig, PoolConfigBuilder};
pub use convert::{i420_to_nv12, ColorConverter, ConversionStats};
pub use error::{ConversionError, PoolError, Result};
pub use format::{aligned_stride, checked_aligned_stride, FrameSize, PixelFormat, PlaneDimensions};
pub use frame::{FramePayload, I420Buffer, SamplePlane, VideoFrame};
pub use pool::{BufferGeometry, PixelBufferPool, PoolId};
pub use throttle::FrameThrottler;

// =============================================================================
// CRATE-LEVEL ITEMS
// =============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Bytes an NV12 buffer of `size` occupies with rows aligned to `row_alignment`
///
/// `None` if the buffer could not be addressed.
#[must_use]
pub fn nv12_buffer_size(size: FrameSize, row_alignment: usize) -> Option<usize> {
    PixelFormat::Nv12.buffer_len(size, row_alignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nv12_buffer_size() {
        // 1920x1080: 1920 * 1080 luma + 1920 * 540 chroma
        assert_eq!(nv12_buffer_size(FrameSize::new(1920, 1080), 64), Some(3_110_400));
        assert_eq!(nv12_buffer_size(FrameSize::new(4, 4), 64), Some(64 * 4 + 64 * 2));
        assert_eq!(nv12_buffer_size(FrameSize::new(u32::MAX, u32::MAX), usize::MAX), None);
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
