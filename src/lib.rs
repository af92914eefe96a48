//! # lamco-pip
//!
//! Live call video rendering, dual-stream compositing and picture-in-picture
//! for Rust.
//!
//! This crate provides a unified interface to the lamco call video libraries:
//!
//! - **[`frame`]** - Frame types, pixel buffer pools and I420 to NV12 conversion
//! - **[`render`]** - Throttled, lane-per-stream rendering onto display sinks
//! - **[`overlay`]** - PiP lifecycle, call context and native bridge
//!
//! # Features
//!
//! All features are enabled by default. You can selectively enable only what you need:
//!
//! ```toml
//! # Use everything (default)
//! lamco-pip = "0.1"
//!
//! # Conversion only
//! lamco-pip = { version = "0.1", default-features = false, features = ["frame"] }
//!
//! # Rendering without PiP
//! lamco-pip = { version = "0.1", default-features = false, features = ["frame", "render"] }
//! ```
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `frame` | Yes | Frame types and conversion |
//! | `render` | Yes | Frame renderers and compositor |
//! | `overlay` | Yes | PiP and native bridge |
//! | `full` | No | All features |
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lamco_pip::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Surfaces and platform come from the UI layer
//!     let context = Arc::new(PipContext::new(OverlayConfig::default(), surfaces, platform)?);
//!     let bridge = NativeBridge::new(Arc::clone(&context), registry);
//!
//!     bridge.attach_renderer(&remote_track_id);
//!     let capture = bridge.local_capture_processor();
//!
//!     // Capture thread: encoder_frame = capture.process(camera_frame);
//!
//!     bridge.setup_pip();
//!     bridge.start_pip();
//!
//!     // ... call ends ...
//!     context.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          lamco-pip                              │
//! ├─────────────────┬─────────────────────┬─────────────────────────┤
//! │   lamco-frame   │    lamco-render     │     lamco-overlay       │
//! │                 │                     │                         │
//! │  VideoFrame     │  FrameRenderer      │  PipController          │
//! │  PixelBufferPool│  DualStreamComposit.│  PipContext             │
//! │  ColorConverter │  PresentationQueue  │  NativeBridge           │
//! └────────┬────────┴──────────┬──────────┴────────────┬────────────┘
//!          │                   │                       │
//!          ▼                   ▼                       ▼
//!    Decoded frames       Display sinks           Platform PiP window
//! ```
//!
//! # Related Crates
//!
//! You can also use the individual crates directly:
//!
//! - [`lamco-frame`](https://crates.io/crates/lamco-frame) - Frames and conversion only
//! - [`lamco-render`](https://crates.io/crates/lamco-render) - Rendering only
//! - [`lamco-overlay`](https://crates.io/crates/lamco-overlay) - PiP and bridge

#![cfg_attr(docsrs, feature(doc_cfg))]

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// RE-EXPORTS
// =============================================================================

/// Frame types, pixel buffer pools and color conversion.
///
/// See [`lamco_frame`] documentation for details.
#[cfg(feature = "frame")]
#[cfg_attr(docsrs, doc(cfg(feature = "frame")))]
pub use lamco_frame as frame;

/// Frame renderers, presentation context and dual-stream compositor.
///
/// See [`lamco_render`] documentation for details.
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub use lamco_render as render;

/// Picture-in-picture lifecycle, call context and native bridge.
///
/// See [`lamco_overlay`] documentation for details.
#[cfg(feature = "overlay")]
#[cfg_attr(docsrs, doc(cfg(feature = "overlay")))]
pub use lamco_overlay as overlay;

// =============================================================================
// PRELUDE - Common types for convenience
// =============================================================================

/// Prelude module with commonly used types.
///
/// ```rust
/// use lamco_pip::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "frame")]
    pub use lamco_frame::{ColorConverter, FrameSize, I420Buffer, PixelBufferPool, PixelFormat, VideoFrame};

    #[cfg(feature = "render")]
    pub use lamco_render::{
        DisplaySink, DualStreamCompositor, FrameRenderer, MediaSample, PresentationQueue, RendererConfig, StreamRole,
        VideoRenderer,
    };

    #[cfg(feature = "overlay")]
    pub use lamco_overlay::{
        NativeBridge, OverlayConfig, PipContext, PipError, PipPlatform, PipState, SurfacePair, TrackRegistry,
        VideoTrack,
    };
}
