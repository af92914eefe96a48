//! # lamco-overlay
//!
//! Picture-in-picture for dual-stream call video: the PiP lifecycle state
//! machine, an explicitly owned call context, and the command-style bridge
//! the host application talks to.
//!
//! This crate is part of the [lamco-pip](https://github.com/lamco-admin/lamco-pip)
//! workspace and sits on top of
//! [`lamco-render`](https://crates.io/crates/lamco-render).
//!
//! # Features
//!
//! - **PiP lifecycle**: Setup, start and stop with no-op semantics for calls out of order
//! - **Call context**: Presentation context, compositor and controller owned in one place
//! - **Native bridge**: `attach_renderer`, `setup_pip`, `start_pip`, `stop_pip`
//! - **Capture hook**: Mirrors local camera frames to the local renderer
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lamco_overlay::{NativeBridge, OverlayConfig, PipContext, PipPlatform, SurfacePair, TrackRegistry};
//!
//! # async fn example(
//! #     surfaces: SurfacePair,
//! #     platform: Box<dyn PipPlatform>,
//! #     registry: Arc<dyn TrackRegistry>,
//! # ) -> lamco_overlay::Result<()> {
//! let context = Arc::new(PipContext::new(OverlayConfig::default(), surfaces, platform)?);
//! let bridge = NativeBridge::new(Arc::clone(&context), registry);
//!
//! bridge.attach_renderer("remote-video-track");
//! bridge.setup_pip();
//! bridge.start_pip();
//!
//! // ... call runs ...
//!
//! context.shutdown().await?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod bridge;
pub mod config;
pub mod context;
pub mod controller;
pub mod error;

// =============================================================================
// RE-EXPORTS - PRIMARY API
// =============================================================================

pub use bridge::{LocalCaptureProcessor, NativeBridge, TrackRegistry, VideoTrack};
pub use config::{OverlayConfig, OverlayConfigBuilder};
pub use context::PipContext;
pub use controller::{
    PipContentSource, PipController, PipPlatform, PipState, PipWindow, SurfaceHandle, SurfacePair,
};
pub use error::{PipError, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
