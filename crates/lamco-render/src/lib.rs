//! # lamco-render
//!
//! Frame rendering for live calls: throttled, lane-per-stream conversion
//! and delivery of video frames onto display sinks, plus a compositor that
//! keeps a local and a remote stream apart.
//!
//! This crate is part of the [lamco-pip](https://github.com/lamco-admin/lamco-pip)
//! workspace. Frame types and conversion come from
//! [`lamco-frame`](https://crates.io/crates/lamco-frame).
//!
//! # Features
//!
//! - **Non-blocking ingest**: `render_frame` never waits on the frame source's thread
//! - **Serial lanes**: One task per renderer owns its pool and converter
//! - **Single presentation context**: Sinks are only driven from one place
//! - **Sink recovery**: Failed sinks are flushed before the next sample
//! - **Teardown safety**: Work queued for a dropped renderer does nothing
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lamco_render::{DisplaySink, DualStreamCompositor, PresentationQueue, RendererConfig, StreamRole};
//!
//! # async fn example(local: Arc<dyn DisplaySink>, remote: Arc<dyn DisplaySink>) -> lamco_render::Result<()> {
//! let (presentation, _task) = PresentationQueue::spawn(32)?;
//! let compositor = DualStreamCompositor::new(&RendererConfig::default(), &presentation)?;
//! compositor.attach_sinks(&local, &remote);
//!
//! // From the frame source's thread:
//! // compositor.route(StreamRole::Remote, frame);
//!
//! compositor.drain().await?;
//! println!("{:?}", compositor.stats(StreamRole::Remote));
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! ```text
//!  frame source thread           render lane (task)           presentation context
//! ┌────────────────────┐       ┌──────────────────────┐      ┌─────────────────────┐
//! │ render_frame       │ try   │ PixelBufferPool      │ post │ sink.status()       │
//! │  count + throttle  ├──────►│ ColorConverter       ├─────►│ flush if failed     │
//! └────────────────────┘ send  │ MediaSample + PTS    │      │ sink.enqueue()      │
//!                              └──────────────────────┘      └─────────────────────┘
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod compositor;
pub mod config;
pub mod error;
pub mod presentation;
pub mod renderer;
pub mod sample;
pub mod sink;

// =============================================================================
// RE-EXPORTS - PRIMARY API
// =============================================================================

pub use compositor::{DualStreamCompositor, RoleRenderer, StreamRole};
pub use config::{RendererConfig, RendererConfigBuilder};
pub use error::{RenderError, Result};
pub use presentation::{PresentationDriver, PresentationQueue, UiTask};
pub use renderer::{FrameRenderer, RendererStats, VideoRenderer};
pub use sample::{FormatDescription, MediaSample, MediaTime, SampleTiming, NANOS_PER_SECOND};
pub use sink::{DisplaySink, SinkStatus};

// Frame types used throughout the public API
pub use lamco_frame::{FrameSize, PixelFormat, VideoFrame};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
