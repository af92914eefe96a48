//! Native bridge
//!
//! Entry points the host application calls by name. They return nothing
//! and never fail from the caller's point of view: problems are logged and
//! the call becomes a no-op. PiP commands are posted onto the presentation
//! context, where the platform window lives.

use std::fmt;
use std::sync::{Arc, Weak};

use lamco_render::{DualStreamCompositor, StreamRole, VideoFrame, VideoRenderer};
use tracing::{debug, info, warn};

use crate::context::PipContext;
use crate::error::{PipError, Result};

/// A live video track that frames can be observed on
pub trait VideoTrack: Send + Sync {
    /// Track identifier
    fn track_id(&self) -> &str;

    /// Register `renderer` to receive this track's frames
    fn add_renderer(&self, renderer: Arc<dyn VideoRenderer>);
}

/// Lookup of the call's remote tracks
pub trait TrackRegistry: Send + Sync {
    /// Remote track with `track_id`, if the call has one
    fn remote_track(&self, track_id: &str) -> Option<Arc<dyn VideoTrack>>;
}

/// Command-style entry points for the host application
pub struct NativeBridge {
    context: Arc<PipContext>,
    registry: Arc<dyn TrackRegistry>,
}

impl NativeBridge {
    /// Create a bridge over `context`, resolving tracks through `registry`
    pub fn new(context: Arc<PipContext>, registry: Arc<dyn TrackRegistry>) -> Self {
        Self { context, registry }
    }

    /// Feed the remote track `track_id` into the remote renderer
    ///
    /// An unknown track is logged and ignored.
    pub fn attach_renderer(&self, track_id: &str) {
        if let Err(e) = self.try_attach_renderer(track_id) {
            warn!(track_id, "Not attaching renderer: {}", e);
        }
    }

    /// Like [`attach_renderer`](Self::attach_renderer), reporting failure
    pub fn try_attach_renderer(&self, track_id: &str) -> Result<()> {
        let track = self
            .registry
            .remote_track(track_id)
            .ok_or_else(|| PipError::track_not_found(track_id))?;

        let renderer = self.context.compositor().role_renderer(StreamRole::Remote);
        track.add_renderer(Arc::new(renderer));
        info!(track_id = track.track_id(), "Remote renderer attached to track");
        Ok(())
    }

    /// Build the PiP window on the presentation context
    pub fn setup_pip(&self) {
        self.post_pip_command("setup", |context| {
            if let Err(e) = context.setup_pip() {
                warn!("PiP setup failed: {}", e);
            }
        });
    }

    /// Show the PiP window on the presentation context
    pub fn start_pip(&self) {
        self.post_pip_command("start", |context| {
            context.start_pip();
        });
    }

    /// Hide the PiP window on the presentation context
    pub fn stop_pip(&self) {
        self.post_pip_command("stop", |context| {
            context.stop_pip();
        });
    }

    fn post_pip_command<F>(&self, name: &'static str, command: F)
    where
        F: FnOnce(&PipContext) + Send + 'static,
    {
        let context = Arc::downgrade(&self.context);
        let posted = self.context.presentation().post(move || match context.upgrade() {
            Some(context) => command(&context),
            None => debug!(command = name, "Call context gone, dropping PiP command"),
        });
        if !posted {
            warn!(command = name, "Could not post PiP command");
        }
    }

    /// Capture hook that mirrors local camera frames into the compositor
    pub fn local_capture_processor(&self) -> LocalCaptureProcessor {
        LocalCaptureProcessor::new(self.context.compositor())
    }

    /// Underlying call context
    pub fn context(&self) -> &Arc<PipContext> {
        &self.context
    }
}

impl fmt::Debug for NativeBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBridge")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Capture hook sitting between the camera and the encoder
///
/// Every captured frame is routed to the local renderer and passed on
/// unchanged.
#[derive(Debug, Clone)]
pub struct LocalCaptureProcessor {
    compositor: Weak<DualStreamCompositor>,
}

impl LocalCaptureProcessor {
    /// Create a processor feeding `compositor`'s local renderer
    pub fn new(compositor: &Arc<DualStreamCompositor>) -> Self {
        Self {
            compositor: Arc::downgrade(compositor),
        }
    }

    /// Route a copy of `frame` to the local renderer and return it
    pub fn process(&self, frame: VideoFrame) -> VideoFrame {
        if let Some(compositor) = self.compositor.upgrade() {
            compositor.render_local_frame(frame.clone());
        }
        frame
    }
}
