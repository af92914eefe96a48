//! Dual-stream compositor
//!
//! Two renderers, one per role, each with its own lane, pool and sink. A
//! frame routed to one role never touches the other renderer.

use std::fmt;
use std::sync::{Arc, Weak};

use lamco_frame::{FrameSize, VideoFrame};
use tracing::{debug, trace};

use crate::config::RendererConfig;
use crate::error::Result;
use crate::presentation::PresentationQueue;
use crate::renderer::{FrameRenderer, RendererStats, VideoRenderer};
use crate::sink::DisplaySink;

/// Which side of the call a stream belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamRole {
    /// This device's camera
    Local,
    /// The other participant
    Remote,
}

impl StreamRole {
    /// Both roles
    pub const ALL: [Self; 2] = [Self::Local, Self::Remote];

    /// Lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

impl fmt::Display for StreamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Local and remote renderers side by side
pub struct DualStreamCompositor {
    local: FrameRenderer,
    remote: FrameRenderer,
}

impl DualStreamCompositor {
    /// Spawn both renderers with the same configuration
    pub fn new(config: &RendererConfig, presentation: &PresentationQueue) -> Result<Self> {
        let local = FrameRenderer::spawn(StreamRole::Local.as_str(), config, presentation.clone())?;
        let remote = FrameRenderer::spawn(StreamRole::Remote.as_str(), config, presentation.clone())?;
        debug!("Dual-stream compositor created");
        Ok(Self { local, remote })
    }

    /// Attach a sink to each role
    pub fn attach_sinks(&self, local: &Arc<dyn DisplaySink>, remote: &Arc<dyn DisplaySink>) {
        self.local.attach(local);
        self.remote.attach(remote);
    }

    /// Send `frame` to the renderer bound to `role`
    pub fn route(&self, role: StreamRole, frame: VideoFrame) {
        trace!(%role, size = %frame.size(), "Routing frame");
        self.renderer(role).render_frame(frame);
    }

    /// Render a frame from this device's camera
    pub fn render_local_frame(&self, frame: VideoFrame) {
        self.route(StreamRole::Local, frame);
    }

    /// Render a frame from the other participant
    pub fn render_remote_frame(&self, frame: VideoFrame) {
        self.route(StreamRole::Remote, frame);
    }

    /// Renderer bound to `role`
    pub fn renderer(&self, role: StreamRole) -> &FrameRenderer {
        match role {
            StreamRole::Local => &self.local,
            StreamRole::Remote => &self.remote,
        }
    }

    /// Counters of the renderer bound to `role`
    pub fn stats(&self, role: StreamRole) -> RendererStats {
        self.renderer(role).stats()
    }

    /// A [`VideoRenderer`] that feeds `role`, for handing to a track
    pub fn role_renderer(self: &Arc<Self>, role: StreamRole) -> RoleRenderer {
        RoleRenderer {
            compositor: Arc::downgrade(self),
            role,
        }
    }

    /// Wait for both renderers to settle
    pub async fn drain(&self) -> Result<()> {
        self.local.drain().await?;
        self.remote.drain().await
    }
}

impl fmt::Debug for DualStreamCompositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DualStreamCompositor")
            .field("local", &self.local)
            .field("remote", &self.remote)
            .finish()
    }
}

/// Renderer handle bound to one role of a compositor
///
/// Holds the compositor weakly; once it is gone every call is a no-op.
#[derive(Debug, Clone)]
pub struct RoleRenderer {
    compositor: Weak<DualStreamCompositor>,
    role: StreamRole,
}

impl RoleRenderer {
    /// Role this handle feeds
    pub fn role(&self) -> StreamRole {
        self.role
    }

    fn with_renderer(&self, f: impl FnOnce(&FrameRenderer)) {
        if let Some(compositor) = self.compositor.upgrade() {
            f(compositor.renderer(self.role));
        }
    }
}

impl VideoRenderer for RoleRenderer {
    fn attach(&self, sink: &Arc<dyn DisplaySink>) {
        self.with_renderer(|renderer| renderer.attach(sink));
    }

    fn render_frame(&self, frame: VideoFrame) {
        self.with_renderer(|renderer| renderer.render_frame(frame));
    }

    fn set_size(&self, size: FrameSize) {
        self.with_renderer(|renderer| renderer.set_size(size));
    }
}
