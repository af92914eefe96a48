//! Call context
//!
//! Owns everything a call's video presentation needs: the presentation
//! context, the dual-stream compositor with its sinks attached, and the
//! PiP controller. It is created explicitly when the call UI comes up and
//! shut down explicitly when it goes away; nothing here is global.

use std::fmt;
use std::sync::Arc;

use lamco_render::{DualStreamCompositor, PresentationQueue};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::OverlayConfig;
use crate::controller::{PipController, PipPlatform, PipState, SurfacePair};
use crate::error::{PipError, Result};

/// Explicitly owned state for one call's video
pub struct PipContext {
    config: OverlayConfig,
    presentation: PresentationQueue,
    compositor: Arc<DualStreamCompositor>,
    surfaces: SurfacePair,
    controller: Mutex<PipController>,
    presentation_task: Mutex<Option<JoinHandle<()>>>,
}

impl PipContext {
    /// Create a context whose presentation context runs on its own task
    ///
    /// Must be called from inside a Tokio runtime.
    pub fn new(config: OverlayConfig, surfaces: SurfacePair, platform: Box<dyn PipPlatform>) -> Result<Self> {
        config.validate().map_err(|issues| PipError::invalid_config(&issues))?;
        let (presentation, task) = PresentationQueue::spawn(config.presentation_queue_size)?;
        Self::build(config, surfaces, platform, presentation, Some(task))
    }

    /// Create a context on a presentation queue driven by the caller
    ///
    /// The caller's [`PresentationDriver`](lamco_render::PresentationDriver)
    /// must keep running for deliveries, PiP commands and
    /// [`shutdown`](Self::shutdown) to make progress.
    pub fn with_presentation(
        config: OverlayConfig,
        surfaces: SurfacePair,
        platform: Box<dyn PipPlatform>,
        presentation: PresentationQueue,
    ) -> Result<Self> {
        config.validate().map_err(|issues| PipError::invalid_config(&issues))?;
        Self::build(config, surfaces, platform, presentation, None)
    }

    fn build(
        config: OverlayConfig,
        surfaces: SurfacePair,
        platform: Box<dyn PipPlatform>,
        presentation: PresentationQueue,
        presentation_task: Option<JoinHandle<()>>,
    ) -> Result<Self> {
        let compositor = Arc::new(DualStreamCompositor::new(&config.renderer, &presentation)?);
        compositor.attach_sinks(surfaces.local(), surfaces.remote());

        let reset = surfaces.clone();
        if !presentation.post(move || reset.reset()) {
            warn!("Could not schedule surface reset");
        }

        let controller = PipController::new(&config, surfaces.clone(), platform);
        info!(
            throttle_interval = config.renderer.throttle_interval,
            pip_size = %config.preferred_content_size,
            "Call context created"
        );

        Ok(Self {
            config,
            presentation,
            compositor,
            surfaces,
            controller: Mutex::new(controller),
            presentation_task: Mutex::new(presentation_task),
        })
    }

    /// Compositor feeding both surfaces
    pub fn compositor(&self) -> &Arc<DualStreamCompositor> {
        &self.compositor
    }

    /// Presentation context queue
    pub fn presentation(&self) -> &PresentationQueue {
        &self.presentation
    }

    /// Display surfaces
    pub fn surfaces(&self) -> &SurfacePair {
        &self.surfaces
    }

    /// Configuration
    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Current PiP state
    pub fn pip_state(&self) -> PipState {
        self.controller.lock().state()
    }

    /// Build the PiP window. See [`PipController::setup`].
    pub fn setup_pip(&self) -> Result<()> {
        self.controller.lock().setup()
    }

    /// Show the PiP window; returns whether the state changed
    pub fn start_pip(&self) -> bool {
        self.controller.lock().start()
    }

    /// Hide the PiP window; returns whether the state changed
    pub fn stop_pip(&self) -> bool {
        self.controller.lock().stop()
    }

    /// Stop PiP, flush pending video and stop the presentation task
    ///
    /// Renderers stop for good once the context is dropped.
    pub async fn shutdown(&self) -> Result<()> {
        info!("Shutting down call context");

        if self.stop_pip() {
            debug!("Stopped active PiP during shutdown");
        }

        let drained = self.compositor.drain().await;
        for role in lamco_render::StreamRole::ALL {
            self.compositor.renderer(role).detach();
        }

        if let Some(task) = self.presentation_task.lock().take() {
            task.abort();
        }

        drained?;
        info!("Call context shutdown complete");
        Ok(())
    }
}

impl fmt::Debug for PipContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipContext")
            .field("pip_state", &self.pip_state())
            .field("compositor", &self.compositor)
            .field("presentation", &self.presentation)
            .finish()
    }
}

impl Drop for PipContext {
    fn drop(&mut self) {
        debug!("Dropping call context");
    }
}
