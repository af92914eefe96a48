//! Picture-in-picture lifecycle
//!
//! The controller drives a platform PiP window through four states:
//!
//! ```text
//! Uninitialized ──setup──► Configured ──start──► Active ──stop──► Stopped
//!                               ▲                  ▲                 │
//!                               └──────setup───────┼─────────────────┤
//!                                                  └──────start──────┘
//! ```
//!
//! Calls that do not apply to the current state are ignored. Window
//! creation and layout belong to the platform; the controller only hands
//! it the two display surfaces.

use std::fmt;
use std::sync::Arc;

use lamco_render::{DisplaySink, FrameSize, StreamRole};
use tracing::{debug, info, warn};

use crate::config::OverlayConfig;
use crate::error::{PipError, Result};

/// Opaque handle to a platform surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(u64);

impl SurfaceHandle {
    /// Wrap a platform surface id
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Platform surface id
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}

/// Display surfaces for the two streams
///
/// Owned by the UI layer; renderers only hold them weakly.
#[derive(Clone)]
pub struct SurfacePair {
    local: Arc<dyn DisplaySink>,
    remote: Arc<dyn DisplaySink>,
}

impl SurfacePair {
    /// Pair a local and a remote surface
    pub fn new(local: Arc<dyn DisplaySink>, remote: Arc<dyn DisplaySink>) -> Self {
        Self { local, remote }
    }

    /// Surface showing `role`
    pub fn surface(&self, role: StreamRole) -> &Arc<dyn DisplaySink> {
        match role {
            StreamRole::Local => &self.local,
            StreamRole::Remote => &self.remote,
        }
    }

    /// Surface showing this device's camera
    pub fn local(&self) -> &Arc<dyn DisplaySink> {
        &self.local
    }

    /// Surface showing the other participant
    pub fn remote(&self) -> &Arc<dyn DisplaySink> {
        &self.remote
    }

    /// Clear both surfaces. Call from the presentation context.
    pub fn reset(&self) {
        self.local.flush_and_remove_image();
        self.remote.flush_and_remove_image();
    }
}

impl fmt::Debug for SurfacePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfacePair")
            .field("local", &self.local.status())
            .field("remote", &self.remote.status())
            .finish()
    }
}

/// What the platform needs to build a PiP window
#[derive(Debug, Clone)]
pub struct PipContentSource {
    /// Surface the PiP window animates from
    pub source_surface: SurfaceHandle,

    /// Surfaces to show inside the window
    pub surfaces: SurfacePair,

    /// Initial content size
    pub preferred_content_size: FrameSize,

    /// Enter PiP automatically when the app is backgrounded
    pub start_automatically_from_inline: bool,
}

/// Platform PiP capability
pub trait PipPlatform: Send {
    /// Whether the device can show PiP windows at all
    fn is_supported(&self) -> bool;

    /// Root surface of the UI, if it exists yet
    fn root_surface(&self) -> Option<SurfaceHandle>;

    /// Build a window for `source`
    fn create_window(&mut self, source: PipContentSource) -> Box<dyn PipWindow>;
}

/// Platform PiP window
pub trait PipWindow: Send {
    /// Show the window
    fn start(&mut self);

    /// Hide the window
    fn stop(&mut self);
}

/// PiP controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipState {
    /// Setup has not succeeded yet
    #[default]
    Uninitialized,
    /// Window built, not showing
    Configured,
    /// Window showing
    Active,
    /// Window hidden after being shown
    Stopped,
}

impl PipState {
    /// Whether `start` applies
    #[must_use]
    pub fn can_start(self) -> bool {
        matches!(self, Self::Configured | Self::Stopped)
    }
}

impl fmt::Display for PipState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Configured => write!(f, "configured"),
            Self::Active => write!(f, "active"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// PiP lifecycle state machine
pub struct PipController {
    platform: Box<dyn PipPlatform>,
    surfaces: SurfacePair,
    preferred_content_size: FrameSize,
    start_automatically_from_inline: bool,
    window: Option<Box<dyn PipWindow>>,
    state: PipState,
}

impl PipController {
    /// Create an uninitialized controller
    pub fn new(config: &OverlayConfig, surfaces: SurfacePair, platform: Box<dyn PipPlatform>) -> Self {
        Self {
            platform,
            surfaces,
            preferred_content_size: config.preferred_content_size,
            start_automatically_from_inline: config.start_automatically_from_inline,
            window: None,
            state: PipState::Uninitialized,
        }
    }

    /// Current state
    pub fn state(&self) -> PipState {
        self.state
    }

    /// Whether the window is showing
    pub fn is_active(&self) -> bool {
        self.state == PipState::Active
    }

    /// Build the PiP window
    ///
    /// Fails without changing state when the device has no PiP support or
    /// the UI has no root surface. Ignored while active; otherwise the
    /// window is rebuilt from the current surfaces.
    pub fn setup(&mut self) -> Result<()> {
        if self.state == PipState::Active {
            debug!("PiP already active, ignoring setup");
            return Ok(());
        }

        if !self.platform.is_supported() {
            warn!("PiP not supported on this device");
            return Err(PipError::Unsupported);
        }

        let Some(source_surface) = self.platform.root_surface() else {
            warn!("No root surface available, PiP setup aborted");
            return Err(PipError::NoRootSurface);
        };

        let source = PipContentSource {
            source_surface,
            surfaces: self.surfaces.clone(),
            preferred_content_size: self.preferred_content_size,
            start_automatically_from_inline: self.start_automatically_from_inline,
        };
        self.window = Some(self.platform.create_window(source));
        self.state = PipState::Configured;

        info!(
            %source_surface,
            size = %self.preferred_content_size,
            auto_start = self.start_automatically_from_inline,
            "PiP configured"
        );
        Ok(())
    }

    /// Show the window; returns whether the state changed
    pub fn start(&mut self) -> bool {
        if !self.state.can_start() {
            debug!(state = %self.state, "Ignoring PiP start");
            return false;
        }
        let Some(window) = self.window.as_mut() else {
            return false;
        };

        window.start();
        self.state = PipState::Active;
        info!("PiP started");
        true
    }

    /// Hide the window; returns whether the state changed
    pub fn stop(&mut self) -> bool {
        if self.state != PipState::Active {
            debug!(state = %self.state, "Ignoring PiP stop");
            return false;
        }
        let Some(window) = self.window.as_mut() else {
            return false;
        };

        window.stop();
        self.state = PipState::Stopped;
        info!("PiP stopped");
        true
    }
}

impl fmt::Debug for PipController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipController")
            .field("state", &self.state)
            .field("preferred_content_size", &self.preferred_content_size)
            .field("has_window", &self.window.is_some())
            .finish()
    }
}
