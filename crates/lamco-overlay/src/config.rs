//! Call Context Configuration
//!
//! # Examples
//!
//! ```rust
//! use lamco_overlay::OverlayConfig;
//! use lamco_render::{FrameSize, RendererConfig};
//!
//! let config = OverlayConfig::builder()
//!     .renderer(RendererConfig::builder().throttle_interval(1).build())
//!     .preferred_content_size(FrameSize::new(160, 90))
//!     .start_automatically_from_inline(false)
//!     .build();
//!
//! assert!(config.validate().is_ok());
//! ```

use lamco_render::{FrameSize, RendererConfig};

/// Configuration for a [`PipContext`](crate::PipContext)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Settings for both stream renderers
    pub renderer: RendererConfig,

    /// Tasks that may wait for the presentation context (default: 32)
    pub presentation_queue_size: usize,

    /// Size the PiP window opens at (default: 120x90)
    ///
    /// The platform may scale it; only the aspect ratio is binding.
    pub preferred_content_size: FrameSize,

    /// Enter PiP on its own when the app leaves the foreground (default: true)
    pub start_automatically_from_inline: bool,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            renderer: RendererConfig::default(),
            presentation_queue_size: 32,
            preferred_content_size: FrameSize::new(120, 90),
            start_automatically_from_inline: true,
        }
    }
}

impl OverlayConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> OverlayConfigBuilder {
        OverlayConfigBuilder::default()
    }

    /// Validate configuration and return any issues
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut issues = Vec::new();

        if let Err(renderer_issues) = self.renderer.validate() {
            issues.extend(renderer_issues);
        }

        if self.presentation_queue_size == 0 {
            issues.push("presentation_queue_size must be at least 1".to_string());
        }

        if self.preferred_content_size.is_empty() {
            issues.push(format!(
                "preferred_content_size {} has a zero dimension",
                self.preferred_content_size
            ));
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// Builder for [`OverlayConfig`]
#[derive(Debug, Clone, Default)]
pub struct OverlayConfigBuilder {
    renderer: Option<RendererConfig>,
    presentation_queue_size: Option<usize>,
    preferred_content_size: Option<FrameSize>,
    start_automatically_from_inline: Option<bool>,
}

impl OverlayConfigBuilder {
    /// Set the renderer configuration
    #[must_use]
    pub fn renderer(mut self, renderer: RendererConfig) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Set the presentation queue size
    #[must_use]
    pub fn presentation_queue_size(mut self, size: usize) -> Self {
        self.presentation_queue_size = Some(size);
        self
    }

    /// Set the preferred PiP content size
    #[must_use]
    pub fn preferred_content_size(mut self, size: FrameSize) -> Self {
        self.preferred_content_size = Some(size);
        self
    }

    /// Enable or disable automatic PiP when backgrounded
    #[must_use]
    pub fn start_automatically_from_inline(mut self, enabled: bool) -> Self {
        self.start_automatically_from_inline = Some(enabled);
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> OverlayConfig {
        let defaults = OverlayConfig::default();

        OverlayConfig {
            renderer: self.renderer.unwrap_or(defaults.renderer),
            presentation_queue_size: self
                .presentation_queue_size
                .unwrap_or(defaults.presentation_queue_size),
            preferred_content_size: self
                .preferred_content_size
                .unwrap_or(defaults.preferred_content_size),
            start_automatically_from_inline: self
                .start_automatically_from_inline
                .unwrap_or(defaults.start_automatically_from_inline),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OverlayConfig::default();
        assert_eq!(config.preferred_content_size, FrameSize::new(120, 90));
        assert!(config.start_automatically_from_inline);
        assert_eq!(config.renderer.throttle_interval, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = OverlayConfig {
            presentation_queue_size: 0,
            preferred_content_size: FrameSize::new(0, 90),
            ..Default::default()
        };
        let issues = config.validate().expect_err("two issues");
        assert_eq!(issues.len(), 2);

        let config = OverlayConfig::builder()
            .renderer(RendererConfig {
                throttle_interval: 0,
                ..Default::default()
            })
            .build();
        assert!(config.validate().is_err());
    }
}
