//! Renderer Configuration
//!
//! # Examples
//!
//! ```rust
//! use lamco_frame::PoolConfig;
//! use lamco_render::RendererConfig;
//!
//! // Using builder pattern
//! let config = RendererConfig::builder()
//!     .throttle_interval(3)
//!     .lane_capacity(4)
//!     .pool(PoolConfig::builder().max_buffers(4).build())
//!     .build();
//!
//! // Using struct literal with defaults
//! let config = RendererConfig {
//!     throttle_interval: 1,
//!     ..Default::default()
//! };
//! ```

use lamco_frame::PoolConfig;

/// Configuration shared by the renderers of a compositor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Render one frame out of this many (default: 2)
    ///
    /// Trades smoothness for CPU and thermal headroom. 1 renders every frame.
    pub throttle_interval: u32,

    /// Admitted frames that may wait for the render lane (default: 8)
    ///
    /// Frames arriving while the lane is this far behind are dropped; the
    /// frame source is never made to wait.
    pub lane_capacity: usize,

    /// Pixel buffer pool settings for each renderer
    pub pool: PoolConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            throttle_interval: 2,
            lane_capacity: 8,
            pool: PoolConfig::default(),
        }
    }
}

impl RendererConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> RendererConfigBuilder {
        RendererConfigBuilder::default()
    }

    /// Validate configuration and return any issues
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut issues = Vec::new();

        if self.throttle_interval == 0 {
            issues.push("throttle_interval must be at least 1".to_string());
        }

        if self.lane_capacity == 0 {
            issues.push("lane_capacity must be at least 1".to_string());
        }

        if self.lane_capacity > 256 {
            issues.push("lane_capacity should not exceed 256".to_string());
        }

        if let Err(pool_issues) = self.pool.validate() {
            issues.extend(pool_issues);
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// Builder for [`RendererConfig`]
#[derive(Debug, Clone, Default)]
pub struct RendererConfigBuilder {
    throttle_interval: Option<u32>,
    lane_capacity: Option<usize>,
    pool: Option<PoolConfig>,
}

impl RendererConfigBuilder {
    /// Set the throttle interval
    #[must_use]
    pub fn throttle_interval(mut self, interval: u32) -> Self {
        self.throttle_interval = Some(interval);
        self
    }

    /// Set the render lane capacity
    #[must_use]
    pub fn lane_capacity(mut self, capacity: usize) -> Self {
        self.lane_capacity = Some(capacity);
        self
    }

    /// Set the pixel buffer pool configuration
    #[must_use]
    pub fn pool(mut self, pool: PoolConfig) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> RendererConfig {
        let defaults = RendererConfig::default();

        RendererConfig {
            throttle_interval: self.throttle_interval.unwrap_or(defaults.throttle_interval),
            lane_capacity: self.lane_capacity.unwrap_or(defaults.lane_capacity),
            pool: self.pool.unwrap_or(defaults.pool),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RendererConfig::default();
        assert_eq!(config.throttle_interval, 2);
        assert_eq!(config.lane_capacity, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = RendererConfig::builder()
            .throttle_interval(1)
            .lane_capacity(16)
            .build();

        assert_eq!(config.throttle_interval, 1);
        assert_eq!(config.lane_capacity, 16);
        assert_eq!(config.pool, PoolConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let invalid = RendererConfig {
            throttle_interval: 0,
            ..Default::default()
        };
        assert!(invalid.validate().is_err());

        let invalid_pool = RendererConfig {
            pool: PoolConfig {
                max_buffers: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let issues = invalid_pool.validate().expect_err("pool issue reported");
        assert!(issues[0].contains("max_buffers"));
    }
}
