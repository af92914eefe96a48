//! Pixel buffer pool configuration
//!
//! # Examples
//!
//! ```rust
//! use lamco_frame::PoolConfig;
//!
//! let config = PoolConfig::builder()
//!     .max_buffers(4)
//!     .row_alignment(32)
//!     .build();
//!
//! assert!(config.validate().is_ok());
//! ```

/// Configuration for [`PixelBufferPool`](crate::pool::PixelBufferPool)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// Maximum buffers outstanding at once (default: 6)
    ///
    /// Each admitted frame holds one buffer from conversion until the
    /// display sink releases the sample. Allocation past this bound fails
    /// immediately rather than waiting.
    pub max_buffers: usize,

    /// Row alignment in bytes for every plane (default: 64)
    ///
    /// Matches the alignment display hardware usually expects, which also
    /// means destination strides rarely equal source strides.
    pub row_alignment: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_buffers: 6,
            row_alignment: 64,
        }
    }
}

impl PoolConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> PoolConfigBuilder {
        PoolConfigBuilder::default()
    }

    /// Validate configuration and return any issues
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut issues = Vec::new();

        if self.max_buffers == 0 {
            issues.push("max_buffers must be at least 1".to_string());
        }

        if self.max_buffers > 64 {
            issues.push("max_buffers should not exceed 64".to_string());
        }

        if self.row_alignment > 1 && !self.row_alignment.is_power_of_two() {
            issues.push("row_alignment must be a power of two".to_string());
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(issues)
        }
    }
}

/// Builder for [`PoolConfig`]
#[derive(Debug, Clone, Default)]
pub struct PoolConfigBuilder {
    max_buffers: Option<usize>,
    row_alignment: Option<usize>,
}

impl PoolConfigBuilder {
    /// Set maximum outstanding buffers
    #[must_use]
    pub fn max_buffers(mut self, count: usize) -> Self {
        self.max_buffers = Some(count);
        self
    }

    /// Set plane row alignment
    #[must_use]
    pub fn row_alignment(mut self, bytes: usize) -> Self {
        self.row_alignment = Some(bytes);
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> PoolConfig {
        let defaults = PoolConfig::default();

        PoolConfig {
            max_buffers: self.max_buffers.unwrap_or(defaults.max_buffers),
            row_alignment: self.row_alignment.unwrap_or(defaults.row_alignment),
        }
    }
}
