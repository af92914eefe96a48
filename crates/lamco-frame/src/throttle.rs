//! Frame rate throttling
//!
//! Admits every Nth frame and rejects the rest. Rejected frames are simply
//! not processed; nothing is buffered, so a fast source can never build up
//! latency behind the throttle.

/// Drop-based frame throttle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameThrottler {
    interval: u64,
}

impl FrameThrottler {
    /// Default interval: every second frame is rendered
    pub const DEFAULT_INTERVAL: u32 = 2;

    /// Create a throttle admitting one frame in `interval`
    ///
    /// An interval of 0 is treated as 1 (admit everything).
    #[must_use]
    pub fn new(interval: u32) -> Self {
        Self {
            interval: u64::from(interval.max(1)),
        }
    }

    /// Whether the frame with this 1-based running index should be processed
    #[must_use]
    pub fn admit(&self, frame_index: u64) -> bool {
        frame_index % self.interval == 0
    }

    /// Configured interval
    #[must_use]
    pub fn interval(&self) -> u64 {
        self.interval
    }
}

impl Default for FrameThrottler {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_admits_even_indices() {
        let throttler = FrameThrottler::default();
        let admitted: Vec<u64> = (1..=10).filter(|&i| throttler.admit(i)).collect();
        assert_eq!(admitted, vec![2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_interval_three() {
        let throttler = FrameThrottler::new(3);
        let admitted: Vec<u64> = (1..=9).filter(|&i| throttler.admit(i)).collect();
        assert_eq!(admitted, vec![3, 6, 9]);
    }

    #[test]
    fn test_zero_interval_admits_everything() {
        let throttler = FrameThrottler::new(0);
        assert_eq!(throttler.interval(), 1);
        assert!((1..=5).all(|i| throttler.admit(i)));
    }
}
