//! Configuration for the locate/scroll retry loop

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct LocatorConfig {
    /// Similarity floor used when a request does not set its own (0.0 to 1.0).
    pub min_similarity: f32,
    /// Maximum number of wait windows; each timed-out window ends with one
    /// scroll before the next window starts.
    pub max_scroll_attempts: u32,
    /// Scale applied to raw match anchors to convert screenshot pixel
    /// coordinates into the logical point space used for gesture input.
    /// 0.5 matches the common 2x screenshot density.
    pub coordinate_scale: f32,
    /// Delay between consecutive polls within a wait window.
    pub poll_interval: Duration,
    /// Scroll gesture start, as a fraction of screen height.
    pub scroll_start_frac: f32,
    /// Scroll gesture end, as a fraction of screen height.
    pub scroll_end_frac: f32,
    /// Swipe duration handed to the driver for the scroll gesture.
    pub scroll_duration_ms: Option<u32>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            min_similarity: 0.7,
            max_scroll_attempts: 5,
            coordinate_scale: 0.5,
            poll_interval: Duration::from_millis(500),
            scroll_start_frac: 0.80,
            scroll_end_frac: 0.40,
            scroll_duration_ms: Some(0),
        }
    }
}

impl LocatorConfig {
    /// Configuration for devices whose screenshots are already in point
    /// space (no pixel-density mismatch).
    pub fn unscaled() -> Self {
        Self {
            coordinate_scale: 1.0,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = LocatorConfig::default();
        assert_eq!(config.min_similarity, 0.7);
        assert_eq!(config.max_scroll_attempts, 5);
        assert_eq!(config.coordinate_scale, 0.5);
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.scroll_start_frac, 0.80);
        assert_eq!(config.scroll_end_frac, 0.40);
    }

    #[test]
    fn unscaled_keeps_other_defaults() {
        let config = LocatorConfig::unscaled();
        assert_eq!(config.coordinate_scale, 1.0);
        assert_eq!(config.max_scroll_attempts, 5);
    }
}
