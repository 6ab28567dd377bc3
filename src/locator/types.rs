//! Locator data types

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;

use crate::matcher::TargetOffset;

/// A tap location in logical point space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TapPoint {
    pub x: u32,
    pub y: u32,
}

impl TapPoint {
    /// Scale a raw match anchor from screenshot pixel space into point
    /// space. Truncates, matching integer gesture input.
    pub fn from_anchor(x: u32, y: u32, scale: f32) -> Self {
        Self {
            x: (f64::from(x) * f64::from(scale)) as u32,
            y: (f64::from(y) * f64::from(scale)) as u32,
        }
    }
}

/// One image search: what to look for and how long each wait window lasts.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub image: PathBuf,
    pub timeout: Duration,
    /// Overrides the configured similarity floor when set.
    pub min_similarity: Option<f32>,
    pub target_offset: Option<TargetOffset>,
}

impl SearchRequest {
    pub fn new(image: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            image: image.into(),
            timeout,
            min_similarity: None,
            target_offset: None,
        }
    }

    pub fn min_similarity(mut self, value: f32) -> Self {
        self.min_similarity = Some(value);
        self
    }

    pub fn target_offset(mut self, offset: TargetOffset) -> Self {
        self.target_offset = Some(offset);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchor_scaling_halves_both_axes() {
        assert_eq!(
            TapPoint::from_anchor(200, 100, 0.5),
            TapPoint { x: 100, y: 50 }
        );
    }

    #[test]
    fn anchor_scaling_truncates() {
        assert_eq!(
            TapPoint::from_anchor(201, 101, 0.5),
            TapPoint { x: 100, y: 50 }
        );
    }

    #[test]
    fn anchor_scaling_identity() {
        assert_eq!(
            TapPoint::from_anchor(201, 101, 1.0),
            TapPoint { x: 201, y: 101 }
        );
    }

    #[test]
    fn request_builder_sets_optionals() {
        let request = SearchRequest::new("button.png", Duration::from_secs(10))
            .min_similarity(0.9)
            .target_offset(TargetOffset::new(5, -3));
        assert_eq!(request.image, PathBuf::from("button.png"));
        assert_eq!(request.min_similarity, Some(0.9));
        assert_eq!(request.target_offset, Some(TargetOffset::new(5, -3)));
    }
}
