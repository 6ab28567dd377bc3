//! Matcher-facing data types shared by backends

use serde::Serialize;
use thiserror::Error;

/// A specialized `Result` type for matcher invocations.
pub type MatchResult<T> = Result<T, MatchError>;

/// The error type for a single matcher invocation.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Failed to read reference image {path}: {source}")]
    Reference {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to decode screenshot: {source}")]
    Screenshot {
        #[source]
        source: image::ImageError,
    },

    #[error(
        "Reference image ({reference_width}x{reference_height}) is larger than the screenshot ({screen_width}x{screen_height})"
    )]
    ReferenceLargerThanScreen {
        reference_width: u32,
        reference_height: u32,
        screen_width: u32,
        screen_height: u32,
    },
}

/// Best match reported by a matcher backend.
///
/// `x`/`y` are the anchor point in screenshot pixel space, already shifted
/// by the target offset when one was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchCandidate {
    pub x: u32,
    pub y: u32,
    /// Similarity score of the winning region (0.0 to 1.0).
    pub confidence: f32,
}

/// Vector applied to the matched anchor to tap near, rather than on,
/// the matched pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetOffset {
    pub dx: i32,
    pub dy: i32,
}

impl TargetOffset {
    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// An offset with both components negative is treated as absent.
    pub fn normalized(self) -> Option<Self> {
        if self.dx < 0 && self.dy < 0 {
            None
        } else {
            Some(self)
        }
    }
}
