//! Image matcher abstraction and the default template-matching backend.
//!
//! The locator never matches pixels itself; it hands each screenshot to an
//! `ImageMatcher`. Alternative backends (feature-based matchers, remote
//! services) plug in behind the same trait.

pub mod template;
pub mod types;

use std::path::Path;

pub use template::TemplateMatcher;
pub use types::{MatchCandidate, MatchError, MatchResult, TargetOffset};

/// Pluggable similarity-search backend.
pub trait ImageMatcher {
    /// Find the best match for the reference image within a screenshot.
    ///
    /// Returns `Ok(None)` when nothing scores at or above `min_similarity`.
    /// The anchor in a returned candidate already includes `target_offset`.
    fn find_best_match(
        &self,
        screenshot_png: &[u8],
        reference: &Path,
        min_similarity: f32,
        target_offset: Option<TargetOffset>,
    ) -> MatchResult<Option<MatchCandidate>>;
}
