//! Default matcher backend delegating to imageproc template matching.

use std::path::Path;

use image::GrayImage;
use imageproc::template_matching::{MatchTemplateMethod, match_template};

use super::ImageMatcher;
use super::types::{MatchCandidate, MatchError, MatchResult, TargetOffset};

/// Normalized cross-correlation matcher over grayscale images.
///
/// Reports the center of the best-scoring region, shifted by the target
/// offset when one is supplied. A score exactly equal to the similarity
/// floor is accepted.
#[derive(Debug, Default, Clone)]
pub struct TemplateMatcher;

impl TemplateMatcher {
    pub fn new() -> Self {
        Self
    }

    fn best_candidate(
        screenshot: &GrayImage,
        reference: &GrayImage,
        min_similarity: f32,
        target_offset: Option<TargetOffset>,
    ) -> Option<MatchCandidate> {
        let scores = match_template(
            screenshot,
            reference,
            MatchTemplateMethod::CrossCorrelationNormalized,
        );

        let mut best_score = f32::MIN;
        let mut best_pos = (0u32, 0u32);
        for (x, y, pixel) in scores.enumerate_pixels() {
            let score = pixel[0];
            if score > best_score {
                best_score = score;
                best_pos = (x, y);
            }
        }

        if !meets_floor(best_score, min_similarity) {
            return None;
        }

        let (x, y) = anchor_point(best_pos, reference.dimensions(), target_offset);
        Some(MatchCandidate {
            x,
            y,
            confidence: best_score.clamp(0.0, 1.0),
        })
    }
}

/// Scores below the floor are no match; equality is accepted.
fn meets_floor(score: f32, floor: f32) -> bool {
    score >= floor
}

/// Matched-region center plus offset, clamped to the image origin.
fn anchor_point(
    top_left: (u32, u32),
    reference_dims: (u32, u32),
    offset: Option<TargetOffset>,
) -> (u32, u32) {
    let cx = i64::from(top_left.0) + i64::from(reference_dims.0 / 2);
    let cy = i64::from(top_left.1) + i64::from(reference_dims.1 / 2);
    let (dx, dy) = match offset {
        Some(o) => (i64::from(o.dx), i64::from(o.dy)),
        None => (0, 0),
    };
    ((cx + dx).max(0) as u32, (cy + dy).max(0) as u32)
}

impl ImageMatcher for TemplateMatcher {
    fn find_best_match(
        &self,
        screenshot_png: &[u8],
        reference: &Path,
        min_similarity: f32,
        target_offset: Option<TargetOffset>,
    ) -> MatchResult<Option<MatchCandidate>> {
        let screenshot = image::load_from_memory(screenshot_png)
            .map_err(|source| MatchError::Screenshot { source })?
            .to_luma8();
        let reference_img = image::open(reference)
            .map_err(|source| MatchError::Reference {
                path: reference.display().to_string(),
                source,
            })?
            .to_luma8();

        if reference_img.width() > screenshot.width()
            || reference_img.height() > screenshot.height()
        {
            return Err(MatchError::ReferenceLargerThanScreen {
                reference_width: reference_img.width(),
                reference_height: reference_img.height(),
                screen_width: screenshot.width(),
                screen_height: screenshot.height(),
            });
        }

        let candidate =
            Self::best_candidate(&screenshot, &reference_img, min_similarity, target_offset);
        match &candidate {
            Some(c) => log::debug!(
                "best match for {} at ({}, {}) score {:.3}",
                reference.display(),
                c.x,
                c.y,
                c.confidence
            ),
            None => log::debug!("no match for {} above {min_similarity:.2}", reference.display()),
        }
        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    /// Deterministic pattern distinctive enough for unambiguous matching.
    fn pattern_image(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            image::Luma([((x * 31 + y * 17) % 251) as u8])
        })
    }

    fn crop(img: &GrayImage, x: u32, y: u32, w: u32, h: u32) -> GrayImage {
        image::imageops::crop_imm(img, x, y, w, h).to_image()
    }

    fn png_bytes(img: &GrayImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode png");
        bytes
    }

    #[test]
    fn finds_exact_crop_at_center_anchor() {
        let screenshot = pattern_image(64, 64);
        let reference = crop(&screenshot, 20, 30, 16, 16);

        let candidate =
            TemplateMatcher::best_candidate(&screenshot, &reference, 0.95, None).unwrap();
        // Top-left (20, 30) plus half the 16x16 reference
        assert_eq!((candidate.x, candidate.y), (28, 38));
        assert!(candidate.confidence > 0.99);
    }

    #[test]
    fn offset_shifts_anchor() {
        let screenshot = pattern_image(64, 64);
        let reference = crop(&screenshot, 20, 30, 16, 16);

        let candidate = TemplateMatcher::best_candidate(
            &screenshot,
            &reference,
            0.95,
            Some(TargetOffset::new(10, -5)),
        )
        .unwrap();
        assert_eq!((candidate.x, candidate.y), (38, 33));
    }

    #[test]
    fn anchor_is_clamped_to_origin() {
        let screenshot = pattern_image(64, 64);
        let reference = crop(&screenshot, 20, 30, 16, 16);

        let candidate = TemplateMatcher::best_candidate(
            &screenshot,
            &reference,
            0.95,
            Some(TargetOffset::new(0, -100)),
        )
        .unwrap();
        assert_eq!((candidate.x, candidate.y), (28, 0));
    }

    #[test]
    fn score_below_floor_is_rejected() {
        // Flat screenshot against a half-dark reference correlates at ~0.707,
        // so 0.9 rejects it and 0.5 accepts the same data.
        let screenshot = GrayImage::from_pixel(32, 32, image::Luma([100]));
        let reference = GrayImage::from_fn(8, 8, |x, _| {
            image::Luma([if x < 4 { 100 } else { 0 }])
        });

        assert!(TemplateMatcher::best_candidate(&screenshot, &reference, 0.9, None).is_none());
        assert!(TemplateMatcher::best_candidate(&screenshot, &reference, 0.5, None).is_some());
    }

    #[test]
    fn floor_boundary_is_inclusive() {
        assert!(meets_floor(0.7, 0.7));
        assert!(meets_floor(0.71, 0.7));
        assert!(!meets_floor(0.699, 0.7));
        assert!(meets_floor(1.0, 1.0));
        assert!(meets_floor(0.0, 0.0));
    }

    #[test]
    fn find_best_match_end_to_end() {
        let dir = tempfile::tempdir().expect("tempdir");
        let screenshot = pattern_image(64, 64);
        let reference = crop(&screenshot, 20, 30, 16, 16);
        let reference_path = dir.path().join("button.png");
        reference.save(&reference_path).expect("save reference");

        let matcher = TemplateMatcher::new();
        let candidate = matcher
            .find_best_match(&png_bytes(&screenshot), &reference_path, 0.9, None)
            .unwrap()
            .unwrap();
        assert_eq!((candidate.x, candidate.y), (28, 38));
    }

    #[test]
    fn missing_reference_is_an_error() {
        let matcher = TemplateMatcher::new();
        let screenshot = pattern_image(32, 32);
        let result = matcher.find_best_match(
            &png_bytes(&screenshot),
            Path::new("does-not-exist.png"),
            0.7,
            None,
        );
        assert!(matches!(result, Err(MatchError::Reference { .. })));
    }

    #[test]
    fn undecodable_screenshot_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let reference_path = dir.path().join("ref.png");
        pattern_image(8, 8).save(&reference_path).expect("save");

        let matcher = TemplateMatcher::new();
        let result = matcher.find_best_match(b"not a png", &reference_path, 0.7, None);
        assert!(matches!(result, Err(MatchError::Screenshot { .. })));
    }

    #[test]
    fn oversized_reference_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let reference_path = dir.path().join("big.png");
        pattern_image(128, 128).save(&reference_path).expect("save");

        let matcher = TemplateMatcher::new();
        let screenshot = pattern_image(64, 64);
        let result = matcher.find_best_match(&png_bytes(&screenshot), &reference_path, 0.7, None);
        assert!(matches!(
            result,
            Err(MatchError::ReferenceLargerThanScreen { .. })
        ));
    }
}
