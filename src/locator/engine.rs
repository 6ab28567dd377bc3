//! The wait/match/scroll control loop

use tokio::time::{Instant, sleep};

use super::config::LocatorConfig;
use super::error::{LocatorError, LocatorResult};
use super::types::{SearchRequest, TapPoint};
use crate::driver::DeviceDriver;
use crate::matcher::{ImageMatcher, TargetOffset};

/// Locates reference images on a live device screen and taps them.
///
/// One locator per driver session. The caller owns the session; the locator
/// only borrows it and never closes it. All driver and matcher calls are
/// strictly sequential, so total latency is bounded by
/// `max_scroll_attempts * timeout` plus the scroll gesture durations.
pub struct ImageLocator<'d, D, M> {
    driver: &'d D,
    matcher: M,
    config: LocatorConfig,
    last_match: Option<TapPoint>,
}

impl<'d, D: DeviceDriver, M: ImageMatcher> ImageLocator<'d, D, M> {
    pub fn new(driver: &'d D, matcher: M) -> Self {
        Self::with_config(driver, matcher, LocatorConfig::default())
    }

    pub fn with_config(driver: &'d D, matcher: M, config: LocatorConfig) -> Self {
        Self {
            driver,
            matcher,
            config,
            last_match: None,
        }
    }

    /// Most recent result computed by `locate` or `click`. Reset at the
    /// start of every search, so a failed search never reports a stale
    /// point from an earlier one.
    pub fn last_match(&self) -> Option<TapPoint> {
        self.last_match
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Wait for the reference image to appear and return its tap location.
    ///
    /// Runs up to `max_scroll_attempts` wait windows of `request.timeout`
    /// each, scrolling down after every window that times out. Returns
    /// `Ok(None)` when the image never shows up. Screenshot and matcher
    /// failures count as a non-match for the poll that hit them; scroll
    /// gesture failures propagate.
    pub async fn locate(&mut self, request: &SearchRequest) -> LocatorResult<Option<TapPoint>> {
        self.last_match = None;
        let min_similarity = request.min_similarity.unwrap_or(self.config.min_similarity);
        let offset = request.target_offset.and_then(TargetOffset::normalized);

        for attempt in 1..=self.config.max_scroll_attempts {
            if let Some(point) = self.wait_for_match(request, min_similarity, offset).await {
                self.last_match = Some(point);
                log::info!(
                    "located {} at [{},{}] on attempt {attempt}",
                    request.image.display(),
                    point.x,
                    point.y
                );
                return Ok(Some(point));
            }
            log::warn!(
                "no match for {} within {:?} (attempt {attempt}/{}), scrolling down",
                request.image.display(),
                request.timeout,
                self.config.max_scroll_attempts
            );
            self.scroll_down().await?;
        }

        Ok(None)
    }

    /// Locate the reference image, then tap it.
    ///
    /// Fails with [`LocatorError::ElementNotVisible`] when the image is not
    /// found after every retry.
    pub async fn click(&mut self, request: &SearchRequest) -> LocatorResult<TapPoint> {
        match self.locate(request).await? {
            Some(point) => {
                log::info!("tap on [{},{}]", point.x, point.y);
                self.driver.tap(point.x, point.y).await?;
                Ok(point)
            }
            None => Err(LocatorError::ElementNotVisible {
                image: request.image.clone(),
            }),
        }
    }

    /// One wait window: poll until a match is found or the timeout elapses.
    /// Always polls at least once, even with a zero timeout.
    async fn wait_for_match(
        &self,
        request: &SearchRequest,
        min_similarity: f32,
        offset: Option<TargetOffset>,
    ) -> Option<TapPoint> {
        let deadline = Instant::now() + request.timeout;
        loop {
            if let Some(point) = self.poll_once(request, min_similarity, offset).await {
                return Some(point);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            sleep(
                self.config
                    .poll_interval
                    .min(deadline.saturating_duration_since(now)),
            )
            .await;
        }
    }

    /// One poll: fresh screenshot, one matcher invocation.
    async fn poll_once(
        &self,
        request: &SearchRequest,
        min_similarity: f32,
        offset: Option<TargetOffset>,
    ) -> Option<TapPoint> {
        let screenshot = match self.driver.screen_capture_bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("screenshot capture failed: {e}");
                return None;
            }
        };

        match self
            .matcher
            .find_best_match(&screenshot, &request.image, min_similarity, offset)
        {
            Ok(Some(candidate)) => {
                let point =
                    TapPoint::from_anchor(candidate.x, candidate.y, self.config.coordinate_scale);
                log::debug!(
                    "match for {} at ({}, {}) score {:.3}, tap point ({}, {})",
                    request.image.display(),
                    candidate.x,
                    candidate.y,
                    candidate.confidence,
                    point.x,
                    point.y
                );
                Some(point)
            }
            Ok(None) => None,
            Err(e) => {
                log::error!("matcher failed for {}: {e}", request.image.display());
                None
            }
        }
    }

    /// Reveal more content: vertical swipe at horizontal center, from
    /// `scroll_start_frac` down to `scroll_end_frac` of screen height.
    async fn scroll_down(&self) -> LocatorResult<()> {
        let (width, height) = self.driver.screen_dimensions();
        let x = width / 2;
        let start_y = (f64::from(height) * f64::from(self.config.scroll_start_frac)) as u32;
        let end_y = (f64::from(height) * f64::from(self.config.scroll_end_frac)) as u32;
        self.driver
            .swipe(x, start_y, x, end_y, self.config.scroll_duration_ms)
            .await?;
        Ok(())
    }
}
