// Core device driver types and traits
use serde::Serialize;

use super::error::DriverResult;

/// A screen capture with timing information.
#[derive(Debug, Clone, Serialize)]
pub struct ImageCapture {
    pub bytes: Vec<u8>,
    pub duration_ms: u128,
}

/// Trait defining the device capabilities the locator depends on.
///
/// One driver instance represents one device session. Sessions are not
/// safely shareable between concurrent callers.
#[allow(async_fn_in_trait)]
pub trait DeviceDriver: Send + Sync {
    /// Raw PNG bytes of the current screen.
    async fn screen_capture_bytes(&self) -> DriverResult<Vec<u8>>;

    /// High-level capture with timing.
    async fn screen_capture(&self) -> DriverResult<ImageCapture> {
        let start = std::time::Instant::now();
        let bytes = self.screen_capture_bytes().await?;
        let duration_ms = start.elapsed().as_millis();
        Ok(ImageCapture { bytes, duration_ms })
    }

    async fn tap(&self, x: u32, y: u32) -> DriverResult<()>;
    async fn swipe(
        &self,
        x1: u32,
        y1: u32,
        x2: u32,
        y2: u32,
        duration_ms: Option<u32>,
    ) -> DriverResult<()>;
    fn screen_dimensions(&self) -> (u32, u32);
    fn device_name(&self) -> &str;
}

#[derive(Debug, PartialEq, Serialize, Clone)]
pub struct Device {
    pub name: String,
    pub transport_id: Option<String>,
}
