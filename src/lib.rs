pub mod driver;
pub mod locator;
pub mod matcher;

pub use driver::{AdbShell, Device, DeviceDriver, DriverError, DriverResult, ImageCapture};
pub use locator::{
    ImageLocator, LocatorConfig, LocatorError, LocatorResult, SearchRequest, TapPoint,
};
pub use matcher::{ImageMatcher, MatchCandidate, MatchError, TargetOffset, TemplateMatcher};
