use std::path::PathBuf;

use thiserror::Error;

use crate::driver::DriverError;

/// A specialized `Result` type for locator operations.
pub type LocatorResult<T> = Result<T, LocatorError>;

/// The error type for locate/click operations.
#[derive(Debug, Error)]
pub enum LocatorError {
    /// No match above the similarity floor after every wait window and
    /// scroll. Raised by `click` only; `locate` reports this as `Ok(None)`.
    #[error("Element not visible - {}", .image.display())]
    ElementNotVisible { image: PathBuf },

    /// Tap or scroll gesture failure from the device driver.
    #[error(transparent)]
    Driver(#[from] DriverError),
}
