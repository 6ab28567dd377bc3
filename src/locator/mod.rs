//! Image-based element location: wait for a reference image on screen,
//! scroll when it is not there yet, convert the match into a tap point.

pub mod config;
pub mod engine;
pub mod error;
pub mod types;


pub use config::LocatorConfig;
pub use engine::ImageLocator;
pub use error::{LocatorError, LocatorResult};
pub use types::{SearchRequest, TapPoint};
