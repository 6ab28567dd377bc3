use thiserror::Error;

/// A specialized `Result` type for device driver operations.
pub type DriverResult<T> = Result<T, DriverError>;

/// The error type for all ADB-backed device operations.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("'adb' not available: {reason}")]
    AdbUnavailable { reason: String },

    #[error("Failed to spawn '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{command}' failed: {detail}")]
    CommandFailed { command: String, detail: String },

    #[error("No devices attached")]
    NoDevices,

    #[error("Device '{name}' not found")]
    DeviceNotFound { name: String },

    #[error("Device with transport_id '{transport_id}' not found")]
    TransportNotFound { transport_id: String },

    #[error("Device transport id missing or invalid")]
    InvalidTransportId,

    #[error("Could not parse screen size from 'wm size' output")]
    ScreenSizeParseFailed,

    #[error("Coordinates out of bounds: x={x}, y={y}")]
    OutOfBounds { x: u32, y: u32 },
}
