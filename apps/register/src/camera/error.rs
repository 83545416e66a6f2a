//! # Camera Errors
//!
//! Why the scanner could not start.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Camera Failure Sources                               │
//! │                                                                         │
//! │  Pre-checks                  Stream acquisition (platform error name)   │
//! │  ──────────                  ─────────────────────────────────────────  │
//! │  Unsupported  (no API)       NotAllowedError      ──► PermissionDenied  │
//! │  NoDevice     (0 inputs)     NotFoundError        ──► DeviceNotFound    │
//! │                              NotReadableError     ──► DeviceBusy        │
//! │                              OverconstrainedError ──► Overconstrained   │
//! │                              anything else        ──► Other { .. }      │
//! │                                                                         │
//! │  Every variant is terminal for the current mount. The scanner shows     │
//! │  the localized message and a retry button; nothing retries on its own.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

/// Result type alias for camera operations.
pub type CameraResult<T> = Result<T, CameraError>;

/// Camera start-up failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CameraError {
    /// The platform exposes no camera API at all.
    #[error("Camera API is not available")]
    Unsupported,

    /// Device enumeration found no video inputs.
    #[error("No video input device is available")]
    NoDevice,

    /// The user or policy refused camera access.
    #[error("Camera permission denied")]
    PermissionDenied,

    /// The requested device disappeared between enumeration and acquisition.
    #[error("Camera device not found")]
    DeviceNotFound,

    /// Another application holds the camera.
    #[error("Camera is in use by another application")]
    DeviceBusy,

    /// No device can satisfy the requested constraints.
    #[error("Camera cannot satisfy the requested constraints")]
    Overconstrained,

    /// Anything else, with whatever the platform reported.
    #[error("Camera start failed: {message}")]
    Other {
        name: Option<String>,
        message: String,
    },
}

impl CameraError {
    /// Generic failure carrying the platform's error name and message.
    pub fn other(name: Option<&str>, message: impl Into<String>) -> Self {
        CameraError::Other {
            name: name.map(str::to_string),
            message: message.into(),
        }
    }

    /// Maps a platform error by its name (`NotAllowedError`, ...).
    ///
    /// ## Example
    /// ```rust
    /// use register_app::camera::CameraError;
    ///
    /// assert_eq!(
    ///     CameraError::from_platform("NotReadableError", "Could not start video source"),
    ///     CameraError::DeviceBusy
    /// );
    /// ```
    pub fn from_platform(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" => CameraError::PermissionDenied,
            "NotFoundError" => CameraError::DeviceNotFound,
            "NotReadableError" => CameraError::DeviceBusy,
            "OverconstrainedError" => CameraError::Overconstrained,
            other => CameraError::other(Some(other).filter(|n| !n.is_empty()), message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_names() {
        assert_eq!(
            CameraError::from_platform("NotAllowedError", "Permission denied"),
            CameraError::PermissionDenied
        );
        assert_eq!(
            CameraError::from_platform("NotFoundError", ""),
            CameraError::DeviceNotFound
        );
        assert_eq!(
            CameraError::from_platform("OverconstrainedError", "width"),
            CameraError::Overconstrained
        );
    }

    #[test]
    fn test_unknown_name_keeps_message() {
        assert_eq!(
            CameraError::from_platform("AbortError", "Timeout starting video source"),
            CameraError::Other {
                name: Some("AbortError".into()),
                message: "Timeout starting video source".into(),
            }
        );
        assert_eq!(
            CameraError::from_platform("", "boom"),
            CameraError::other(None, "boom")
        );
    }
}
