//! # Camera Session
//!
//! Owns the live stream and the decoder of one scanner mount.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Lifetime                                     │
//! │                                                                         │
//! │  acquire_stream ──► CameraSession::new(stream)                          │
//! │                            │                                            │
//! │  start_decoding ──► attach_decoder(control)                             │
//! │                            │                                            │
//! │        match / close / unmount / error ──► release()                    │
//! │                            │                                            │
//! │                            ├── stream.stop_tracks()                     │
//! │                            └── decoder.stop()                           │
//! │                                                                         │
//! │  release() is idempotent; Drop calls it for any path that forgot.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, warn};

use super::{DecoderControl, MediaStream};

/// A stream and (once decoding starts) its decoder.
pub struct CameraSession {
    stream: Option<Box<dyn MediaStream>>,
    decoder: Option<Box<dyn DecoderControl>>,
}

impl CameraSession {
    pub fn new(stream: Box<dyn MediaStream>) -> Self {
        CameraSession {
            stream: Some(stream),
            decoder: None,
        }
    }

    /// Hands the decoder control to the session so it is stopped on release.
    pub fn attach_decoder(&mut self, decoder: Box<dyn DecoderControl>) {
        if let Some(mut previous) = self.decoder.replace(decoder) {
            previous.stop();
        }
    }

    /// The live stream, until released.
    pub fn stream(&self) -> Option<&dyn MediaStream> {
        self.stream.as_deref()
    }

    /// Stops the stream tracks, then the decoder. Safe to call repeatedly.
    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            debug!(stream = %stream.id(), "Stopping camera stream");
            stream.stop_tracks();
        }
        if let Some(mut decoder) = self.decoder.take() {
            debug!("Stopping barcode decoder");
            decoder.stop();
        }
    }

    pub fn is_released(&self) -> bool {
        self.stream.is_none() && self.decoder.is_none()
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        if !self.is_released() {
            warn!("Camera session dropped while live; releasing");
            self.release();
        }
    }
}

impl std::fmt::Debug for CameraSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CameraSession")
            .field("stream", &self.stream.as_ref().map(|s| s.id().to_string()))
            .field("decoding", &self.decoder.is_some())
            .finish()
    }
}
