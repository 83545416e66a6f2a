//! # Camera Module
//!
//! Platform-neutral access to a camera and a continuous barcode decoder.
//!
//! ## Backend Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CameraBackend                                        │
//! │                                                                         │
//! │  is_supported()          capability check (no I/O)                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  enumerate_devices()     async; scanner needs ≥ 1 VideoInput            │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  acquire_stream(&c)      async; environment-facing, ideal 1280×720      │
//! │        │                 errors use the platform names → CameraError    │
//! │        ▼                                                                │
//! │  start_decoding(s, tx)   attaches the stream to the surface and pushes  │
//! │                          CameraEvents into `tx` until stopped:          │
//! │                            SurfaceReady   metadata loaded (once)        │
//! │                            Decoded(text)  one per successful decode     │
//! │                            DecodeFailed   per-frame noise               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Backends: [`terminal::TerminalCamera`] reads a keyboard-wedge scanner
//! from stdin. A web view embeds its own implementation around
//! `getUserMedia` and a ZXing-style reader.

mod error;
mod session;
pub mod terminal;

pub use error::{CameraError, CameraResult};
pub use session::CameraSession;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Which way the camera should face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Rear camera, pointed at the product.
    #[default]
    Environment,
    /// Front camera.
    User,
}

impl fmt::Display for FacingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacingMode::Environment => write!(f, "environment"),
            FacingMode::User => write!(f, "user"),
        }
    }
}

/// Stream request. Width and height are ideals, not hard requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamConstraints {
    pub facing_mode: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for StreamConstraints {
    fn default() -> Self {
        StreamConstraints {
            facing_mode: FacingMode::Environment,
            ideal_width: 1280,
            ideal_height: 720,
        }
    }
}

/// Kind of a media device reported by enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    VideoInput,
    AudioInput,
    AudioOutput,
}

/// One enumerated media device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaDevice {
    pub id: String,
    pub label: String,
    pub kind: DeviceKind,
}

impl MediaDevice {
    pub fn video(id: impl Into<String>, label: impl Into<String>) -> Self {
        MediaDevice {
            id: id.into(),
            label: label.into(),
            kind: DeviceKind::VideoInput,
        }
    }

    pub fn is_video_input(&self) -> bool {
        self.kind == DeviceKind::VideoInput
    }
}

/// What the decoder reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraEvent {
    /// The video surface has its metadata; frames are flowing.
    SurfaceReady,
    /// A barcode was read.
    Decoded(String),
    /// A frame held no readable code.
    DecodeFailed(String),
}

/// A live camera stream.
pub trait MediaStream: Send {
    fn id(&self) -> &str;

    /// Stops every track of the stream. Called at most once by
    /// [`CameraSession`].
    fn stop_tracks(&mut self);
}

/// Stops a running decoder.
pub trait DecoderControl: Send {
    fn stop(&mut self);
}

/// The camera and decoder subsystem.
#[async_trait]
pub trait CameraBackend: Send + Sync {
    /// Whether a camera API exists at all.
    fn is_supported(&self) -> bool;

    async fn enumerate_devices(&self) -> CameraResult<Vec<MediaDevice>>;

    async fn acquire_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> CameraResult<Box<dyn MediaStream>>;

    /// Attaches `stream` to the video surface and starts continuous decoding.
    fn start_decoding(
        &self,
        stream: &dyn MediaStream,
        events: mpsc::Sender<CameraEvent>,
    ) -> CameraResult<Box<dyn DecoderControl>>;
}
