//! # Terminal Scanner Backend
//!
//! A USB barcode scanner in keyboard-wedge mode types the code followed by
//! Enter. This backend treats each input line as one decode event, so the
//! scanner screen runs unchanged in a terminal.
//!
//! Input is read on a dedicated OS thread. A read blocked on stdin cannot
//! be cancelled, so stopping the decoder only detaches that thread: it
//! exits on its next line or at EOF, and it never holds up runtime
//! shutdown the way a blocking-pool read would.

use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use super::{
    CameraBackend, CameraError, CameraEvent, CameraResult, DecoderControl, MediaDevice,
    MediaStream, StreamConstraints,
};

type InputSource = Arc<dyn Fn() -> Box<dyn BufRead + Send> + Send + Sync>;

/// Line-oriented scanner input.
#[derive(Clone)]
pub struct TerminalCamera {
    open_input: InputSource,
}

impl TerminalCamera {
    /// Reads codes from stdin.
    pub fn stdin() -> Self {
        Self::from_source(|| Box::new(io::BufReader::new(io::stdin())))
    }

    /// Reads codes from whatever `open_input` returns; called once per
    /// decode session.
    pub fn from_source<F>(open_input: F) -> Self
    where
        F: Fn() -> Box<dyn BufRead + Send> + Send + Sync + 'static,
    {
        TerminalCamera {
            open_input: Arc::new(open_input),
        }
    }
}

impl std::fmt::Debug for TerminalCamera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalCamera").finish_non_exhaustive()
    }
}

struct TerminalStream {
    id: String,
}

impl MediaStream for TerminalStream {
    fn id(&self) -> &str {
        &self.id
    }

    fn stop_tracks(&mut self) {
        debug!(stream = %self.id, "Terminal input stream stopped");
    }
}

struct LineDecoder {
    stopped: Arc<AtomicBool>,
}

impl DecoderControl for LineDecoder {
    fn stop(&mut self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

/// Body of the input thread. Runs until the input ends, the receiver goes
/// away or `stopped` is set.
fn read_lines(
    input: Box<dyn BufRead + Send>,
    events: mpsc::Sender<CameraEvent>,
    stopped: &AtomicBool,
) {
    if events.blocking_send(CameraEvent::SurfaceReady).is_err() {
        return;
    }

    for line in input.lines() {
        if stopped.load(Ordering::SeqCst) {
            trace!("Decoder stopped; dropping input line");
            return;
        }
        match line {
            Ok(line) => {
                let text = line.trim();
                if text.is_empty() {
                    continue;
                }
                if events
                    .blocking_send(CameraEvent::Decoded(text.to_string()))
                    .is_err()
                {
                    return;
                }
            }
            Err(e) => {
                warn!(error = %e, "Scanner input failed");
                return;
            }
        }
    }
    debug!("Scanner input closed");
}

#[async_trait]
impl CameraBackend for TerminalCamera {
    fn is_supported(&self) -> bool {
        true
    }

    async fn enumerate_devices(&self) -> CameraResult<Vec<MediaDevice>> {
        Ok(vec![MediaDevice::video("terminal", "Keyboard wedge scanner")])
    }

    async fn acquire_stream(
        &self,
        constraints: &StreamConstraints,
    ) -> CameraResult<Box<dyn MediaStream>> {
        // Constraints only matter to real cameras
        trace!(facing = %constraints.facing_mode, "Ignoring stream constraints");
        Ok(Box::new(TerminalStream {
            id: format!("terminal-{}", Uuid::new_v4()),
        }))
    }

    fn start_decoding(
        &self,
        stream: &dyn MediaStream,
        events: mpsc::Sender<CameraEvent>,
    ) -> CameraResult<Box<dyn DecoderControl>> {
        let input = (self.open_input)();
        let stopped = Arc::new(AtomicBool::new(false));
        debug!(stream = %stream.id(), "Reading scanner input");

        let flag = stopped.clone();
        thread::Builder::new()
            .name("scanner-input".into())
            .spawn(move || read_lines(input, events, &flag))
            .map_err(|e| CameraError::other(None, e.to_string()))?;

        Ok(Box::new(LineDecoder { stopped }))
    }
}
