//! # Scanner Screen
//!
//! Runs the camera, filters decoded barcodes down to JAN codes and hands the
//! first match to the product screen.
//!
//! ## Mount Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Scanner Task (one per mount)                         │
//! │                                                                         │
//! │  generation N                                                           │
//! │  ────────────                                                           │
//! │  Loading ──► is_supported? ──no──► Failed(Unsupported) ─┐               │
//! │                 │                                       │               │
//! │          enumerate_devices ──0 video──► Failed(NoDevice)┤               │
//! │                 │                                       │               │
//! │          acquire_stream ──err──► Failed(mapped error) ──┤               │
//! │                 │                                       │               │
//! │          start_decoding                                 │  retry()      │
//! │                 │                                       └──► gen N+1    │
//! │  SurfaceReady ──► Scanning                                              │
//! │                 │                                                       │
//! │  Decoded(text) ─┼─ latch closed / not JAN ──► ignore                    │
//! │                 └─ JAN ──► latch, release, /product?code= ──► Accepted  │
//! │                                                                         │
//! │  close()   ──► release, navigate("/")    ──► Closed      (any phase)    │
//! │  unmount() ──► release                   ──► Unmounted   (any phase)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Resource Release
//! The camera session is released on every path out of a generation.
//! Acquisition runs in its own task so close and unmount are handled while
//! a permission prompt is still open. Both clear the shared `mounted` flag,
//! so a stream that finishes acquiring afterwards is stopped straight away
//! instead of being attached.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use register_core::JanCode;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn, Instrument};
use uuid::Uuid;

use crate::camera::{CameraBackend, CameraError, CameraEvent, CameraSession, StreamConstraints};
use crate::messages::{text, Locale, Message};
use crate::router::{Navigator, Route};
use crate::state::ScannerSettings;

/// What the scanner is showing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "detail", rename_all = "camelCase")]
pub enum ScanPhase {
    /// Acquiring the camera; the surface has no frames yet.
    Loading,
    /// Frames are flowing and the decoder is running.
    Scanning,
    /// Start-up failed; retry or close.
    Failed(CameraError),
    /// A JAN code was accepted and handed to the product screen.
    Accepted(JanCode),
    /// The cashier closed the scanner.
    Closed,
    /// The screen went away.
    Unmounted,
}

impl ScanPhase {
    /// True once the task has nothing left to do.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            ScanPhase::Accepted(_) | ScanPhase::Closed | ScanPhase::Unmounted
        )
    }
}

/// Render snapshot of the scanner screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanView {
    pub title: String,
    /// Loading text or scanning prompt; `None` when an error is shown.
    pub status: Option<String>,
    pub error: Option<String>,
    pub show_retry: bool,
    pub close_label: String,
    pub retry_label: String,
}

impl ScanView {
    pub fn render(phase: &ScanPhase, locale: Locale) -> Self {
        let (status, error) = match phase {
            ScanPhase::Loading => (Some(text(locale, Message::CameraStarting)), None),
            ScanPhase::Failed(err) => (None, Some(text(locale, Message::Camera(err)))),
            _ => (Some(text(locale, Message::ScanPrompt)), None),
        };

        ScanView {
            title: text(locale, Message::ScannerTitle),
            status,
            show_retry: error.is_some(),
            error,
            close_label: text(locale, Message::CloseButton),
            retry_label: text(locale, Message::RetryButton),
        }
    }
}

/// One-shot guard: at most one accepted code per mount generation.
#[derive(Debug, Default)]
pub struct ScanLatch {
    closed: bool,
}

impl ScanLatch {
    /// Returns the code if `decoded` is a JAN code and nothing was accepted
    /// yet. The predicate runs before the latch closes, so rejected payloads
    /// leave it open.
    pub fn offer(&mut self, decoded: &str) -> Option<JanCode> {
        if self.closed {
            return None;
        }
        let code = JanCode::parse(decoded).ok()?;
        self.closed = true;
        Some(code)
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanCommand {
    Close,
    Retry,
    Unmount,
}

/// Scanner screen configuration plus its collaborators.
pub struct ScanScreen {
    camera: Arc<dyn CameraBackend>,
    navigator: Arc<dyn Navigator>,
    constraints: StreamConstraints,
    event_buffer: usize,
    locale: Locale,
}

impl ScanScreen {
    pub fn new(camera: Arc<dyn CameraBackend>, navigator: Arc<dyn Navigator>) -> Self {
        Self::with_settings(camera, navigator, &ScannerSettings::default())
    }

    pub fn with_settings(
        camera: Arc<dyn CameraBackend>,
        navigator: Arc<dyn Navigator>,
        settings: &ScannerSettings,
    ) -> Self {
        ScanScreen {
            camera,
            navigator,
            constraints: settings.constraints(),
            event_buffer: settings.event_buffer.max(1),
            locale: Locale::default(),
        }
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Mounts the screen: spawns the scanner task and starts generation 1.
    pub fn mount(self) -> MountedScanner {
        let (command_tx, command_rx) = mpsc::channel(8);
        let (phase_tx, phase_rx) = watch::channel(ScanPhase::Loading);
        let mounted = Arc::new(AtomicBool::new(true));
        let mount_id = Uuid::new_v4();

        let handle = ScanHandle {
            commands: command_tx,
            phase: phase_rx,
            mounted: mounted.clone(),
            locale: self.locale,
        };

        let task = ScannerTask {
            screen: self,
            commands: command_rx,
            phase: phase_tx,
            mounted,
        };
        let join = tokio::spawn(
            task.run()
                .instrument(tracing::info_span!("scanner", mount = %mount_id)),
        );

        MountedScanner {
            handle,
            task: Some(join),
        }
    }
}

/// Cloneable control surface for a mounted scanner.
#[derive(Debug, Clone)]
pub struct ScanHandle {
    commands: mpsc::Sender<ScanCommand>,
    phase: watch::Receiver<ScanPhase>,
    mounted: Arc<AtomicBool>,
    locale: Locale,
}

impl ScanHandle {
    pub fn phase(&self) -> ScanPhase {
        self.phase.borrow().clone()
    }

    pub fn view(&self) -> ScanView {
        ScanView::render(&self.phase.borrow(), self.locale)
    }

    /// Waits until the phase satisfies `predicate` and returns it. If the
    /// task ends first, returns its last phase.
    pub async fn wait_for<F>(&self, mut predicate: F) -> ScanPhase
    where
        F: FnMut(&ScanPhase) -> bool,
    {
        let mut rx = self.phase.clone();
        let result = rx.wait_for(|phase| predicate(phase)).await.map(|p| (*p).clone());
        match result {
            Ok(phase) => phase,
            Err(_) => rx.borrow().clone(),
        }
    }

    /// Close button: stop the camera and go home.
    pub async fn close(&self) {
        self.send(ScanCommand::Close).await;
    }

    /// Retry button: start a fresh generation.
    pub async fn retry(&self) {
        self.send(ScanCommand::Retry).await;
    }

    /// Marks the screen unmounted right now and asks the task to stop.
    pub fn begin_unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        if let Err(e) = self.commands.try_send(ScanCommand::Unmount) {
            // Full or closed: the flag alone stops a pending acquisition
            trace!(error = %e, "Unmount command not queued");
        }
    }

    async fn send(&self, command: ScanCommand) {
        if self.commands.send(command).await.is_err() {
            debug!(?command, "Scanner already finished");
        }
    }
}

/// A mounted scanner: its handle plus the task that owns the camera.
#[derive(Debug)]
pub struct MountedScanner {
    handle: ScanHandle,
    task: Option<JoinHandle<()>>,
}

impl MountedScanner {
    pub fn handle(&self) -> &ScanHandle {
        &self.handle
    }

    /// Unmounts and waits for the task to release the camera.
    pub async fn unmount(mut self) {
        self.handle.begin_unmount();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!(error = %e, "Scanner task failed");
            }
        }
    }
}

impl Drop for MountedScanner {
    fn drop(&mut self) {
        if self.task.is_some() {
            self.handle.begin_unmount();
        }
    }
}

/// How a generation ended.
enum GenerationExit {
    Retry,
    Finished,
}

enum AcquireError {
    Camera(CameraError),
    Unmounted,
}

impl From<CameraError> for AcquireError {
    fn from(err: CameraError) -> Self {
        AcquireError::Camera(err)
    }
}

/// One camera start-up, run in its own task so the scanner keeps serving
/// commands while the platform is still deciding.
struct Acquisition {
    camera: Arc<dyn CameraBackend>,
    constraints: StreamConstraints,
    event_buffer: usize,
    mounted: Arc<AtomicBool>,
}

impl Acquisition {
    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// Capability check, device check, stream, decoder.
    async fn run(self) -> Result<(CameraSession, mpsc::Receiver<CameraEvent>), AcquireError> {
        let camera = &self.camera;

        if !camera.is_supported() {
            return Err(CameraError::Unsupported.into());
        }

        let devices = camera.enumerate_devices().await?;
        let video_inputs = devices.iter().filter(|d| d.is_video_input()).count();
        info!(video_inputs, "Enumerated camera devices");
        if video_inputs == 0 {
            return Err(CameraError::NoDevice.into());
        }
        if !self.is_mounted() {
            return Err(AcquireError::Unmounted);
        }

        let constraints = self.constraints;
        debug!(
            facing = %constraints.facing_mode,
            width = constraints.ideal_width,
            height = constraints.ideal_height,
            "Requesting camera stream"
        );
        let stream = camera.acquire_stream(&constraints).await?;
        let mut session = CameraSession::new(stream);

        if !self.is_mounted() {
            debug!("Stream arrived after the scanner left; stopping it");
            session.release();
            return Err(AcquireError::Unmounted);
        }

        let (tx, rx) = mpsc::channel(self.event_buffer);
        let decoder = match session.stream() {
            Some(stream) => camera.start_decoding(stream, tx),
            None => Err(CameraError::other(None, "stream released before decoding")),
        };
        match decoder {
            Ok(decoder) => {
                session.attach_decoder(decoder);
                Ok((session, rx))
            }
            Err(err) => {
                session.release();
                Err(err.into())
            }
        }
    }
}

struct ScannerTask {
    screen: ScanScreen,
    commands: mpsc::Receiver<ScanCommand>,
    phase: watch::Sender<ScanPhase>,
    mounted: Arc<AtomicBool>,
}

impl ScannerTask {
    async fn run(mut self) {
        let mut generation: u32 = 0;
        loop {
            generation += 1;
            debug!(generation, "Starting scanner generation");
            match self.run_generation().await {
                GenerationExit::Retry => {
                    info!(generation, "Retrying camera start");
                }
                GenerationExit::Finished => break,
            }
        }
        debug!(generations = generation, "Scanner task finished");
    }

    fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    fn set_phase(&self, phase: ScanPhase) {
        self.phase.send_replace(phase);
    }

    async fn run_generation(&mut self) -> GenerationExit {
        self.set_phase(ScanPhase::Loading);

        let mut acquisition = tokio::spawn(self.acquisition().run().in_current_span());
        let acquired = loop {
            tokio::select! {
                biased;

                command = self.commands.recv() => match command {
                    Some(ScanCommand::Close) => {
                        self.abandon_acquisition();
                        return self.close().await;
                    }
                    Some(ScanCommand::Retry) => {
                        debug!("Retry ignored while the camera is starting");
                    }
                    Some(ScanCommand::Unmount) | None => {
                        self.abandon_acquisition();
                        self.set_phase(ScanPhase::Unmounted);
                        return GenerationExit::Finished;
                    }
                },

                joined = &mut acquisition => break joined,
            }
        };

        let (mut session, mut events) = match acquired {
            Ok(Ok(acquired)) => acquired,
            Ok(Err(AcquireError::Unmounted)) => {
                self.set_phase(ScanPhase::Unmounted);
                return GenerationExit::Finished;
            }
            Ok(Err(AcquireError::Camera(err))) => {
                error!(error = %err, "Camera start failed");
                return self.fail(err).await;
            }
            Err(e) => {
                error!(error = %e, "Camera start task failed");
                return self
                    .fail(CameraError::other(None, "camera start aborted"))
                    .await;
            }
        };

        let mut latch = ScanLatch::default();
        loop {
            tokio::select! {
                biased;

                command = self.commands.recv() => match command {
                    Some(ScanCommand::Close) => {
                        session.release();
                        return self.close().await;
                    }
                    Some(ScanCommand::Retry) => {
                        debug!("Retry ignored while the camera is running");
                    }
                    Some(ScanCommand::Unmount) | None => {
                        session.release();
                        self.set_phase(ScanPhase::Unmounted);
                        return GenerationExit::Finished;
                    }
                },

                event = events.recv() => match event {
                    Some(CameraEvent::SurfaceReady) => {
                        debug!("Video surface ready");
                        self.set_phase(ScanPhase::Scanning);
                    }
                    Some(CameraEvent::Decoded(decoded)) => {
                        if !self.is_mounted() || latch.is_closed() {
                            trace!("Decode after accept or unmount ignored");
                            continue;
                        }
                        match latch.offer(&decoded) {
                            Some(code) => {
                                info!(code = %code, "JAN code accepted");
                                session.release();
                                self.set_phase(ScanPhase::Accepted(code.clone()));
                                self.screen.navigator.navigate(Route::Product { code }).await;
                                return GenerationExit::Finished;
                            }
                            None => {
                                debug!(payload = %decoded, "Ignoring non-JAN barcode");
                            }
                        }
                    }
                    Some(CameraEvent::DecodeFailed(reason)) => {
                        trace!(reason = %reason, "No barcode in frame");
                    }
                    None => {
                        warn!("Decoder stopped unexpectedly");
                        session.release();
                        return self
                            .fail(CameraError::other(None, "decoder stopped"))
                            .await;
                    }
                },
            }
        }
    }

    fn acquisition(&self) -> Acquisition {
        Acquisition {
            camera: self.screen.camera.clone(),
            constraints: self.screen.constraints,
            event_buffer: self.screen.event_buffer,
            mounted: self.mounted.clone(),
        }
    }

    /// Leaves a pending acquisition behind. The detached task sees the
    /// cleared flag and stops whatever stream it still gets; a session it
    /// already built is released by its `Drop`.
    fn abandon_acquisition(&self) {
        self.mounted.store(false, Ordering::SeqCst);
        debug!("Camera start abandoned");
    }

    /// Shows `err` and waits for retry, close or unmount.
    async fn fail(&mut self, err: CameraError) -> GenerationExit {
        if !self.is_mounted() {
            self.set_phase(ScanPhase::Unmounted);
            return GenerationExit::Finished;
        }
        self.set_phase(ScanPhase::Failed(err));

        match self.commands.recv().await {
            Some(ScanCommand::Retry) => GenerationExit::Retry,
            Some(ScanCommand::Close) => self.close().await,
            Some(ScanCommand::Unmount) | None => {
                self.set_phase(ScanPhase::Unmounted);
                GenerationExit::Finished
            }
        }
    }

    async fn close(&mut self) -> GenerationExit {
        info!("Scanner closed");
        self.set_phase(ScanPhase::Closed);
        self.screen.navigator.navigate(Route::Home).await;
        GenerationExit::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::fake::FakeCamera;
    use crate::camera::{DeviceKind, FacingMode, MediaDevice};
    use crate::router::RouteLog;
    use std::time::Duration;
    use tokio::time::timeout;

    const JAN: &str = "4901234567894";
    const PATIENCE: Duration = Duration::from_secs(2);

    /// Yields until `condition` holds, failing the test after `PATIENCE`.
    async fn settle(condition: impl Fn() -> bool) {
        timeout(PATIENCE, async {
            while !condition() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }

    fn jan() -> JanCode {
        JanCode::parse(JAN).unwrap()
    }

    fn mount(camera: &Arc<FakeCamera>, navigator: &Arc<RouteLog>) -> MountedScanner {
        ScanScreen::new(camera.clone(), navigator.clone()).mount()
    }

    fn is_failed(phase: &ScanPhase) -> bool {
        matches!(phase, ScanPhase::Failed(_))
    }

    #[test]
    fn test_latch() {
        let mut latch = ScanLatch::default();

        assert_eq!(latch.offer("12345"), None);
        assert_eq!(latch.offer("abcdefghijklm"), None);
        assert!(!latch.is_closed());

        assert_eq!(latch.offer(JAN), Some(jan()));
        assert!(latch.is_closed());
        assert_eq!(latch.offer("1234567890123"), None);
    }

    #[test]
    fn test_view_render() {
        let loading = ScanView::render(&ScanPhase::Loading, Locale::Ja);
        assert_eq!(loading.status.as_deref(), Some("カメラを起動中..."));
        assert!(!loading.show_retry);

        let scanning = ScanView::render(&ScanPhase::Scanning, Locale::Ja);
        assert_eq!(
            scanning.status.as_deref(),
            Some("カメラでバーコードをスキャンしてください")
        );

        let failed = ScanView::render(&ScanPhase::Failed(CameraError::PermissionDenied), Locale::Ja);
        assert_eq!(failed.status, None);
        assert_eq!(
            failed.error.as_deref(),
            Some("カメラの使用が許可されていません。ブラウザの設定でカメラの使用を許可してください。")
        );
        assert!(failed.show_retry);
        assert_eq!(failed.retry_label, "再試行");
        assert_eq!(failed.close_label, "閉じる");
    }

    #[tokio::test]
    async fn test_accepts_first_jan_code() {
        let camera = Arc::new(FakeCamera::new());
        let navigator = Arc::new(RouteLog::new());
        let scanner = mount(&camera, &navigator);

        let events = camera.events().await;
        events.send(CameraEvent::SurfaceReady).await.unwrap();
        scanner
            .handle()
            .wait_for(|p| *p == ScanPhase::Scanning)
            .await;

        events.send(CameraEvent::DecodeFailed("no code".into())).await.unwrap();
        events.send(CameraEvent::Decoded("12345".into())).await.unwrap();
        events.send(CameraEvent::Decoded("abcdefghijklm".into())).await.unwrap();
        events.send(CameraEvent::Decoded(JAN.into())).await.unwrap();

        let phase = scanner.handle().wait_for(ScanPhase::is_final).await;
        assert_eq!(phase, ScanPhase::Accepted(jan()));
        scanner.unmount().await;

        assert_eq!(navigator.routes(), vec![Route::Product { code: jan() }]);
        assert_eq!(camera.tracks_stopped(), 1);
        assert_eq!(camera.decoders_stopped(), 1);
    }

    #[tokio::test]
    async fn test_second_match_never_navigates() {
        let camera = Arc::new(FakeCamera::new());
        let navigator = Arc::new(RouteLog::new());
        let scanner = mount(&camera, &navigator);

        // Both codes are queued before the task sees either
        let events = camera.events().await;
        events.send(CameraEvent::Decoded(JAN.into())).await.unwrap();
        events
            .send(CameraEvent::Decoded("1234567890123".into()))
            .await
            .unwrap();

        scanner.handle().wait_for(ScanPhase::is_final).await;
        scanner.unmount().await;

        assert_eq!(navigator.routes(), vec![Route::Product { code: jan() }]);
        assert_eq!(camera.tracks_stopped(), 1);
    }

    #[tokio::test]
    async fn test_requests_configured_constraints() {
        let camera = Arc::new(FakeCamera::new());
        let navigator = Arc::new(RouteLog::new());
        let settings = ScannerSettings {
            facing_mode: FacingMode::User,
            ideal_width: 640,
            ideal_height: 480,
            event_buffer: 4,
        };
        let scanner =
            ScanScreen::with_settings(camera.clone(), navigator.clone(), &settings).mount();

        let _events = camera.events().await;
        assert_eq!(
            *camera.last_constraints.lock().unwrap(),
            Some(StreamConstraints {
                facing_mode: FacingMode::User,
                ideal_width: 640,
                ideal_height: 480,
            })
        );
        scanner.unmount().await;
    }

    #[tokio::test]
    async fn test_close_releases_and_goes_home() {
        let camera = Arc::new(FakeCamera::new());
        let navigator = Arc::new(RouteLog::new());
        let scanner = mount(&camera, &navigator);

        let events = camera.events().await;
        events.send(CameraEvent::SurfaceReady).await.unwrap();
        scanner
            .handle()
            .wait_for(|p| *p == ScanPhase::Scanning)
            .await;

        scanner.handle().close().await;
        assert_eq!(
            scanner.handle().wait_for(ScanPhase::is_final).await,
            ScanPhase::Closed
        );
        scanner.unmount().await;

        assert_eq!(navigator.routes(), vec![Route::Home]);
        assert_eq!(camera.tracks_stopped(), 1);
        assert_eq!(camera.decoders_stopped(), 1);
    }

    #[tokio::test]
    async fn test_unmount_while_scanning_releases() {
        let camera = Arc::new(FakeCamera::new());
        let navigator = Arc::new(RouteLog::new());
        let scanner = mount(&camera, &navigator);

        let events = camera.events().await;
        events.send(CameraEvent::SurfaceReady).await.unwrap();
        let handle = scanner.handle().clone();
        handle.wait_for(|p| *p == ScanPhase::Scanning).await;

        scanner.unmount().await;

        assert_eq!(handle.phase(), ScanPhase::Unmounted);
        assert!(navigator.routes().is_empty());
        assert_eq!(camera.tracks_stopped(), 1);
        assert_eq!(camera.decoders_stopped(), 1);
    }

    #[tokio::test]
    async fn test_unmount_during_acquisition_stops_late_stream() {
        let camera = Arc::new(FakeCamera::new().gated());
        let navigator = Arc::new(RouteLog::new());
        let scanner = mount(&camera, &navigator);
        let handle = scanner.handle().clone();

        // The permission prompt is still open; unmount must not wait for it
        camera.wait_acquiring().await;
        timeout(PATIENCE, scanner.unmount()).await.unwrap();
        assert_eq!(handle.phase(), ScanPhase::Unmounted);

        camera.release_acquisition();
        settle(|| camera.tracks_stopped() == 1).await;

        assert_eq!(camera.acquired(), 1);
        assert_eq!(
            camera.counters.decoders_started.load(Ordering::SeqCst),
            0
        );
        assert!(navigator.routes().is_empty());
    }

    #[tokio::test]
    async fn test_close_during_acquisition_goes_home() {
        let camera = Arc::new(FakeCamera::new().gated());
        let navigator = Arc::new(RouteLog::new());
        let scanner = mount(&camera, &navigator);

        camera.wait_acquiring().await;
        scanner.handle().retry().await;
        scanner.handle().close().await;

        let phase = timeout(PATIENCE, scanner.handle().wait_for(ScanPhase::is_final))
            .await
            .unwrap();
        assert_eq!(phase, ScanPhase::Closed);
        assert_eq!(navigator.routes(), vec![Route::Home]);
        timeout(PATIENCE, scanner.unmount()).await.unwrap();

        // Permission granted after the cashier already left
        camera.release_acquisition();
        settle(|| camera.tracks_stopped() == 1).await;

        assert_eq!(camera.acquired(), 1);
        assert_eq!(
            camera.counters.decoders_started.load(Ordering::SeqCst),
            0
        );
        assert_eq!(navigator.routes(), vec![Route::Home]);
    }

    #[tokio::test]
    async fn test_permission_denied_then_retry() {
        let camera =
            Arc::new(FakeCamera::new().failing_with(vec![CameraError::PermissionDenied]));
        let navigator = Arc::new(RouteLog::new());
        let scanner = mount(&camera, &navigator);
        let handle = scanner.handle().clone();

        assert_eq!(
            handle.wait_for(is_failed).await,
            ScanPhase::Failed(CameraError::PermissionDenied)
        );
        assert!(handle.view().show_retry);
        assert_eq!(camera.acquired(), 0);

        // Fresh generation: new session, new latch
        handle.retry().await;
        let events = camera.events().await;
        events.send(CameraEvent::SurfaceReady).await.unwrap();
        handle.wait_for(|p| *p == ScanPhase::Scanning).await;
        events.send(CameraEvent::Decoded(JAN.into())).await.unwrap();

        assert_eq!(handle.wait_for(ScanPhase::is_final).await, ScanPhase::Accepted(jan()));
        scanner.unmount().await;

        assert_eq!(camera.counters.enumerations.load(Ordering::SeqCst), 2);
        assert_eq!(camera.acquired(), 1);
        assert_eq!(camera.tracks_stopped(), 1);
        assert_eq!(navigator.routes(), vec![Route::Product { code: jan() }]);
    }

    #[tokio::test]
    async fn test_unsupported_camera() {
        let mut fake = FakeCamera::new();
        fake.supported = false;
        let camera = Arc::new(fake);
        let navigator = Arc::new(RouteLog::new());
        let scanner = mount(&camera, &navigator);

        assert_eq!(
            scanner.handle().wait_for(is_failed).await,
            ScanPhase::Failed(CameraError::Unsupported)
        );
        assert_eq!(camera.counters.enumerations.load(Ordering::SeqCst), 0);

        scanner.handle().close().await;
        scanner.handle().wait_for(ScanPhase::is_final).await;
        scanner.unmount().await;
        assert_eq!(navigator.routes(), vec![Route::Home]);
    }

    #[tokio::test]
    async fn test_no_video_devices() {
        let mut fake = FakeCamera::new();
        fake.devices = vec![MediaDevice {
            id: "mic".into(),
            label: "Microphone".into(),
            kind: DeviceKind::AudioInput,
        }];
        let camera = Arc::new(fake);
        let navigator = Arc::new(RouteLog::new());
        let scanner = mount(&camera, &navigator);

        assert_eq!(
            scanner.handle().wait_for(is_failed).await,
            ScanPhase::Failed(CameraError::NoDevice)
        );
        assert_eq!(
            scanner.handle().view().error.as_deref(),
            Some("カメラの起動に失敗しました: 利用可能なカメラデバイスが見つかりません")
        );
        scanner.unmount().await;
        assert_eq!(camera.acquired(), 0);
    }

    #[tokio::test]
    async fn test_decoder_start_failure_releases_stream() {
        let fake = FakeCamera::new();
        *fake.decode_error.lock().unwrap() = Some(CameraError::DeviceBusy);
        let camera = Arc::new(fake);
        let navigator = Arc::new(RouteLog::new());
        let scanner = mount(&camera, &navigator);

        assert_eq!(
            scanner.handle().wait_for(is_failed).await,
            ScanPhase::Failed(CameraError::DeviceBusy)
        );
        assert_eq!(camera.tracks_stopped(), 1);

        // Unmount while the error is displayed
        scanner.unmount().await;
        assert_eq!(camera.tracks_stopped(), 1);
        assert_eq!(camera.decoders_stopped(), 0);
    }

    #[tokio::test]
    async fn test_decoder_dying_is_a_failure() {
        let camera = Arc::new(FakeCamera::new());
        let navigator = Arc::new(RouteLog::new());
        let scanner = mount(&camera, &navigator);

        let events = camera.events().await;
        events.send(CameraEvent::SurfaceReady).await.unwrap();
        scanner
            .handle()
            .wait_for(|p| *p == ScanPhase::Scanning)
            .await;

        drop(events);
        camera.end_decoding();

        assert!(matches!(
            scanner.handle().wait_for(is_failed).await,
            ScanPhase::Failed(CameraError::Other { .. })
        ));
        assert_eq!(camera.tracks_stopped(), 1);
        assert_eq!(camera.decoders_stopped(), 1);
        scanner.unmount().await;
    }

    #[tokio::test]
    async fn test_dropping_mount_releases() {
        let camera = Arc::new(FakeCamera::new());
        let navigator = Arc::new(RouteLog::new());
        let scanner = mount(&camera, &navigator);
        let handle = scanner.handle().clone();

        let _events = camera.events().await;
        drop(scanner);

        assert_eq!(handle.wait_for(ScanPhase::is_final).await, ScanPhase::Unmounted);
        assert_eq!(camera.tracks_stopped(), 1);
        assert_eq!(camera.decoders_stopped(), 1);
    }
}
