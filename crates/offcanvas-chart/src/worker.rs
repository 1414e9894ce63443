//! The renderer thread and the controller's handle to it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use offcanvas_engine::render::FrameStatus;

use crate::config::{parse_point_count, RendererConfig};
use crate::controller::RenderPort;
use crate::error::ChartError;
use crate::message::{EventSink, RenderMessage, RendererEvent};
use crate::renderer::Renderer;
use crate::surface::TransferSurface;

/// How long the idle loop waits for a message before checking for shutdown.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Cooperative stop flag shared between a worker handle and its thread.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken(Arc<AtomicBool>);

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Renderer thread parameters.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Thread name, shows up in logs and debuggers.
    pub name: String,
    /// Raw point-count parameter, parsed on the worker.
    pub point_count: Option<String>,
    /// Fixed dataset seed.
    pub seed: Option<u64>,
    /// Capacity of the event channel; events beyond it are dropped.
    pub event_backlog: usize,
}

impl WorkerConfig {
    fn renderer_config(&self) -> RendererConfig {
        RendererConfig {
            point_count: parse_point_count(self.point_count.as_deref()),
            seed: self.seed,
        }
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            name: "offcanvas-renderer".to_owned(),
            point_count: None,
            seed: None,
            event_backlog: 256,
        }
    }
}

/// Handle to a running renderer thread.
///
/// Dropping it (or calling [`terminate`](Self::terminate)) cancels the loop,
/// closes the message channel and joins the thread.
pub struct RenderWorker<H: TransferSurface> {
    tx: Option<Sender<RenderMessage<H>>>,
    events: Receiver<RendererEvent>,
    token: ShutdownToken,
    thread: Option<JoinHandle<()>>,
}

impl<H: TransferSurface> RenderWorker<H> {
    pub fn spawn(config: WorkerConfig) -> Result<Self, ChartError> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let (event_tx, events) = crossbeam_channel::bounded(config.event_backlog.max(1));
        let token = ShutdownToken::new();

        let renderer_config = config.renderer_config();
        let thread_token = token.clone();
        let thread = thread::Builder::new()
            .name(config.name.clone())
            .spawn(move || {
                run_loop::<H>(&renderer_config, &rx, EventSink::new(event_tx), &thread_token)
            })?;

        log::debug!("spawned renderer thread '{}'", config.name);
        Ok(Self {
            tx: Some(tx),
            events,
            token,
            thread: Some(thread),
        })
    }

    /// Whether the renderer thread is still running.
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    pub fn token(&self) -> &ShutdownToken {
        &self.token
    }

    /// Stops the loop and waits for the thread to exit.
    pub fn terminate(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.token.cancel();
        self.tx = None;
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("renderer thread panicked");
            }
        }
    }
}

impl<H: TransferSurface> RenderPort<H> for RenderWorker<H> {
    fn post(&self, msg: RenderMessage<H>) -> Result<(), ChartError> {
        let tx = self.tx.as_ref().ok_or(ChartError::Disconnected)?;
        tx.send(msg).map_err(|_| ChartError::Disconnected)
    }

    fn try_event(&self) -> Option<RendererEvent> {
        self.events.try_recv().ok()
    }
}

impl<H: TransferSurface> Drop for RenderWorker<H> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop<H: TransferSurface>(
    config: &RendererConfig,
    rx: &Receiver<RenderMessage<H>>,
    events: EventSink,
    token: &ShutdownToken,
) {
    let mut renderer = Renderer::<H>::new(config, events);

    while !token.is_cancelled() {
        if !renderer.is_ready() {
            // Nothing to draw: block on the channel.
            match rx.recv_timeout(IDLE_POLL) {
                Ok(msg) => apply(&mut renderer, msg),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
            continue;
        }

        if !drain(&mut renderer, rx) {
            break;
        }

        match renderer.render_frame() {
            Ok(FrameStatus::Skipped) => {
                // Zero-sized or reconfiguring surface; wait for a resize
                // rather than spinning.
                match rx.recv_timeout(Duration::from_millis(16)) {
                    Ok(msg) => apply(&mut renderer, msg),
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            Ok(_) => {}
            Err(err) if err.is_fatal() => {
                log::error!("render loop aborted: {err}");
                break;
            }
            Err(err) => log::warn!("frame failed: {err}"),
        }
    }

    log::info!("render loop stopped");
}

/// Applies every pending message. Returns `false` once the controller is gone.
fn drain<H: TransferSurface>(renderer: &mut Renderer<H>, rx: &Receiver<RenderMessage<H>>) -> bool {
    loop {
        match rx.try_recv() {
            Ok(msg) => apply(renderer, msg),
            Err(TryRecvError::Empty) => return true,
            Err(TryRecvError::Disconnected) => return false,
        }
    }
}

fn apply<H: TransferSurface>(renderer: &mut Renderer<H>, msg: RenderMessage<H>) {
    // Failures are logged and reported as events by the renderer itself.
    let _ = renderer.handle_message(msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    use crate::controller::{Canvas, Controller, Notify};
    use crate::message::SizeUpdate;
    use crate::testing::{FakeHandle, Recording};

    fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        cond()
    }

    fn config(points: &str) -> WorkerConfig {
        WorkerConfig {
            name: "test-renderer".into(),
            point_count: Some(points.into()),
            seed: Some(11),
            ..Default::default()
        }
    }

    fn running(points: &str) -> (RenderWorker<FakeHandle>, Recording) {
        let worker = RenderWorker::<FakeHandle>::spawn(config(points)).unwrap();
        let (handle, rec) = FakeHandle::new();
        worker.post(RenderMessage::SurfaceTransfer(handle)).unwrap();
        worker.post(RenderMessage::Resize(SizeUpdate::new(800, 600))).unwrap();
        (worker, rec)
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn renders_continuously_after_transfer() {
        let (worker, rec) = running("25");
        assert!(wait_until(|| rec.frames() >= 5));
        assert_eq!(rec.sizes(), vec![SizeUpdate::new(800, 600)]);
        assert_eq!(rec.last_instance_count(), Some(25));
        assert_eq!(rec.uploads(), 1);
        worker.terminate();
    }

    #[test]
    fn terminate_stops_drawing() {
        let (worker, rec) = running("3");
        assert!(wait_until(|| rec.frames() >= 2));
        worker.terminate();

        let after = rec.frames();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(rec.frames(), after);
    }

    #[test]
    fn drop_without_transfer_joins_promptly() {
        let worker = RenderWorker::<FakeHandle>::spawn(config("1")).unwrap();
        let token = worker.token().clone();
        let started = Instant::now();
        drop(worker);
        assert!(token.is_cancelled());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn fatal_frame_ends_the_loop() {
        let (worker, rec) = running("3");
        assert!(wait_until(|| rec.frames() >= 1));
        rec.fail_next_draw();

        assert!(wait_until(|| !worker.is_running()));
        let err = worker.post(RenderMessage::Resize(SizeUpdate::new(1, 1)));
        assert!(matches!(err, Err(ChartError::Disconnected)));
    }

    #[test]
    fn closed_channel_ends_the_loop_without_cancellation() {
        let spawn_loop = |rx: Receiver<RenderMessage<FakeHandle>>, token: ShutdownToken| {
            let config = RendererConfig { point_count: 2, seed: Some(3) };
            thread::spawn(move || run_loop::<FakeHandle>(&config, &rx, EventSink::none(), &token))
        };

        // waiting for a surface
        let token = ShutdownToken::new();
        let (tx, rx) = crossbeam_channel::unbounded();
        let idle = spawn_loop(rx, token.clone());
        drop(tx);
        assert!(wait_until(|| idle.is_finished()));
        idle.join().unwrap();
        assert!(!token.is_cancelled());

        // drawing
        let token = ShutdownToken::new();
        let (tx, rx) = crossbeam_channel::unbounded();
        let drawing = spawn_loop(rx, token.clone());
        let (handle, rec) = FakeHandle::new();
        tx.send(RenderMessage::SurfaceTransfer(handle)).unwrap();
        tx.send(RenderMessage::Resize(SizeUpdate::new(16, 16))).unwrap();
        assert!(wait_until(|| rec.frames() >= 2));
        drop(tx);
        assert!(wait_until(|| drawing.is_finished()));
        drawing.join().unwrap();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn worker_config_parses_the_raw_count() {
        let parsed = config("2.9").renderer_config();
        assert_eq!(parsed, RendererConfig { point_count: 2, seed: Some(11) });
        assert_eq!(WorkerConfig::default().renderer_config().point_count, crate::config::DEFAULT_POINT_COUNT);
    }

    // ── messages ──────────────────────────────────────────────────────────

    #[test]
    fn resize_while_running_reaches_the_surface() {
        let (worker, rec) = running("3");
        assert!(wait_until(|| rec.frames() >= 1));
        worker.post(RenderMessage::Resize(SizeUpdate::new(300, 200))).unwrap();
        worker.post(RenderMessage::Resize(SizeUpdate::new(320, 240))).unwrap();

        assert!(wait_until(|| rec.sizes().last() == Some(&SizeUpdate::new(320, 240))));
        assert_eq!(rec.sizes().len(), 3);
    }

    #[test]
    fn non_numeric_count_falls_back_to_default() {
        let (worker, rec) = running("abc");
        assert!(wait_until(|| rec.frames() >= 1));
        assert_eq!(rec.last_instance_count(), Some(crate::config::DEFAULT_POINT_COUNT));
        worker.terminate();
    }

    #[test]
    fn reports_milestones_in_order() {
        let (worker, rec) = running("4");
        assert!(wait_until(|| rec.frames() >= 2));

        let mut events = Vec::new();
        while let Some(event) = worker.try_event() {
            events.push(event);
        }
        assert_eq!(events[0], RendererEvent::Initialized { points: 4 });
        assert_eq!(events[1], RendererEvent::SurfaceAcquired);
        assert_eq!(events[2], RendererEvent::Resized(SizeUpdate::new(800, 600)));
        assert!(events[3..].iter().all(|e| matches!(e, RendererEvent::Frame { .. })));
    }

    #[test]
    fn tiny_event_backlog_never_blocks_the_loop() {
        let worker = RenderWorker::<FakeHandle>::spawn(WorkerConfig {
            event_backlog: 1,
            ..config("2")
        })
        .unwrap();
        let (handle, rec) = FakeHandle::new();
        worker.post(RenderMessage::SurfaceTransfer(handle)).unwrap();
        assert!(wait_until(|| rec.frames() >= 10));
    }

    // ── with a controller ─────────────────────────────────────────────────

    struct HandleCanvas(Option<FakeHandle>);

    impl Canvas for HandleCanvas {
        type Handle = FakeHandle;

        fn measure(&self) -> SizeUpdate {
            SizeUpdate::new(640, 480)
        }

        fn transfer_control(&mut self) -> Result<FakeHandle, ChartError> {
            self.0.take().ok_or(ChartError::AlreadyTransferred)
        }
    }

    struct Silent;

    impl Notify for Silent {
        fn warn(&mut self, _message: &str) {}
    }

    #[test]
    fn controller_drives_a_real_worker() {
        let (handle, rec) = FakeHandle::new();
        let spawn = || RenderWorker::<FakeHandle>::spawn(config("8"));
        let mut controller = Controller::new(HandleCanvas(Some(handle)), spawn, Silent);

        controller.start();
        controller.on_measure(SizeUpdate::new(1024, 768));

        assert!(wait_until(|| rec.frames() >= 3));
        assert_eq!(
            rec.sizes(),
            vec![SizeUpdate::new(640, 480), SizeUpdate::new(1024, 768)]
        );
        assert!(controller.drain_events() > 0);

        controller.shutdown();
        let after = rec.frames();
        thread::sleep(Duration::from_millis(20));
        assert_eq!(rec.frames(), after);
    }
}
