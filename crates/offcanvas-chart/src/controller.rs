//! Main-thread side: measure, hand over the surface once, forward sizes.

use crate::error::ChartError;
use crate::message::{RenderMessage, RendererEvent, SizeUpdate};

/// Something that can be measured and whose drawing surface can be detached.
pub trait Canvas {
    /// What detaching produces; it must be able to cross to the renderer thread.
    type Handle: Send + 'static;

    /// Current size of the drawing area, in surface pixels.
    fn measure(&self) -> SizeUpdate;

    /// Detaches the drawing surface. Succeeds at most once.
    fn transfer_control(&mut self) -> Result<Self::Handle, ChartError>;
}

/// The controller's end of the renderer channel.
pub trait RenderPort<H> {
    fn post(&self, msg: RenderMessage<H>) -> Result<(), ChartError>;

    /// Next pending informational event, if any. Never blocks.
    fn try_event(&self) -> Option<RendererEvent> {
        None
    }
}

/// User-visible warnings.
pub trait Notify {
    fn warn(&mut self, message: &str);
}

type Spawner<P> = Box<dyn FnMut() -> Result<P, ChartError>>;

/// Owns the canvas and, once the first measurement arrives, the renderer port.
///
/// The port is created lazily and at most once; its presence is what keeps the
/// surface transfer from happening twice. If the surface cannot be detached the
/// user is warned once and the controller goes quiet for good.
pub struct Controller<C, P, N>
where
    C: Canvas,
    P: RenderPort<C::Handle>,
    N: Notify,
{
    canvas: C,
    spawn: Spawner<P>,
    port: Option<P>,
    notify: N,
    unsupported: bool,
    stopped: bool,
    failure_reported: bool,
}

impl<C, P, N> Controller<C, P, N>
where
    C: Canvas,
    P: RenderPort<C::Handle>,
    N: Notify,
{
    /// `spawn` starts the renderer; it runs on the first measurement only.
    pub fn new<F>(canvas: C, spawn: F, notify: N) -> Self
    where
        F: FnMut() -> Result<P, ChartError> + 'static,
    {
        Self {
            canvas,
            spawn: Box::new(spawn),
            port: None,
            notify,
            unsupported: false,
            stopped: false,
            failure_reported: false,
        }
    }

    /// Forces the first measurement instead of waiting for a resize.
    pub fn start(&mut self) {
        let size = self.canvas.measure();
        log::debug!("initial measurement {}x{}", size.width, size.height);
        self.on_measure(size);
    }

    /// Handles a measurement: on the first one, attaches the renderer and
    /// transfers the surface; on every one, forwards the size.
    pub fn on_measure(&mut self, size: SizeUpdate) {
        if self.unsupported || self.stopped {
            return;
        }

        if self.port.is_none() {
            match self.attach() {
                Ok(port) => self.port = Some(port),
                Err(err) => {
                    self.give_up(err);
                    return;
                }
            }
        }

        if let Some(port) = &self.port {
            if let Err(err) = port.post(RenderMessage::Resize(size)) {
                log::warn!("resize {}x{} not delivered: {err}", size.width, size.height);
            }
        }
    }

    fn attach(&mut self) -> Result<P, ChartError> {
        let handle = self.canvas.transfer_control()?;
        let port = (self.spawn)()?;
        port.post(RenderMessage::SurfaceTransfer(handle))?;
        log::info!("drawing surface transferred to renderer");
        Ok(port)
    }

    fn give_up(&mut self, err: ChartError) {
        self.unsupported = true;
        log::error!("offscreen rendering unavailable: {err}");
        self.notify.warn(&format!(
            "This system cannot render off the main thread.\n\n{err}"
        ));
    }

    /// Logs every pending renderer event. Returns how many were drained.
    ///
    /// The first `Failed` event is also shown to the user; the renderer keeps
    /// its own course either way.
    pub fn drain_events(&mut self) -> usize {
        let Some(port) = &self.port else {
            return 0;
        };

        let mut n = 0;
        while let Some(event) = port.try_event() {
            log_event(&event);
            if let RendererEvent::Failed { message } = &event {
                if !self.failure_reported {
                    self.failure_reported = true;
                    self.notify.warn(&format!("The renderer stopped drawing.\n\n{message}"));
                }
            }
            n += 1;
        }
        n
    }

    /// Whether a renderer has been attached.
    pub fn is_attached(&self) -> bool {
        self.port.is_some()
    }

    /// Whether attaching failed and the controller gave up.
    pub fn is_unsupported(&self) -> bool {
        self.unsupported
    }

    /// Drops the renderer port, which stops the renderer. Later measurements
    /// are ignored.
    pub fn shutdown(&mut self) {
        self.stopped = true;
        if self.port.take().is_some() {
            log::info!("renderer detached");
        }
    }
}

fn log_event(event: &RendererEvent) {
    match event {
        RendererEvent::Initialized { points } => log::info!("renderer: {points} points generated"),
        RendererEvent::SurfaceAcquired => log::info!("renderer: surface acquired"),
        RendererEvent::Resized(s) => log::debug!("renderer: viewport {}x{}", s.width, s.height),
        RendererEvent::Frame { index } => log::trace!("renderer: frame {index}"),
        RendererEvent::Failed { message } => log::error!("renderer: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    struct FakeCanvas {
        size: SizeUpdate,
        supported: bool,
        transfers: Rc<Cell<usize>>,
    }

    impl Canvas for FakeCanvas {
        type Handle = u32;

        fn measure(&self) -> SizeUpdate {
            self.size
        }

        fn transfer_control(&mut self) -> Result<u32, ChartError> {
            if !self.supported {
                return Err(ChartError::Unsupported("no offscreen surfaces".into()));
            }
            self.transfers.set(self.transfers.get() + 1);
            Ok(42)
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Sent {
        Transfer(u32),
        Resize(u32, u32),
    }

    #[derive(Default)]
    struct FakePort {
        sent: Rc<RefCell<Vec<Sent>>>,
        events: RefCell<VecDeque<RendererEvent>>,
    }

    impl RenderPort<u32> for FakePort {
        fn post(&self, msg: RenderMessage<u32>) -> Result<(), ChartError> {
            let sent = match msg {
                RenderMessage::SurfaceTransfer(h) => Sent::Transfer(h),
                RenderMessage::Resize(s) => Sent::Resize(s.width, s.height),
            };
            self.sent.borrow_mut().push(sent);
            Ok(())
        }

        fn try_event(&self) -> Option<RendererEvent> {
            self.events.borrow_mut().pop_front()
        }
    }

    #[derive(Default, Clone)]
    struct Warnings(Rc<RefCell<Vec<String>>>);

    impl Notify for Warnings {
        fn warn(&mut self, message: &str) {
            self.0.borrow_mut().push(message.to_owned());
        }
    }

    struct Harness {
        controller: Controller<FakeCanvas, FakePort, Warnings>,
        sent: Rc<RefCell<Vec<Sent>>>,
        spawns: Rc<Cell<usize>>,
        transfers: Rc<Cell<usize>>,
        warnings: Warnings,
    }

    fn harness(supported: bool) -> Harness {
        let sent = Rc::new(RefCell::new(Vec::new()));
        let spawns = Rc::new(Cell::new(0));
        let transfers = Rc::new(Cell::new(0));
        let warnings = Warnings::default();

        let canvas = FakeCanvas {
            size: SizeUpdate::new(800, 600),
            supported,
            transfers: Rc::clone(&transfers),
        };
        let (port_sent, port_spawns) = (Rc::clone(&sent), Rc::clone(&spawns));
        let spawn = move || {
            port_spawns.set(port_spawns.get() + 1);
            let port = FakePort { sent: Rc::clone(&port_sent), ..Default::default() };
            port.events.borrow_mut().extend([
                RendererEvent::Initialized { points: 3 },
                RendererEvent::Frame { index: 0 },
            ]);
            Ok(port)
        };

        Harness {
            controller: Controller::new(canvas, spawn, warnings.clone()),
            sent,
            spawns,
            transfers,
            warnings,
        }
    }

    // ── transfer ──────────────────────────────────────────────────────────

    #[test]
    fn start_measures_and_sends_transfer_then_resize() {
        let mut h = harness(true);
        h.controller.start();

        assert!(h.controller.is_attached());
        assert_eq!(*h.sent.borrow(), vec![Sent::Transfer(42), Sent::Resize(800, 600)]);
    }

    #[test]
    fn transfer_happens_exactly_once() {
        let mut h = harness(true);
        h.controller.start();
        for w in [100, 200, 300] {
            h.controller.on_measure(SizeUpdate::new(w, 50));
        }

        assert_eq!(h.spawns.get(), 1);
        assert_eq!(h.transfers.get(), 1);
        let transfers = h.sent.borrow().iter().filter(|s| matches!(s, Sent::Transfer(_))).count();
        assert_eq!(transfers, 1);
    }

    #[test]
    fn every_measurement_is_forwarded_in_order() {
        let mut h = harness(true);
        h.controller.on_measure(SizeUpdate::new(1, 2));
        h.controller.on_measure(SizeUpdate::new(3, 4));
        h.controller.on_measure(SizeUpdate::new(5, 6));

        assert_eq!(
            *h.sent.borrow(),
            vec![Sent::Transfer(42), Sent::Resize(1, 2), Sent::Resize(3, 4), Sent::Resize(5, 6)]
        );
    }

    // ── unsupported ───────────────────────────────────────────────────────

    #[test]
    fn unsupported_warns_once_and_never_spawns() {
        let mut h = harness(false);
        h.controller.start();
        h.controller.on_measure(SizeUpdate::new(10, 10));
        h.controller.on_measure(SizeUpdate::new(20, 20));

        assert!(h.controller.is_unsupported());
        assert!(!h.controller.is_attached());
        assert_eq!(h.spawns.get(), 0);
        assert!(h.sent.borrow().is_empty());
        assert_eq!(h.warnings.0.borrow().len(), 1);
    }

    #[test]
    fn spawn_failure_is_reported_like_missing_capability() {
        let canvas = FakeCanvas {
            size: SizeUpdate::new(1, 1),
            supported: true,
            transfers: Rc::default(),
        };
        let warnings = Warnings::default();
        let spawn = || -> Result<FakePort, ChartError> {
            Err(ChartError::Spawn(std::io::Error::other("no threads")))
        };
        let mut c = Controller::new(canvas, spawn, warnings.clone());
        c.start();
        c.start();

        assert!(c.is_unsupported());
        assert_eq!(warnings.0.borrow().len(), 1);
    }

    // ── events ────────────────────────────────────────────────────────────

    #[test]
    fn drains_events_without_reacting() {
        let mut h = harness(true);
        assert_eq!(h.controller.drain_events(), 0);

        h.controller.start();
        let before = h.sent.borrow().len();
        assert_eq!(h.controller.drain_events(), 2);
        assert_eq!(h.controller.drain_events(), 0);
        assert_eq!(h.sent.borrow().len(), before);
    }

    #[test]
    fn first_renderer_failure_is_shown_once() {
        let mut h = harness(true);
        h.controller.start();
        h.controller.drain_events();

        let failure = |message: &str| RendererEvent::Failed { message: message.into() };
        if let Some(port) = h.controller.port.as_ref() {
            port.events.borrow_mut().extend([failure("no adapter"), failure("still no adapter")]);
        }
        assert_eq!(h.controller.drain_events(), 2);

        if let Some(port) = h.controller.port.as_ref() {
            port.events.borrow_mut().push_back(failure("again"));
        }
        h.controller.drain_events();

        let warnings = h.warnings.0.borrow();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("no adapter"));
        // still attached: events never drive control flow
        assert!(h.controller.is_attached());
    }

    #[test]
    fn shutdown_drops_the_port() {
        let mut h = harness(true);
        h.controller.start();
        h.controller.shutdown();
        assert!(!h.controller.is_attached());
        assert_eq!(h.controller.drain_events(), 0);

        h.controller.on_measure(SizeUpdate::new(5, 5));
        assert_eq!(h.spawns.get(), 1);
        assert!(h.warnings.0.borrow().is_empty());
    }
}
