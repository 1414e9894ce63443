//! What travels between the controller and the renderer.

/// Latest measured size of the drawing area, in surface pixels.
///
/// Each update fully replaces the previous one.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct SizeUpdate {
    pub width: u32,
    pub height: u32,
}

impl SizeUpdate {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Controller → renderer message.
///
/// `H` is the transferable surface handle. It is moved into the message, so
/// the sender loses it for good once the transfer is posted.
#[derive(Debug)]
pub enum RenderMessage<H> {
    /// One-time hand-over of the drawing surface.
    SurfaceTransfer(H),
    /// The drawing area was (re)measured.
    Resize(SizeUpdate),
}

impl<H> RenderMessage<H> {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            RenderMessage::SurfaceTransfer(_) => "surface-transfer",
            RenderMessage::Resize(_) => "resize",
        }
    }
}

/// Renderer → controller notification.
///
/// Purely informational: the controller logs these and never branches on them.
#[derive(Debug, Clone, PartialEq)]
pub enum RendererEvent {
    /// Dataset generated; waiting for a surface.
    Initialized { points: usize },
    /// Surface acquired; the render loop is running.
    SurfaceAcquired,
    /// The viewport now matches this size.
    Resized(SizeUpdate),
    /// A frame was presented.
    Frame { index: u64 },
    /// Something went wrong on the renderer side.
    Failed { message: String },
}

/// Fire-and-forget sender for [`RendererEvent`]s.
///
/// Sends never block: when the receiver is gone or its backlog is full the
/// event is dropped.
#[derive(Debug, Clone, Default)]
pub struct EventSink(Option<crossbeam_channel::Sender<RendererEvent>>);

impl EventSink {
    pub fn new(tx: crossbeam_channel::Sender<RendererEvent>) -> Self {
        Self(Some(tx))
    }

    /// A sink that discards everything.
    pub fn none() -> Self {
        Self(None)
    }

    pub fn emit(&self, event: RendererEvent) {
        if let Some(tx) = &self.0 {
            // Full or disconnected: nobody is waiting for this one.
            let _ = tx.try_send(event);
        }
    }
}
