//! Renderer state machine, run on the worker thread.

use std::time::Duration;

use offcanvas_engine::coords::Viewport;
use offcanvas_engine::paint::Color;
use offcanvas_engine::render::shapes::point::PointInstance;
use offcanvas_engine::render::FrameStatus;
use offcanvas_engine::time::FrameClock;

use crate::config::RendererConfig;
use crate::dataset::Dataset;
use crate::easing;
use crate::error::ChartError;
use crate::message::{EventSink, RenderMessage, RendererEvent, SizeUpdate};
use crate::palette;
use crate::scale::LinearScale;
use crate::surface::{DrawSurface, PlotFrame, TransferSurface};

enum State<S> {
    /// No surface yet; nothing can be drawn.
    Uninitialized,
    /// Surface acquired; frames are drawn until the worker stops.
    Ready { surface: S, size: Option<SizeUpdate> },
}

/// Owns the dataset, the scales and (once transferred) the drawing surface.
///
/// Lifecycle: `Uninitialized` until the first `SurfaceTransfer`, then `Ready`
/// for good. Resizes before that are dropped; a second transfer is dropped.
pub struct Renderer<H: TransferSurface> {
    dataset: Dataset,
    instances: Vec<PointInstance>,
    x_scale: LinearScale,
    y_scale: LinearScale,
    state: State<H::Surface>,
    clock: FrameClock,
    events: EventSink,
}

impl<H: TransferSurface> Renderer<H> {
    /// Generates the dataset; no surface exists yet.
    pub fn new(config: &RendererConfig, events: EventSink) -> Self {
        let dataset = Dataset::generate_seeded(config.point_count, config.seed);
        let instances = color_points(&dataset);

        log::info!("renderer initialized with {} points", dataset.len());
        events.emit(RendererEvent::Initialized { points: dataset.len() });

        let (lo, hi) = easing::bounds(Duration::ZERO);
        Self {
            dataset,
            instances,
            x_scale: LinearScale::new((lo, hi), (0.0, 1.0)),
            y_scale: LinearScale::new((lo, hi), (1.0, 0.0)),
            state: State::Uninitialized,
            clock: FrameClock::new(),
            events,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, State::Ready { .. })
    }

    /// Viewport of the last applied resize, once a surface exists.
    pub fn viewport(&self) -> Option<Viewport> {
        match &self.state {
            State::Ready { size: Some(size), .. } => {
                Some(Viewport::from_pixels(size.width, size.height))
            }
            _ => None,
        }
    }

    pub fn x_scale(&self) -> &LinearScale {
        &self.x_scale
    }

    pub fn y_scale(&self) -> &LinearScale {
        &self.y_scale
    }

    /// Applies one controller message.
    ///
    /// Only a failed surface acquisition is an error; the renderer then stays
    /// uninitialized.
    pub fn handle_message(&mut self, msg: RenderMessage<H>) -> Result<(), ChartError> {
        log::trace!("message: {}", msg.kind());
        match msg {
            RenderMessage::SurfaceTransfer(handle) => self.accept_surface(handle),
            RenderMessage::Resize(size) => {
                self.resize(size);
                Ok(())
            }
        }
    }

    fn accept_surface(&mut self, handle: H) -> Result<(), ChartError> {
        if self.is_ready() {
            log::warn!("ignoring second surface transfer");
            return Ok(());
        }

        match handle.acquire() {
            Ok(surface) => {
                self.state = State::Ready { surface, size: None };
                self.clock.reset();
                log::info!("surface acquired; render loop starting");
                self.events.emit(RendererEvent::SurfaceAcquired);
                Ok(())
            }
            Err(err) => {
                log::error!("surface acquisition failed: {err}");
                self.events.emit(RendererEvent::Failed { message: err.to_string() });
                Err(err)
            }
        }
    }

    fn resize(&mut self, new_size: SizeUpdate) {
        let State::Ready { surface, size } = &mut self.state else {
            log::debug!(
                "resize to {}x{} before surface transfer; ignored",
                new_size.width,
                new_size.height
            );
            return;
        };

        surface.resize(new_size);
        *size = Some(new_size);

        self.x_scale.set_range((0.0, new_size.width as f32));
        self.y_scale.set_range((new_size.height as f32, 0.0));

        log::debug!("viewport {}x{}", new_size.width, new_size.height);
        self.events.emit(RendererEvent::Resized(new_size));
    }

    /// Draws one frame with the zoom phase taken from the wall clock.
    pub fn render_frame(&mut self) -> Result<FrameStatus, ChartError> {
        if !self.is_ready() {
            return Ok(FrameStatus::Skipped);
        }
        let ft = self.clock.tick();
        self.render_at(easing::wall_clock(), ft.frame_index)
    }

    /// Draws one frame with the zoom phase at `t`.
    pub fn render_at(&mut self, t: Duration, index: u64) -> Result<FrameStatus, ChartError> {
        let State::Ready { surface, .. } = &mut self.state else {
            return Ok(FrameStatus::Skipped);
        };

        let bounds = easing::bounds(t);
        self.x_scale.set_domain(bounds);
        self.y_scale.set_domain(bounds);

        let frame = PlotFrame {
            instances: &self.instances,
            revision: self.dataset.revision(),
            x: self.x_scale.axis_map(),
            y: self.y_scale.axis_map(),
        };

        let status = match surface.draw(&frame) {
            Ok(status) => status,
            Err(err) => {
                self.events.emit(RendererEvent::Failed { message: err.to_string() });
                return Err(err);
            }
        };

        if status == FrameStatus::Presented {
            log::trace!("frame {index} domain ±{:.3}", bounds.1);
            self.events.emit(RendererEvent::Frame { index });
        }
        Ok(status)
    }
}

/// Builds GPU instances: positions in data space, palette color per index.
fn color_points(dataset: &Dataset) -> Vec<PointInstance> {
    dataset
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| PointInstance {
            center: [p.x, p.y],
            color: Color::from(palette::fill_color(i)).to_array(),
            size: p.size,
        })
        .collect()
}
