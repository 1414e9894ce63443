//! GPU-free surface used by the tests.

use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use offcanvas_engine::render::shapes::point::AxisMap;
use offcanvas_engine::render::FrameStatus;

use crate::error::ChartError;
use crate::message::SizeUpdate;
use crate::surface::{DrawSurface, PlotFrame, TransferSurface};

#[derive(Debug, Default)]
struct Log {
    acquired: bool,
    sizes: Vec<SizeUpdate>,
    maps: Vec<(AxisMap, AxisMap)>,
    uploads: usize,
    last_revision: Option<u64>,
    last_instance_count: Option<usize>,
    fail_next_draw: bool,
}

/// Shared view of everything a fake surface saw.
#[derive(Debug, Clone, Default)]
pub struct Recording(Arc<Mutex<Log>>);

impl Recording {
    fn log(&self) -> MutexGuard<'_, Log> {
        self.0.lock().unwrap()
    }

    pub fn acquired(&self) -> bool {
        self.log().acquired
    }

    pub fn sizes(&self) -> Vec<SizeUpdate> {
        self.log().sizes.clone()
    }

    pub fn frames(&self) -> usize {
        self.log().maps.len()
    }

    pub fn maps(&self) -> Vec<(AxisMap, AxisMap)> {
        self.log().maps.clone()
    }

    pub fn uploads(&self) -> usize {
        self.log().uploads
    }

    pub fn last_instance_count(&self) -> Option<usize> {
        self.log().last_instance_count
    }

    pub fn fail_next_draw(&self) {
        self.log().fail_next_draw = true;
    }
}

#[derive(Debug)]
pub struct FakeHandle {
    recording: Recording,
    fail: bool,
}

impl FakeHandle {
    pub fn new() -> (Self, Recording) {
        let recording = Recording::default();
        (Self { recording: recording.clone(), fail: false }, recording)
    }

    /// A handle whose acquisition fails, like a machine without an adapter.
    pub fn failing() -> Self {
        Self { recording: Recording::default(), fail: true }
    }
}

impl TransferSurface for FakeHandle {
    type Surface = FakeSurface;

    fn acquire(self) -> Result<FakeSurface, ChartError> {
        if self.fail {
            return Err(ChartError::Gpu("no suitable adapter".into()));
        }
        self.recording.log().acquired = true;
        Ok(FakeSurface { recording: self.recording })
    }
}

#[derive(Debug)]
pub struct FakeSurface {
    recording: Recording,
}

impl DrawSurface for FakeSurface {
    fn resize(&mut self, size: SizeUpdate) {
        self.recording.log().sizes.push(size);
    }

    fn draw(&mut self, frame: &PlotFrame<'_>) -> Result<FrameStatus, ChartError> {
        {
            let mut log = self.recording.log();
            if std::mem::take(&mut log.fail_next_draw) {
                return Err(ChartError::Fatal);
            }
            if log.last_revision != Some(frame.revision) {
                log.uploads += 1;
                log.last_revision = Some(frame.revision);
            }
            log.last_instance_count = Some(frame.instances.len());
            log.maps.push((frame.x, frame.y));
        }
        // stand-in for vsync
        thread::sleep(Duration::from_millis(1));
        Ok(FrameStatus::Presented)
    }
}
