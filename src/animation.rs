//! Frame scheduling and the per-preview animation task.
//!
//! Each animation runs one frame to completion and then re-registers itself
//! with the scheduler. Animations share nothing but the scheduler, so one
//! stopping never affects the others.

use crate::config::{DomeArgs, PreviewKind};
use crate::error::{PreviewError, PreviewResult};
use crate::graphics::Canvas;
use crate::widget::{build_preview, Preview};
use log::{debug, error, warn};
use std::cell::{Cell, RefCell};
use std::mem;
use std::rc::Rc;

/// Callback invoked with the elapsed time of the frame it runs in
pub type FrameCallback = Box<dyn FnOnce(f64, &mut dyn FrameScheduler)>;

/// Host-side source of display frames
pub trait FrameScheduler {
    /// Runs `callback` once on the next frame
    fn schedule_next_frame(&mut self, callback: FrameCallback);
}

/// Callbacks waiting for the next frame.
///
/// Callbacks registered while a frame runs are deferred to the following one.
#[derive(Default)]
pub struct FrameQueue {
    pending: Vec<FrameCallback>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every callback due this frame and returns how many ran
    pub fn run_frame(&mut self, elapsed_ms: f64) -> usize {
        let due = mem::take(&mut self.pending);
        let count = due.len();
        for callback in due {
            callback(elapsed_ms, self);
        }
        count
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FrameScheduler for FrameQueue {
    fn schedule_next_frame(&mut self, callback: FrameCallback) {
        self.pending.push(callback);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Running,
    Stopped,
}

/// Drawing surface owned by one animation, readable by the host between frames
pub type SharedCanvas<C> = Rc<RefCell<C>>;

/// Control handle returned by [`start`]
#[derive(Debug, Clone)]
pub struct AnimationHandle {
    name: &'static str,
    state: Rc<Cell<AnimationState>>,
}

impl AnimationHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> AnimationState {
        self.state.get()
    }

    pub fn is_running(&self) -> bool {
        self.state() == AnimationState::Running
    }

    /// Prevents any further frames. The pending callback drops itself.
    pub fn stop(&self) {
        if self.state.replace(AnimationState::Stopped) == AnimationState::Running {
            debug!("{} animation stopped", self.name);
        }
    }
}

/// Host that hands out one drawing surface per preview slot
pub trait SurfaceProvider {
    type Canvas: Canvas + 'static;

    fn acquire_surface(
        &mut self,
        slot: usize,
        name: &'static str,
    ) -> PreviewResult<SharedCanvas<Self::Canvas>>;
}

struct Animation<C> {
    preview: Box<dyn Preview>,
    canvas: SharedCanvas<C>,
    state: Rc<Cell<AnimationState>>,
}

impl<C: Canvas + 'static> Animation<C> {
    fn frame(mut self, elapsed_ms: f64, scheduler: &mut dyn FrameScheduler) {
        if self.state.get() == AnimationState::Stopped {
            return;
        }
        if let Err(err) = self.draw(elapsed_ms) {
            error!("{err}; stopping the {} animation", self.preview.name());
            self.state.set(AnimationState::Stopped);
            return;
        }
        self.schedule(scheduler);
    }

    fn draw(&mut self, elapsed_ms: f64) -> Result<(), PreviewError> {
        let mut canvas = self
            .canvas
            .try_borrow_mut()
            .map_err(|_| PreviewError::SurfaceBusy(self.preview.name()))?;
        self.preview.draw_frame(&mut *canvas, elapsed_ms);
        Ok(())
    }

    fn schedule(self, scheduler: &mut dyn FrameScheduler) {
        scheduler.schedule_next_frame(Box::new(
            move |elapsed_ms: f64, scheduler: &mut dyn FrameScheduler| {
                self.frame(elapsed_ms, scheduler)
            },
        ));
    }
}

/// Registers `preview` for the next frame. It keeps redrawing `canvas` on
/// every frame until stopped or until the canvas cannot be borrowed.
pub fn start<C: Canvas + 'static>(
    preview: Box<dyn Preview>,
    canvas: SharedCanvas<C>,
    scheduler: &mut dyn FrameScheduler,
) -> AnimationHandle {
    let state = Rc::new(Cell::new(AnimationState::Running));
    let handle = AnimationHandle {
        name: preview.name(),
        state: Rc::clone(&state),
    };
    debug!("{} animation started", handle.name);
    Animation {
        preview,
        canvas,
        state,
    }
    .schedule(scheduler);
    handle
}

/// Starts one animation per entry of `kinds`, slot by slot.
///
/// A preview whose configuration is rejected or whose surface cannot be
/// acquired is logged and skipped; the remaining previews still start.
pub fn start_previews<P: SurfaceProvider + ?Sized>(
    kinds: &[PreviewKind],
    dome: &DomeArgs,
    default_min_scale: f64,
    provider: &mut P,
    scheduler: &mut dyn FrameScheduler,
) -> Vec<AnimationHandle> {
    let mut handles = Vec::with_capacity(kinds.len());
    for (slot, &kind) in kinds.iter().enumerate() {
        let preview = match build_preview(kind, dome, default_min_scale) {
            Ok(preview) => preview,
            Err(err) => {
                error!("{} preview disabled: {err}", kind.name());
                continue;
            }
        };
        let surface = match provider.acquire_surface(slot, kind.name()) {
            Ok(surface) => surface,
            Err(err) => {
                warn!("{err}");
                continue;
            }
        };
        handles.push(start(preview, surface, scheduler));
    }
    handles
}
