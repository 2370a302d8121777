//! The backdrop lifecycle: start, per-frame update/draw, resize, stop.
//!
//! A [`Backdrop`] owns the surface, the particle field and the host
//! subscriptions. Its frame handle and resize listener are plain fields, so
//! several backdrops can run side by side and teardown is deterministic.
//!
//! The host drives it:
//! - `start` once the surface exists,
//! - `frame` from every display-refresh callback,
//! - `on_resize` from the viewport resize event,
//! - `stop` (or drop) on unmount.

use tracing::{debug, info, warn};

use crate::error::BackdropError;
use crate::field::ParticleField;
use crate::host::{FrameHandle, Host, ListenerHandle};
use crate::surface::{Size, Surface, SurfaceManager};

/// Whether the frame loop is still live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Running,
    Stopped,
}

/// A running animated backdrop.
pub struct Backdrop<S: Surface, H: Host> {
    surface: SurfaceManager<S>,
    field: Box<dyn ParticleField>,
    host: H,
    state: LifecycleState,
    frame: Option<FrameHandle>,
    resize_listener: Option<ListenerHandle>,
    pending_resize: Option<Size>,
    frames_rendered: u64,
}

impl<S: Surface, H: Host> Backdrop<S, H> {
    /// Sizes the surface to the viewport, lays out the field, subscribes to
    /// resize events and schedules the first frame.
    ///
    /// Returns `BackdropError::FrameLoopUnavailable` (after releasing the
    /// resize subscription) if the host refuses to schedule a frame.
    pub fn start(
        surface: S,
        mut host: H,
        mut field: Box<dyn ParticleField>,
    ) -> Result<Self, BackdropError> {
        let viewport = host.viewport();
        let mut surface = SurfaceManager::new(surface);
        surface.resize(viewport);
        field.init(viewport);

        let resize_listener = host.listen_resize();
        let Some(frame) = host.request_frame() else {
            if let Some(listener) = resize_listener {
                host.unlisten_resize(listener);
            }
            return Err(BackdropError::FrameLoopUnavailable);
        };

        info!(
            width = viewport.width,
            height = viewport.height,
            population = field.population(),
            "backdrop started"
        );

        Ok(Self {
            surface,
            field,
            host,
            state: LifecycleState::Running,
            frame: Some(frame),
            resize_listener,
            pending_resize: None,
            frames_rendered: 0,
        })
    }

    /// Renders one frame and schedules the next.
    ///
    /// Applies any pending resize first (surface, then field), then fades,
    /// steps and draws. Returns `false` without touching anything once the
    /// backdrop is stopped, so a callback that outlives teardown is inert.
    pub fn frame(&mut self) -> bool {
        if self.state == LifecycleState::Stopped {
            return false;
        }
        self.frame = None;

        if let Some(size) = self.pending_resize.take() {
            self.surface.resize(size);
            self.field.init(size);
            debug!(
                width = size.width,
                height = size.height,
                population = self.field.population(),
                "applied resize"
            );
        }

        self.surface.fade(self.field.fade_color());
        self.field.step();
        self.field.draw(self.surface.surface_mut());
        self.frames_rendered += 1;

        match self.host.request_frame() {
            Some(handle) => {
                self.frame = Some(handle);
                true
            }
            None => {
                warn!(
                    frames = self.frames_rendered,
                    "host refused the next frame, stopping backdrop"
                );
                self.stop();
                false
            }
        }
    }

    /// Records the current viewport size for the next frame.
    ///
    /// The resize is never applied mid-frame: the surface and field are
    /// rebuilt at the top of the next [`frame`](Self::frame), before anything
    /// is drawn. Several resizes between frames collapse into the last one.
    pub fn on_resize(&mut self) {
        if self.state == LifecycleState::Stopped {
            return;
        }
        let viewport = self.host.viewport();
        debug!(
            width = viewport.width,
            height = viewport.height,
            "resize queued"
        );
        self.pending_resize = Some(viewport);
    }

    /// Cancels the outstanding frame and the resize subscription.
    ///
    /// Idempotent. Also runs on drop.
    pub fn stop(&mut self) {
        if let Some(handle) = self.frame.take() {
            self.host.cancel_frame(handle);
        }
        if let Some(listener) = self.resize_listener.take() {
            self.host.unlisten_resize(listener);
        }
        if self.state == LifecycleState::Running {
            self.state = LifecycleState::Stopped;
            info!(frames = self.frames_rendered, "backdrop stopped");
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LifecycleState::Running
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn is_resize_pending(&self) -> bool {
        self.pending_resize.is_some()
    }

    pub fn size(&self) -> Size {
        self.surface.size()
    }

    pub fn surface(&self) -> &S {
        self.surface.surface()
    }

    pub fn field(&self) -> &dyn ParticleField {
        self.field.as_ref()
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

impl<S: Surface, H: Host> Drop for Backdrop<S, H> {
    fn drop(&mut self) {
        self.stop();
    }
}
