//! The host environment a backdrop runs inside.
//!
//! A [`Host`] supplies the viewport size, a per-display-frame callback
//! subscription and a resize-event subscription. In a browser these are
//! `window.innerWidth`, `requestAnimationFrame` and the `resize` listener;
//! [`ManualHost`] is an in-process stand-in that tests and the CLI drive by
//! hand.

use std::cell::RefCell;
use std::rc::Rc;

use crate::surface::Size;

/// Id of one outstanding frame request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Id of a resize-event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub i32);

/// Host-side scheduling and viewport queries.
pub trait Host {
    /// Current viewport size in pixels.
    fn viewport(&self) -> Size;

    /// Asks for one callback on the next display frame. `None` means the host
    /// could not schedule it.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Cancels a request made by [`request_frame`](Self::request_frame).
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Subscribes to viewport resize events.
    fn listen_resize(&mut self) -> Option<ListenerHandle>;

    fn unlisten_resize(&mut self, handle: ListenerHandle);
}

#[derive(Debug, Default)]
struct ManualHostState {
    viewport: Size,
    next_id: i32,
    pending_frame: Option<FrameHandle>,
    resize_listener: Option<ListenerHandle>,
    refuse_frames: bool,
    frames_requested: usize,
    frames_cancelled: usize,
}

/// Hand-driven [`Host`] whose clones share one state.
///
/// Keep a clone after moving the host into a backdrop to change the
/// viewport or check what the backdrop subscribed to.
#[derive(Debug, Clone, Default)]
pub struct ManualHost {
    state: Rc<RefCell<ManualHostState>>,
}

impl ManualHost {
    pub fn new(viewport: Size) -> Self {
        let host = Self::default();
        host.state.borrow_mut().viewport = viewport;
        host
    }

    /// Changes the viewport. The owner of the backdrop still has to call
    /// `on_resize`, as a browser event handler would.
    pub fn set_viewport(&self, viewport: Size) {
        self.state.borrow_mut().viewport = viewport;
    }

    /// Makes every later `request_frame` fail.
    pub fn refuse_frames(&self, refuse: bool) {
        self.state.borrow_mut().refuse_frames = refuse;
    }

    /// The frame request waiting to fire, if any.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.state.borrow().pending_frame
    }

    /// Consumes the pending frame request, as the display refresh would.
    /// Returns `false` when nothing was scheduled.
    pub fn fire_frame(&self) -> bool {
        self.state.borrow_mut().pending_frame.take().is_some()
    }

    pub fn is_listening_resize(&self) -> bool {
        self.state.borrow().resize_listener.is_some()
    }

    pub fn frames_requested(&self) -> usize {
        self.state.borrow().frames_requested
    }

    pub fn frames_cancelled(&self) -> usize {
        self.state.borrow().frames_cancelled
    }

    fn next_id(state: &mut ManualHostState) -> i32 {
        state.next_id += 1;
        state.next_id
    }
}

impl Host for ManualHost {
    fn viewport(&self) -> Size {
        self.state.borrow().viewport
    }

    fn request_frame(&mut self) -> Option<FrameHandle> {
        let mut state = self.state.borrow_mut();
        if state.refuse_frames {
            return None;
        }
        let handle = FrameHandle(Self::next_id(&mut state));
        state.pending_frame = Some(handle);
        state.frames_requested += 1;
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let mut state = self.state.borrow_mut();
        if state.pending_frame == Some(handle) {
            state.pending_frame = None;
            state.frames_cancelled += 1;
        }
    }

    fn listen_resize(&mut self) -> Option<ListenerHandle> {
        let mut state = self.state.borrow_mut();
        let handle = ListenerHandle(Self::next_id(&mut state));
        state.resize_listener = Some(handle);
        Some(handle)
    }

    fn unlisten_resize(&mut self, handle: ListenerHandle) {
        let mut state = self.state.borrow_mut();
        if state.resize_listener == Some(handle) {
            state.resize_listener = None;
        }
    }
}
