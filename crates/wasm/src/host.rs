//! [`Host`] backed by the browser window.

use backdrop_core::{FrameHandle, Host, ListenerHandle, Size};
use js_sys::Function;
use web_sys::Window;

/// `requestAnimationFrame` and the window `resize` event.
///
/// The two callbacks are JS functions whose Rust closures live in the
/// owning [`BackdropHandle`](crate::BackdropHandle).
pub struct BrowserHost {
    window: Window,
    on_frame: Function,
    on_resize: Function,
}

impl BrowserHost {
    pub fn new(window: Window, on_frame: Function, on_resize: Function) -> Self {
        Self {
            window,
            on_frame,
            on_resize,
        }
    }
}

fn css_pixels(value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>) -> u32 {
    value
        .ok()
        .and_then(|v| v.as_f64())
        .map(|px| px.max(0.0) as u32)
        .unwrap_or(0)
}

impl Host for BrowserHost {
    fn viewport(&self) -> Size {
        Size::new(
            css_pixels(self.window.inner_width()),
            css_pixels(self.window.inner_height()),
        )
    }

    fn request_frame(&mut self) -> Option<FrameHandle> {
        self.window
            .request_animation_frame(&self.on_frame)
            .ok()
            .map(FrameHandle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let _ = self.window.cancel_animation_frame(handle.0);
    }

    fn listen_resize(&mut self) -> Option<ListenerHandle> {
        self.window
            .add_event_listener_with_callback("resize", &self.on_resize)
            .ok()
            .map(|()| ListenerHandle(0))
    }

    fn unlisten_resize(&mut self, _handle: ListenerHandle) {
        let _ = self
            .window
            .remove_event_listener_with_callback("resize", &self.on_resize);
    }
}
