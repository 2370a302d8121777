#![deny(unsafe_code)]
//! Browser bindings: run a backdrop full-window on a `<canvas>`.
//!
//! ```js
//! const handle = BackdropHandle.start(canvas, "neural", 42, "{}");
//! // on unmount
//! handle.stop();
//! ```
//!
//! Starting never throws. If the canvas has no 2D context, the field name is
//! unknown or the frame loop cannot be scheduled, the error is logged and the
//! returned handle is inert.

mod console;
mod host;
mod surface;

pub use host::BrowserHost;
pub use surface::CanvasSurface;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use backdrop_core::{Backdrop, BackdropError, ParticleField};
use backdrop_fields::FieldKind;
use tracing::{error, info};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlCanvasElement;

type Running = Backdrop<CanvasSurface, BrowserHost>;
type Slot = Rc<RefCell<Option<Running>>>;

/// A running (or inert) backdrop owned by JS.
#[wasm_bindgen]
pub struct BackdropHandle {
    // Dropped first: stopping cancels the frame and removes the listener
    // while the closures below are still alive.
    backdrop: Slot,
    _on_frame: Option<Closure<dyn FnMut()>>,
    _on_resize: Option<Closure<dyn FnMut()>>,
}

fn with_backdrop(slot: &Weak<RefCell<Option<Running>>>, f: impl FnOnce(&mut Running)) {
    let Some(slot) = slot.upgrade() else {
        return;
    };
    let Ok(mut guard) = slot.try_borrow_mut() else {
        return;
    };
    if let Some(backdrop) = guard.as_mut() {
        f(backdrop);
    }
}

#[wasm_bindgen]
impl BackdropHandle {
    /// Starts `field` ("circuit" or "neural") on `canvas`, sized to the window.
    ///
    /// `params` is a JSON object of parameter overrides; malformed JSON is
    /// treated as `{}`.
    pub fn start(
        canvas: HtmlCanvasElement,
        field: &str,
        seed: u32,
        params: &str,
    ) -> BackdropHandle {
        console::init();
        let slot: Slot = Rc::new(RefCell::new(None));

        let weak = Rc::downgrade(&slot);
        let on_frame = Closure::wrap(Box::new(move || {
            with_backdrop(&weak, |b| {
                b.frame();
            });
        }) as Box<dyn FnMut()>);

        let weak = Rc::downgrade(&slot);
        let on_resize = Closure::wrap(Box::new(move || {
            with_backdrop(&weak, |b| b.on_resize());
        }) as Box<dyn FnMut()>);

        let params = serde_json::from_str(params).unwrap_or_else(|e| {
            error!(%e, "invalid params JSON, using defaults");
            serde_json::json!({})
        });

        let started = (|| -> Result<_, BackdropError> {
            let window = web_sys::window().ok_or(BackdropError::FrameLoopUnavailable)?;
            let surface = CanvasSurface::acquire(canvas)?;
            let field = FieldKind::from_name(field, u64::from(seed), &params)?;
            let host = BrowserHost::new(
                window,
                on_frame.as_ref().unchecked_ref::<js_sys::Function>().clone(),
                on_resize.as_ref().unchecked_ref::<js_sys::Function>().clone(),
            );
            Backdrop::start(surface, host, Box::new(field))
        })();

        match started {
            Ok(backdrop) => {
                info!(field, "backdrop running");
                *slot.borrow_mut() = Some(backdrop);
                BackdropHandle {
                    backdrop: slot,
                    _on_frame: Some(on_frame),
                    _on_resize: Some(on_resize),
                }
            }
            Err(e) => {
                error!(%e, field, "backdrop not started");
                BackdropHandle {
                    backdrop: slot,
                    _on_frame: None,
                    _on_resize: None,
                }
            }
        }
    }

    /// Cancels the frame loop and the resize listener. Safe to call twice.
    pub fn stop(&self) {
        if let Ok(mut guard) = self.backdrop.try_borrow_mut() {
            if let Some(mut backdrop) = guard.take() {
                backdrop.stop();
            }
        }
    }

    #[wasm_bindgen(js_name = isRunning)]
    pub fn is_running(&self) -> bool {
        self.backdrop
            .try_borrow()
            .map(|b| b.as_ref().is_some_and(|b| b.is_running()))
            .unwrap_or(false)
    }

    #[wasm_bindgen(js_name = framesRendered)]
    pub fn frames_rendered(&self) -> f64 {
        self.backdrop
            .try_borrow()
            .ok()
            .and_then(|b| b.as_ref().map(|b| b.frames_rendered() as f64))
            .unwrap_or(0.0)
    }

    /// Live particle count, or nodes plus signals.
    pub fn population(&self) -> usize {
        self.backdrop
            .try_borrow()
            .ok()
            .and_then(|b| b.as_ref().map(|b| b.field().population()))
            .unwrap_or(0)
    }
}

/// Names accepted by [`BackdropHandle::start`].
#[wasm_bindgen(js_name = listFields)]
pub fn list_fields() -> Vec<String> {
    FieldKind::list_fields()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Parameter schema for a field as JSON text, or `null` for an unknown name.
#[wasm_bindgen(js_name = paramSchema)]
pub fn param_schema(field: &str) -> Option<String> {
    let field = FieldKind::from_name(field, 0, &serde_json::json!({})).ok()?;
    serde_json::to_string(&field.param_schema()).ok()
}
