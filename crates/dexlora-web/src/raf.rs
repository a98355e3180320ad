#![forbid(unsafe_code)]

//! `requestAnimationFrame` loop.
//!
//! [`RafLoop`] calls its callback once per animation frame. The callback
//! returns whether another frame is wanted; returning `false` parks the loop
//! until [`start`](RafLoop::start) is called again.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type RafClosure = Closure<dyn FnMut(f64)>;

/// Self-parking animation loop.
#[derive(Clone)]
pub struct RafLoop {
    inner: Rc<RafInner>,
}

struct RafInner {
    closure: RefCell<Option<RafClosure>>,
    callback: RefCell<Box<dyn FnMut() -> bool>>,
    running: Cell<bool>,
    raf_id: Cell<i32>,
}

impl RafLoop {
    /// Create a parked loop.
    pub fn new(callback: impl FnMut() -> bool + 'static) -> Self {
        let inner = Rc::new(RafInner {
            closure: RefCell::new(None),
            callback: RefCell::new(Box::new(callback)),
            running: Cell::new(false),
            raf_id: Cell::new(0),
        });
        let weak = Rc::downgrade(&inner);
        let closure = Closure::wrap(Box::new(move |_timestamp_ms: f64| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if !inner.running.get() {
                return;
            }
            // Scoped so the callback borrow ends before re-registering.
            let again = {
                let mut callback = inner.callback.borrow_mut();
                (*callback)()
            };

            if again && inner.running.get() {
                if let Some(ref closure) = *inner.closure.borrow() {
                    inner
                        .raf_id
                        .set(request_animation_frame(closure.as_ref().unchecked_ref()));
                }
            } else {
                inner.running.set(false);
            }
        }) as Box<dyn FnMut(f64)>);
        *inner.closure.borrow_mut() = Some(closure);
        Self { inner }
    }

    /// Schedule the next frame. No-op while already running.
    pub fn start(&self) {
        if self.inner.running.replace(true) {
            return;
        }
        if let Some(ref closure) = *self.inner.closure.borrow() {
            self.inner
                .raf_id
                .set(request_animation_frame(closure.as_ref().unchecked_ref()));
        }
    }

    /// Cancel the pending frame, if any.
    pub fn stop(&self) {
        if !self.inner.running.replace(false) {
            return;
        }
        cancel_animation_frame(self.inner.raf_id.get());
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Stop and release the JS closure.
    pub fn dispose(&self) {
        self.stop();
        self.inner.closure.borrow_mut().take();
    }
}

impl std::fmt::Debug for RafLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RafLoop")
            .field("running", &self.inner.running.get())
            .finish()
    }
}
