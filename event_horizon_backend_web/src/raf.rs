// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `requestAnimationFrame` frame source.
//!
//! [`RafLoop`] calls back once per animation frame with a [`FrameTick`]. The
//! [`DOMHighResTimeStamp`][mdn] the browser passes (milliseconds from
//! `performance.now()`) is converted to microsecond [`HostTime`] ticks.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/DOMHighResTimeStamp

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use event_horizon_core::time::{FrameTick, HostTime};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

// Direct global bindings instead of `web_sys::Window` methods; avoids
// fetching (and unwrapping) the Window/Performance objects on every frame.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

type RafClosure = Closure<dyn FnMut(f64)>;

/// A `requestAnimationFrame` loop that emits [`FrameTick`]s.
///
/// The loop re-registers itself each frame until [`stop`](Self::stop) is
/// called or the `RafLoop` is dropped. It can be restarted; the frame
/// counter keeps counting across restarts.
pub struct RafLoop {
    inner: Rc<RafInner>,
}

struct RafInner {
    /// Created on the first `start()` and reused afterwards, so it can
    /// re-register itself without touching `callback`.
    closure: RefCell<Option<RafClosure>>,
    callback: RefCell<Box<dyn FnMut(FrameTick)>>,
    frame_counter: Cell<u64>,
    running: Cell<bool>,
    /// Id of the most recent `requestAnimationFrame` call.
    raf_id: Cell<i32>,
}

impl RafInner {
    fn request(&self) {
        if let Some(closure) = &*self.closure.borrow() {
            self.raf_id
                .set(request_animation_frame(closure.as_ref().unchecked_ref()));
        }
    }
}

impl RafLoop {
    /// Creates a loop that is **not yet running**.
    pub fn new(callback: impl FnMut(FrameTick) + 'static) -> Self {
        Self {
            inner: Rc::new(RafInner {
                closure: RefCell::new(None),
                callback: RefCell::new(Box::new(callback)),
                frame_counter: Cell::new(0),
                running: Cell::new(false),
                raf_id: Cell::new(0),
            }),
        }
    }

    /// Requests the first frame. No-op if already running.
    pub fn start(&self) {
        if self.inner.running.replace(true) {
            return;
        }

        if self.inner.closure.borrow().is_none() {
            // The closure holds a weak reference: the loop owns the closure,
            // not the other way around.
            let weak = Rc::downgrade(&self.inner);
            let closure = Closure::wrap(Box::new(move |timestamp_ms: f64| {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                if !inner.running.get() {
                    return;
                }

                let frame_index = inner.frame_counter.get();
                inner.frame_counter.set(frame_index + 1);
                let tick = FrameTick {
                    now: HostTime::from_millis_f64(timestamp_ms),
                    frame_index,
                };
                inner.callback.borrow_mut()(tick);

                if inner.running.get() {
                    inner.request();
                }
            }) as Box<dyn FnMut(f64)>);
            *self.inner.closure.borrow_mut() = Some(closure);
        }

        self.inner.request();
    }

    /// Cancels the pending frame. Can be restarted with
    /// [`start`](Self::start).
    pub fn stop(&self) {
        if !self.inner.running.replace(false) {
            return;
        }
        cancel_animation_frame(self.inner.raf_id.get());
    }

    /// Returns `true` if the loop is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

impl core::fmt::Debug for RafLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RafLoop")
            .field("running", &self.inner.running.get())
            .field("frame_counter", &self.inner.frame_counter.get())
            .finish_non_exhaustive()
    }
}
