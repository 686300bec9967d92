// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Window listeners and the combined scroll loop.
//!
//! [`WindowLoop`] is the [`ScrollLoop`] the parallax controller starts and
//! stops: passive `scroll` and `resize` listeners on the window plus a
//! [`RafLoop`]. The listener closures are created once and kept, so the same
//! function objects can be removed again.

use alloc::boxed::Box;
use core::cell::Cell;

use event_horizon_core::host::ScrollLoop;
use event_horizon_core::time::FrameTick;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Window};

use crate::raf::RafLoop;

type ListenerClosure = Closure<dyn FnMut()>;

/// A window event listener that can be attached and detached repeatedly.
struct Listener {
    event: &'static str,
    closure: ListenerClosure,
    attached: Cell<bool>,
}

impl Listener {
    fn new(event: &'static str, handler: impl FnMut() + 'static) -> Self {
        Self {
            event,
            closure: Closure::wrap(Box::new(handler) as Box<dyn FnMut()>),
            attached: Cell::new(false),
        }
    }

    fn attach(&self, window: &Window) {
        if self.attached.replace(true) {
            return;
        }
        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
            self.event,
            self.closure.as_ref().unchecked_ref(),
            &options,
        );
    }

    fn detach(&self, window: &Window) {
        if !self.attached.replace(false) {
            return;
        }
        let _ = window
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Scroll and resize listeners plus the animation-frame loop.
pub struct WindowLoop {
    window: Window,
    scroll: Listener,
    resize: Listener,
    raf: RafLoop,
}

impl core::fmt::Debug for WindowLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WindowLoop")
            .field("listening", &self.scroll.attached.get())
            .field("raf", &self.raf)
            .finish_non_exhaustive()
    }
}

impl WindowLoop {
    /// Creates a stopped loop. Nothing is attached until
    /// [`start`](ScrollLoop::start).
    pub fn new(
        window: Window,
        on_scroll: impl FnMut() + 'static,
        on_resize: impl FnMut() + 'static,
        on_frame: impl FnMut(FrameTick) + 'static,
    ) -> Self {
        Self {
            window,
            scroll: Listener::new("scroll", on_scroll),
            resize: Listener::new("resize", on_resize),
            raf: RafLoop::new(on_frame),
        }
    }

    /// Returns `true` while listeners are attached.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.raf.is_running()
    }
}

impl ScrollLoop for WindowLoop {
    fn start(&mut self) {
        self.raf.start();
        self.resize.attach(&self.window);
        self.scroll.attach(&self.window);
    }

    fn stop(&mut self) {
        self.raf.stop();
        self.resize.detach(&self.window);
        self.scroll.detach(&self.window);
    }
}

impl Drop for WindowLoop {
    fn drop(&mut self) {
        self.stop();
    }
}
