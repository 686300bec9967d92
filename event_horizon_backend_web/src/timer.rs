// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Re-armable `setTimeout` timers for the throttle flushes.

use alloc::boxed::Box;
use core::cell::Cell;

use event_horizon_core::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = "setTimeout")]
    fn set_timeout(handler: &JsValue, timeout: i32) -> i32;

    #[wasm_bindgen(js_name = "clearTimeout")]
    fn clear_timeout(id: i32);
}

/// A one-shot timer with a fixed callback that can be re-armed.
///
/// The JS closure is created once and lives as long as the timer. Arming
/// while armed replaces the pending timeout. Dropping the timer cancels it.
pub(crate) struct Timer {
    closure: Closure<dyn FnMut()>,
    id: Cell<Option<i32>>,
}

impl Timer {
    pub(crate) fn new(callback: impl FnMut() + 'static) -> Self {
        Self {
            closure: Closure::wrap(Box::new(callback) as Box<dyn FnMut()>),
            id: Cell::new(None),
        }
    }

    /// Schedules the callback after `delay`, cancelling any pending one.
    pub(crate) fn arm(&self, delay: Duration) {
        self.cancel();
        let millis = i32::try_from(delay.as_millis_ceil()).unwrap_or(i32::MAX);
        let id = set_timeout(self.closure.as_ref(), millis);
        self.id.set(Some(id));
    }

    /// Cancels the pending timeout, if any.
    pub(crate) fn cancel(&self) {
        if let Some(id) = self.id.take() {
            clear_timeout(id);
        }
    }

    /// Marks the pending timeout as delivered. Called from the callback.
    pub(crate) fn fired(&self) {
        self.id.set(None);
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl core::fmt::Debug for Timer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Timer")
            .field("armed", &self.id.get().is_some())
            .finish_non_exhaustive()
    }
}
