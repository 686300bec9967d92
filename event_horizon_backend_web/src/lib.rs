// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Browser backend for event horizon.
//!
//! This crate implements the `event_horizon_core` host contract with
//! browser APIs and exposes it to JavaScript:
//!
//! - [`DomElement`]: `HtmlElement` handle (class list, inline style, uid
//!   attribute, bounding box)
//! - [`ThresholdObservers`]: one `IntersectionObserver` per threshold
//! - [`WindowLoop`]: passive `scroll`/`resize` listeners plus a [`RafLoop`]
//! - [`parse_options`]: JSON directive options
//! - [`ConsoleSink`]: `console.log` trace sink
//! - [`EventHorizonHandle`]: the `wasm-bindgen` surface a binder drives
//!
//! ```js
//! const horizon = new EventHorizonHandle();
//! horizon.observeTrigger(el, (el, visible) => {}, 50, false, false);
//! horizon.observeParallax(hero, '{"y": {"from": 0, "to": -100}}');
//! ```

#![no_std]

extern crate alloc;

mod console;
mod element;
mod handle;
mod listeners;
mod observers;
mod options;
mod raf;
mod timer;

pub use console::ConsoleSink;
pub use element::DomElement;
pub use handle::{EventHorizonHandle, WebBackend, supports_intersection_observer};
pub use listeners::WindowLoop;
pub use observers::ThresholdObservers;
pub use options::{OptionsError, ParsedOptions, parse_options};
pub use raf::RafLoop;

use event_horizon_core::time::HostTime;

/// Returns the current host time from `performance.now()`.
#[must_use]
pub fn now() -> HostTime {
    HostTime::from_millis_f64(raf::performance_now())
}
