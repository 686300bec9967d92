// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The JavaScript-facing binder surface.
//!
//! [`EventHorizonHandle`] owns an [`EventHorizon`] over the browser backend
//! and wires every browser callback (observers, listeners, timers, animation
//! frames) back into it. All callbacks hold weak references, so dropping the
//! handle (`handle.free()` from JS) tears everything down: listeners are
//! removed, the frame request and timers are cancelled, and observers
//! disconnect.
//!
//! Node ids cross the boundary as strings, the same text the
//! `data-event-horizon-uid` attribute carries.

use alloc::rc::{Rc, Weak};
use alloc::string::{String, ToString as _};
use alloc::vec::Vec;
use core::cell::RefCell;

use event_horizon_core::horizon::{EventHorizon, HorizonConfig, Registration, UpdateOutcome};
use event_horizon_core::host::{Backend, Viewport, VisibilityEntry};
use event_horizon_core::id::NodeId;
use event_horizon_core::options::Modifiers;
use event_horizon_core::threshold::{MAX_EVENT_HORIZONS, Thresholds};
use event_horizon_core::trace::Tracer;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlElement, Window};

use crate::console::{self, ConsoleSink};
use crate::element::DomElement;
use crate::listeners::WindowLoop;
use crate::observers::ThresholdObservers;
use crate::options::{ParsedOptions, parse_options};
use crate::timer::Timer;

/// The browser types an [`EventHorizon`] runs over.
#[derive(Debug)]
pub struct WebBackend;

impl Backend for WebBackend {
    type Element = DomElement;
    type Observers = ThresholdObservers;
    type Loop = WindowLoop;
    type Callback = js_sys::Function;
}

/// State shared between the handle and the browser callbacks.
struct Shared {
    window: Window,
    /// Filled in right after construction, once the callbacks that need a
    /// weak reference to `Shared` exist.
    horizon: RefCell<Option<EventHorizon<WebBackend>>>,
    debug: RefCell<Option<ConsoleSink>>,
    scroll_timer: Timer,
    resize_timer: Timer,
}

impl Shared {
    /// Runs `f` with the context borrowed. User callbacks must not be
    /// invoked from inside `f`.
    fn with_horizon<R>(
        &self,
        f: impl FnOnce(&mut EventHorizon<WebBackend>, &mut Tracer<'_>) -> R,
    ) -> Option<R> {
        let mut horizon = self.horizon.borrow_mut();
        let horizon = horizon.as_mut()?;
        let mut debug = self.debug.borrow_mut();
        let mut tracer = match debug.as_mut() {
            Some(sink) => Tracer::new(sink),
            None => Tracer::none(),
        };
        Some(f(horizon, &mut tracer))
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(
            self.window.scroll_y().unwrap_or(0.0),
            self.window
                .inner_height()
                .ok()
                .and_then(|h| h.as_f64())
                .unwrap_or(0.0),
        )
    }

    fn visibility_changed(&self, threshold: usize, entries: Vec<VisibilityEntry<DomElement>>) {
        let notifications = self
            .with_horizon(|h, tracer| h.on_visibility_change(threshold, entries, tracer))
            .unwrap_or_default();
        // The borrow is released; callbacks may call back into the handle.
        for n in notifications {
            let _ = n.callback.call2(
                &JsValue::NULL,
                n.element.as_html(),
                &JsValue::from_bool(n.visible),
            );
        }
    }

    fn scrolled(&self) {
        let now = crate::now();
        let viewport = self.viewport();
        if let Some(Some(deadline)) =
            self.with_horizon(|h, tracer| h.on_scroll(now, viewport, tracer))
        {
            self.scroll_timer.arm(deadline.saturating_duration_since(now));
        }
    }

    fn scroll_timer_fired(&self) {
        self.scroll_timer.fired();
        let _ = self.with_horizon(|h, tracer| h.on_scroll_timer(tracer));
    }

    fn resized(&self) {
        let now = crate::now();
        if let Some(Some(deadline)) = self.with_horizon(|h, _| h.on_resize(now)) {
            self.resize_timer.arm(deadline.saturating_duration_since(now));
        }
    }

    fn resize_timer_fired(&self) {
        self.resize_timer.fired();
        let viewport = self.viewport();
        let _ = self.with_horizon(|h, tracer| h.on_resize_timer(viewport, tracer));
    }
}

/// Wraps a `Shared` method in a closure that holds only a weak reference.
fn weak_callback(weak: &Weak<Shared>, f: fn(&Shared)) -> impl FnMut() + 'static {
    let weak = weak.clone();
    move || {
        if let Some(shared) = weak.upgrade() {
            f(&shared);
        }
    }
}

fn parse_id(id: &str) -> Option<NodeId> {
    id.parse().ok()
}

/// Returns `true` if the browser provides a complete native
/// `IntersectionObserver`.
#[wasm_bindgen(js_name = supportsIntersectionObserver)]
#[must_use]
pub fn supports_intersection_observer() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    let has = |target: &JsValue, key: &str| {
        js_sys::Reflect::has(target, &JsValue::from_str(key)).unwrap_or(false)
    };
    if !has(&window, "IntersectionObserver") || !has(&window, "IntersectionObserverEntry") {
        return false;
    }
    js_sys::Reflect::get(&window, &JsValue::from_str("IntersectionObserverEntry"))
        .and_then(|entry| js_sys::Reflect::get(&entry, &JsValue::from_str("prototype")))
        .is_ok_and(|prototype| has(&prototype, "intersectionRatio"))
}

/// Tracks trigger and parallax elements on the current page.
#[wasm_bindgen]
pub struct EventHorizonHandle {
    shared: Rc<Shared>,
}

impl core::fmt::Debug for EventHorizonHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventHorizonHandle")
            .field("debug", &self.shared.debug.try_borrow().is_ok_and(|d| d.is_some()))
            .finish_non_exhaustive()
    }
}

#[wasm_bindgen]
impl EventHorizonHandle {
    /// Creates a handle with five evenly spaced thresholds.
    ///
    /// # Errors
    ///
    /// Fails without a global window or without native
    /// `IntersectionObserver` support.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Self, JsValue> {
        Self::build(HorizonConfig::web())
    }

    /// Creates a handle with `event_horizons` evenly spaced thresholds.
    ///
    /// # Errors
    ///
    /// Fails if the count is outside `1..=64`, or for the reasons
    /// [`new`](Self::new) fails.
    #[wasm_bindgen(js_name = withEventHorizons)]
    pub fn with_event_horizons(event_horizons: u32) -> Result<Self, JsValue> {
        let count = event_horizons as usize;
        if !(1..=MAX_EVENT_HORIZONS).contains(&count) {
            return Err(JsValue::from_str(&alloc::format!(
                "event horizon count must be within 1..={MAX_EVENT_HORIZONS}, got {count}"
            )));
        }
        Self::build(HorizonConfig::web().with_event_horizons(count))
    }

    /// Registers a trigger element and returns its id.
    ///
    /// `callback(element, visible)` is called with `true` when the element
    /// crosses the callback threshold and with `false` when it leaves the
    /// baseline threshold. The threshold is `callback_threshold` if given,
    /// else the `callback_threshold` of `options_json`, else 0.
    ///
    /// # Errors
    ///
    /// Fails if `options_json` is present but not a valid options object.
    #[wasm_bindgen(js_name = observeTrigger)]
    pub fn observe_trigger(
        &self,
        element: HtmlElement,
        callback: Option<js_sys::Function>,
        callback_threshold: Option<f64>,
        once: bool,
        cleanup: bool,
        options_json: Option<String>,
    ) -> Result<String, JsValue> {
        let parsed = match options_json {
            Some(json) => parse_options(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => ParsedOptions::default(),
        };
        let mut registration = Registration::trigger(DomElement::new(element))
            .with_modifiers(Modifiers { once, cleanup });
        if let Some(callback) = callback {
            let threshold = parsed.effective_callback_threshold(callback_threshold);
            registration = registration.with_callback(callback, threshold);
        }
        let viewport = self.shared.viewport();
        Ok(self
            .shared
            .with_horizon(|h, tracer| h.register(registration, viewport, tracer))
            .map(|id| id.to_string())
            .unwrap_or_default())
    }

    /// Registers a parallax element with JSON options and returns its id.
    ///
    /// # Errors
    ///
    /// Fails if `options_json` is not a valid options object.
    #[wasm_bindgen(js_name = observeParallax)]
    pub fn observe_parallax(
        &self,
        element: HtmlElement,
        options_json: &str,
    ) -> Result<String, JsValue> {
        let parsed = parse_options(options_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let registration = Registration::parallax(DomElement::new(element), parsed.options);
        let viewport = self.shared.viewport();
        Ok(self
            .shared
            .with_horizon(|h, tracer| h.register(registration, viewport, tracer))
            .map(|id| id.to_string())
            .unwrap_or_default())
    }

    /// The binder's update hook. Equal options do nothing, absent options
    /// unregister, changed parallax options apply in place. Returns `true`
    /// if the registration changed.
    ///
    /// # Errors
    ///
    /// Fails if `options_json` is present but not a valid options object.
    pub fn update(&self, id: &str, options_json: Option<String>) -> Result<bool, JsValue> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };
        let options = match options_json {
            Some(json) => Some(
                parse_options(&json)
                    .map_err(|e| JsValue::from_str(&e.to_string()))?
                    .options,
            ),
            None => None,
        };
        let viewport = self.shared.viewport();
        let outcome = self
            .shared
            .with_horizon(|h, tracer| h.update(id, options, viewport, tracer));
        if outcome == Some(UpdateOutcome::Unregistered) {
            self.cancel_idle_timers();
        }
        Ok(matches!(
            outcome,
            Some(UpdateOutcome::Reconfigured | UpdateOutcome::Unregistered)
        ))
    }

    /// Unregisters a node. Classes already applied stay on the element.
    /// Returns `false` for an unknown id.
    pub fn unobserve(&self, id: &str) -> bool {
        let Some(id) = parse_id(id) else {
            return false;
        };
        let removed = self
            .shared
            .with_horizon(|h, tracer| h.unregister(id, tracer))
            .unwrap_or(false);
        self.cancel_idle_timers();
        removed
    }

    /// Re-adds the threshold classes a trigger node currently has applied.
    #[wasm_bindgen(js_name = restoreClasses)]
    pub fn restore_classes(&self, id: &str) -> bool {
        parse_id(id)
            .and_then(|id| self.shared.with_horizon(|h, _| h.restore_classes(id)))
            .unwrap_or(false)
    }

    /// Turns console logging on or off. With `verbose`, progress and frame
    /// events are logged too.
    #[wasm_bindgen(js_name = setDebug)]
    pub fn set_debug(&self, enabled: bool, verbose: Option<bool>) {
        let mut debug = self.shared.debug.borrow_mut();
        if console::toggle(&mut debug, enabled, verbose.unwrap_or(false)) {
            console::log("using native intersection support");
        }
    }
}

impl EventHorizonHandle {
    fn build(config: HorizonConfig) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        if !supports_intersection_observer() {
            return Err(JsValue::from_str("IntersectionObserver is not supported"));
        }

        let shared = Rc::new_cyclic(|weak: &Weak<Shared>| Shared {
            window: window.clone(),
            horizon: RefCell::new(None),
            debug: RefCell::new(None),
            scroll_timer: Timer::new(weak_callback(weak, Shared::scroll_timer_fired)),
            resize_timer: Timer::new(weak_callback(weak, Shared::resize_timer_fired)),
        });
        let weak = Rc::downgrade(&shared);

        let thresholds = Thresholds::evenly_spaced(config.event_horizons);
        let observers = ThresholdObservers::new(&thresholds, {
            let weak = weak.clone();
            move |index, entries| {
                if let Some(shared) = weak.upgrade() {
                    shared.visibility_changed(index, entries);
                }
            }
        })?;
        let scroll_loop = WindowLoop::new(
            window,
            weak_callback(&weak, Shared::scrolled),
            weak_callback(&weak, Shared::resized),
            {
                let weak = weak.clone();
                move |tick| {
                    if let Some(shared) = weak.upgrade() {
                        let _ = shared.with_horizon(|h, tracer| h.on_frame(tick, tracer));
                    }
                }
            },
        );

        *shared.horizon.borrow_mut() = Some(EventHorizon::new(config, observers, scroll_loop));
        Ok(Self { shared })
    }

    fn cancel_idle_timers(&self) {
        let idle = self
            .shared
            .with_horizon(|h, _| h.parallax().is_empty())
            .unwrap_or(true);
        if idle {
            self.shared.scroll_timer.cancel();
            self.shared.resize_timer.cancel();
        }
    }
}
