// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One `IntersectionObserver` per threshold.
//!
//! Observer `i` shrinks the viewport's bottom edge by threshold `i`'s
//! percentage through its root margin, so an element "intersects" it once
//! its top has scrolled that far up the viewport.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;

use event_horizon_core::host::{ObserverSet, VisibilityEntry};
use event_horizon_core::threshold::Thresholds;
use kurbo::Rect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use crate::element::DomElement;

type ObserverClosure = Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>;

/// The threshold observers and the closures they call.
///
/// Observers are disconnected on drop.
pub struct ThresholdObservers {
    observers: Vec<IntersectionObserver>,
    /// Kept alive for as long as the observers may call them.
    _closures: Vec<ObserverClosure>,
}

impl core::fmt::Debug for ThresholdObservers {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ThresholdObservers")
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl ThresholdObservers {
    /// Creates one observer per threshold. Each batch of entries is handed to
    /// `on_change` together with the threshold index.
    ///
    /// # Errors
    ///
    /// Returns the browser's exception if an observer cannot be constructed.
    pub fn new(
        thresholds: &Thresholds,
        on_change: impl Fn(usize, Vec<VisibilityEntry<DomElement>>) + 'static,
    ) -> Result<Self, JsValue> {
        let on_change = Rc::new(on_change);
        let mut observers = Vec::with_capacity(thresholds.len());
        let mut closures = Vec::with_capacity(thresholds.len());

        for (index, percent) in thresholds.iter() {
            let on_change = Rc::clone(&on_change);
            let closure = Closure::wrap(Box::new(
                move |entries: js_sys::Array, _observer: IntersectionObserver| {
                    on_change(index, collect_entries(&entries));
                },
            )
                as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

            let init = IntersectionObserverInit::new();
            init.set_root_margin(&event_horizon_core::threshold::root_margin(percent));
            let observer =
                IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init)?;

            observers.push(observer);
            closures.push(closure);
        }

        Ok(Self {
            observers,
            _closures: closures,
        })
    }
}

impl ObserverSet<DomElement> for ThresholdObservers {
    fn observe(&mut self, threshold: usize, element: &DomElement) {
        if let Some(observer) = self.observers.get(threshold) {
            observer.observe(element.as_html());
        }
    }

    fn unobserve(&mut self, threshold: usize, element: &DomElement) {
        if let Some(observer) = self.observers.get(threshold) {
            observer.unobserve(element.as_html());
        }
    }
}

impl Drop for ThresholdObservers {
    fn drop(&mut self) {
        for observer in &self.observers {
            observer.disconnect();
        }
    }
}

fn collect_entries(entries: &js_sys::Array) -> Vec<VisibilityEntry<DomElement>> {
    entries
        .iter()
        .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
        .filter_map(|entry| {
            let target = entry.target().dyn_into::<HtmlElement>().ok()?;
            let r = entry.bounding_client_rect();
            Some(VisibilityEntry {
                target: DomElement::new(target),
                is_intersecting: entry.is_intersecting(),
                bounding_rect: Rect::new(r.left(), r.top(), r.right(), r.bottom()),
            })
        })
        .collect()
}
