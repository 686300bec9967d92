// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory page: elements laid out in document space, a scrollable
//! viewport, threshold observers that diff intersection state on demand, and
//! a scroll loop that only records whether it is running.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use event_horizon_core::host::{
    Backend, HostElement, ObserverSet, ScrollLoop, Viewport, VisibilityEntry,
};
use event_horizon_core::id::NodeId;
use event_horizon_core::threshold::Thresholds;
use kurbo::Rect;

const PAGE_WIDTH: f64 = 1024.0;

/// Scroll offset and viewport height, shared by every element on the page.
#[derive(Clone, Debug)]
pub(crate) struct Page {
    scroll_y: Rc<Cell<f64>>,
    height: Rc<Cell<f64>>,
}

impl Page {
    pub(crate) fn new(viewport_height: f64) -> Self {
        Self {
            scroll_y: Rc::new(Cell::new(0.0)),
            height: Rc::new(Cell::new(viewport_height)),
        }
    }

    pub(crate) fn viewport(&self) -> Viewport {
        Viewport::new(self.scroll_y.get(), self.height.get())
    }

    pub(crate) fn scroll_to(&self, scroll_y: f64) {
        self.scroll_y.set(scroll_y);
    }

    pub(crate) fn resize(&self, height: f64) {
        self.height.set(height);
    }

    /// Places an element at `top` in document space.
    pub(crate) fn element(&self, name: &'static str, top: f64, height: f64) -> SimElement {
        SimElement(Rc::new(ElementState {
            name,
            top,
            height,
            page: self.clone(),
            uid: Cell::new(None),
            classes: RefCell::new(Vec::new()),
            styles: RefCell::new(Vec::new()),
        }))
    }
}

#[derive(Debug)]
struct ElementState {
    name: &'static str,
    top: f64,
    height: f64,
    page: Page,
    uid: Cell<Option<NodeId>>,
    classes: RefCell<Vec<String>>,
    styles: RefCell<Vec<(String, String)>>,
}

/// A page element. Clones share state and compare by identity.
#[derive(Clone, Debug)]
pub(crate) struct SimElement(Rc<ElementState>);

impl SimElement {
    pub(crate) fn name(&self) -> &'static str {
        self.0.name
    }

    pub(crate) fn classes(&self) -> Vec<String> {
        self.0.classes.borrow().clone()
    }

    pub(crate) fn style(&self, property: &str) -> Option<String> {
        self.0
            .styles
            .borrow()
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.clone())
    }
}

impl PartialEq for SimElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl HostElement for SimElement {
    fn node_id(&self) -> Option<NodeId> {
        self.0.uid.get()
    }

    fn set_node_id(&self, id: NodeId) {
        self.0.uid.set(Some(id));
    }

    fn bounding_rect(&self) -> Rect {
        let y = self.0.top - self.0.page.scroll_y.get();
        Rect::new(0.0, y, PAGE_WIDTH, y + self.0.height)
    }

    fn add_class(&self, class: &str) {
        let mut classes = self.0.classes.borrow_mut();
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_owned());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.classes.borrow_mut().retain(|c| c != class);
    }

    fn set_style(&self, property: &str, value: &str) {
        let mut styles = self.0.styles.borrow_mut();
        match styles.iter_mut().find(|(p, _)| p == property) {
            Some((_, v)) => value.clone_into(v),
            None => styles.push((property.to_owned(), value.to_owned())),
        }
    }
}

#[derive(Debug)]
struct Watch {
    element: SimElement,
    intersecting: Option<bool>,
}

#[derive(Debug)]
struct ObserverState {
    page: Page,
    percents: Vec<f64>,
    watched: Vec<Vec<Watch>>,
}

/// One simulated observer per threshold.
///
/// The root of threshold `t` is the viewport with its bottom pulled up by
/// `t` percent, the same box the browser observers use. Like the browser,
/// a freshly observed element reports its state on the next sample.
#[derive(Clone, Debug)]
pub(crate) struct SimObservers(Rc<RefCell<ObserverState>>);

impl SimObservers {
    pub(crate) fn new(thresholds: &Thresholds, page: Page) -> Self {
        let percents: Vec<f64> = thresholds.iter().map(|(_, p)| p).collect();
        let watched = percents.iter().map(|_| Vec::new()).collect();
        Self(Rc::new(RefCell::new(ObserverState {
            page,
            percents,
            watched,
        })))
    }

    /// Returns the visibility changes since the previous sample, grouped by
    /// threshold index.
    pub(crate) fn sample(&self) -> Vec<(usize, Vec<VisibilityEntry<SimElement>>)> {
        let mut state = self.0.borrow_mut();
        let height = state.page.height.get();
        let percents = state.percents.clone();
        let mut batches = Vec::new();
        for (index, watched) in state.watched.iter_mut().enumerate() {
            let root_bottom = height * (1.0 - percents[index] / 100.0);
            let mut entries = Vec::new();
            for watch in watched.iter_mut() {
                let rect = watch.element.bounding_rect();
                let intersecting = rect.y1 > 0.0 && rect.y0 < root_bottom;
                if watch.intersecting != Some(intersecting) {
                    watch.intersecting = Some(intersecting);
                    entries.push(VisibilityEntry {
                        target: watch.element.clone(),
                        is_intersecting: intersecting,
                        bounding_rect: rect,
                    });
                }
            }
            if !entries.is_empty() {
                batches.push((index, entries));
            }
        }
        batches
    }
}

impl ObserverSet<SimElement> for SimObservers {
    fn observe(&mut self, threshold: usize, element: &SimElement) {
        let mut state = self.0.borrow_mut();
        if let Some(watched) = state.watched.get_mut(threshold)
            && !watched.iter().any(|w| &w.element == element)
        {
            watched.push(Watch {
                element: element.clone(),
                intersecting: None,
            });
        }
    }

    fn unobserve(&mut self, threshold: usize, element: &SimElement) {
        let mut state = self.0.borrow_mut();
        if let Some(watched) = state.watched.get_mut(threshold) {
            watched.retain(|w| &w.element != element);
        }
    }
}

/// Scroll loop that only tracks whether it is running. The simulation feeds
/// scroll and frame events itself while it is.
#[derive(Clone, Debug, Default)]
pub(crate) struct SimLoop(Rc<Cell<bool>>);

impl SimLoop {
    pub(crate) fn is_running(&self) -> bool {
        self.0.get()
    }
}

impl ScrollLoop for SimLoop {
    fn start(&mut self) {
        self.0.set(true);
    }

    fn stop(&mut self) {
        self.0.set(false);
    }
}

/// The simulated host.
#[derive(Debug)]
pub(crate) enum SimBackend {}

impl Backend for SimBackend {
    type Element = SimElement;
    type Observers = SimObservers;
    type Loop = SimLoop;
    type Callback = &'static str;
}
