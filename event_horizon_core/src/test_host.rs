// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory host used by the unit tests.

use alloc::borrow::ToOwned as _;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use kurbo::Rect;

use crate::host::{Backend, HostElement, ObserverSet, ScrollLoop};
use crate::id::NodeId;

#[derive(Debug, Default)]
struct ElementState {
    name: &'static str,
    uid: Option<NodeId>,
    rect: Rect,
    classes: Vec<String>,
    styles: Vec<(String, String)>,
    style_writes: Vec<String>,
}

/// A shared, recording element. Clones refer to the same element.
#[derive(Clone, Debug)]
pub(crate) struct FakeElement(Rc<RefCell<ElementState>>);

impl FakeElement {
    pub(crate) fn new(name: &'static str, rect: Rect) -> Self {
        Self(Rc::new(RefCell::new(ElementState {
            name,
            rect,
            ..ElementState::default()
        })))
    }

    pub(crate) fn name(&self) -> &'static str {
        self.0.borrow().name
    }

    pub(crate) fn rect(&self) -> Rect {
        self.0.borrow().rect
    }

    pub(crate) fn set_rect(&self, rect: Rect) {
        self.0.borrow_mut().rect = rect;
    }

    pub(crate) fn classes(&self) -> Vec<String> {
        self.0.borrow().classes.clone()
    }

    pub(crate) fn clear_classes(&self) {
        self.0.borrow_mut().classes.clear();
    }

    pub(crate) fn style(&self, property: &str) -> Option<String> {
        self.0
            .borrow()
            .styles
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.clone())
    }

    /// Number of writes to `property` so far.
    pub(crate) fn style_writes(&self, property: &str) -> usize {
        self.0
            .borrow()
            .style_writes
            .iter()
            .filter(|p| *p == property)
            .count()
    }
}

impl PartialEq for FakeElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl HostElement for FakeElement {
    fn node_id(&self) -> Option<NodeId> {
        self.0.borrow().uid
    }

    fn set_node_id(&self, id: NodeId) {
        self.0.borrow_mut().uid = Some(id);
    }

    fn bounding_rect(&self) -> Rect {
        self.0.borrow().rect
    }

    fn add_class(&self, class: &str) {
        let mut state = self.0.borrow_mut();
        if !state.classes.iter().any(|c| c == class) {
            state.classes.push(class.to_owned());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    fn set_style(&self, property: &str, value: &str) {
        let mut state = self.0.borrow_mut();
        state.style_writes.push(property.to_owned());
        match state.styles.iter_mut().find(|(p, _)| p == property) {
            Some((_, v)) => value.clone_into(v),
            None => state.styles.push((property.to_owned(), value.to_owned())),
        }
    }
}

/// Records which (threshold, element) pairs are attached.
#[derive(Debug, Default)]
pub(crate) struct FakeObservers {
    attached: Vec<(usize, FakeElement)>,
}

impl FakeObservers {
    pub(crate) fn is_observing(&self, threshold: usize, element: &FakeElement) -> bool {
        self.attached
            .iter()
            .any(|(t, e)| *t == threshold && e == element)
    }

    /// Total number of attachments.
    pub(crate) fn len(&self) -> usize {
        self.attached.len()
    }
}

impl ObserverSet<FakeElement> for FakeObservers {
    fn observe(&mut self, threshold: usize, element: &FakeElement) {
        if !self.is_observing(threshold, element) {
            self.attached.push((threshold, element.clone()));
        }
    }

    fn unobserve(&mut self, threshold: usize, element: &FakeElement) {
        self.attached
            .retain(|(t, e)| !(*t == threshold && e == element));
    }
}

#[derive(Debug, Default)]
struct LoopState {
    running: bool,
    starts: u32,
    stops: u32,
}

/// A loop that only counts starts and stops. Clones share state.
#[derive(Clone, Debug, Default)]
pub(crate) struct FakeLoop(Rc<RefCell<LoopState>>);

impl FakeLoop {
    pub(crate) fn is_running(&self) -> bool {
        self.0.borrow().running
    }

    pub(crate) fn starts(&self) -> u32 {
        self.0.borrow().starts
    }

    pub(crate) fn stops(&self) -> u32 {
        self.0.borrow().stops
    }
}

impl ScrollLoop for FakeLoop {
    fn start(&mut self) {
        let mut state = self.0.borrow_mut();
        state.running = true;
        state.starts += 1;
    }

    fn stop(&mut self) {
        let mut state = self.0.borrow_mut();
        state.running = false;
        state.stops += 1;
    }
}

#[derive(Debug)]
pub(crate) enum FakeBackend {}

impl Backend for FakeBackend {
    type Element = FakeElement;
    type Observers = FakeObservers;
    type Loop = FakeLoop;
    type Callback = &'static str;
}
