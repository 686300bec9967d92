// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM element handles.

use alloc::string::ToString as _;

use event_horizon_core::host::HostElement;
use event_horizon_core::id::{NodeId, UID_ATTRIBUTE};
use kurbo::Rect;
use web_sys::HtmlElement;

/// A tracked page element.
///
/// Compares by element identity, like the underlying `HtmlElement`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomElement(HtmlElement);

impl DomElement {
    /// Wraps an element.
    #[must_use]
    pub fn new(element: HtmlElement) -> Self {
        Self(element)
    }

    /// The wrapped element.
    #[must_use]
    pub fn as_html(&self) -> &HtmlElement {
        &self.0
    }
}

impl From<HtmlElement> for DomElement {
    fn from(element: HtmlElement) -> Self {
        Self(element)
    }
}

impl HostElement for DomElement {
    fn node_id(&self) -> Option<NodeId> {
        self.0.get_attribute(UID_ATTRIBUTE)?.parse().ok()
    }

    fn set_node_id(&self, id: NodeId) {
        let _ = self.0.set_attribute(UID_ATTRIBUTE, &id.to_string());
    }

    fn bounding_rect(&self) -> Rect {
        let r = self.0.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.right(), r.bottom())
    }

    fn add_class(&self, class: &str) {
        let _ = self.0.class_list().add_1(class);
    }

    fn remove_class(&self, class: &str) {
        let _ = self.0.class_list().remove_1(class);
    }

    fn set_style(&self, property: &str, value: &str) {
        let _ = self.0.style().set_property(property, value);
    }
}
