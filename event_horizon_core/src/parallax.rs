// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-driven style interpolation.
//!
//! The [`ParallaxController`] keeps a flat list of nodes, each with a scroll
//! range `[range_from, range_to]` in document coordinates. The work is split
//! by how often its inputs change:
//!
//! | Input changes on | Work | Method |
//! |------------------|------|--------|
//! | registration, resize | element rect → range | [`update_all_ranges`] |
//! | scroll | scroll offset → progress → per-track `at` | [`update_progress`] |
//! | every frame | `at` → `transform` / `opacity` strings | [`tick`] |
//!
//! The controller starts its [`ScrollLoop`] when the first node arrives and
//! stops it when the last one leaves.
//!
//! [`update_all_ranges`]: ParallaxController::update_all_ranges
//! [`update_progress`]: ParallaxController::update_progress
//! [`tick`]: ParallaxController::tick

use alloc::vec::Vec;

use crate::host::{HostElement, ScrollLoop, Viewport};
use crate::id::NodeId;
use crate::options::{EffectKind, EffectOptions};
use crate::property::{PropertyKind, StyleFrame};
use crate::time::FrameTick;
use crate::trace::{
    FrameEvent, LoopEvent, NodeAction, NodeEvent, ProgressEvent, RangeEvent, Tracer,
};

/// Maps a scroll offset into `[0, 1]` over `[from, to]`.
///
/// A zero-length range is a step at `from`. The result is never NaN.
#[must_use]
pub fn progress(scroll_y: f64, from: f64, to: f64) -> f64 {
    let p = if from == to {
        if scroll_y >= from { 1.0 } else { 0.0 }
    } else if scroll_y <= from {
        0.0
    } else if scroll_y >= to {
        1.0
    } else {
        (scroll_y - from) / (to - from)
    };
    if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) }
}

#[derive(Debug)]
struct ParallaxNode<E> {
    id: NodeId,
    element: E,
    options: EffectOptions,
    range_from: f64,
    range_to: f64,
    progress: f64,
}

impl<E: HostElement> ParallaxNode<E> {
    fn update_range(&mut self, viewport: Viewport) {
        let rect = self.element.bounding_rect();
        let (dy_from, dy_to) = self
            .options
            .track(PropertyKind::TranslateY)
            .map_or((0.0, 0.0), |y| (y.from(), y.to()));
        self.range_from = rect.y0 + viewport.scroll_y - viewport.height + dy_from;
        self.range_to =
            rect.y1 + viewport.scroll_y - self.options.range_end() * viewport.height + dy_to;
    }

    fn update_progress(&mut self, scroll_y: f64) {
        self.progress = progress(scroll_y, self.range_from, self.range_to);
        for track in self.options.tracks_mut() {
            track.seek(self.progress);
        }
    }

    fn trace_range(&self, tracer: &mut Tracer<'_>) {
        tracer.range(&RangeEvent {
            id: self.id,
            from: self.range_from,
            to: self.range_to,
        });
    }
}

/// Maps scroll position onto interpolated styles for registered elements.
#[derive(Debug)]
pub struct ParallaxController<E, L> {
    nodes: Vec<ParallaxNode<E>>,
    scroll_loop: L,
    running: bool,
    frame: StyleFrame,
}

impl<E, L> ParallaxController<E, L>
where
    E: HostElement,
    L: ScrollLoop,
{
    /// Creates an empty controller. The loop is not started until the first
    /// node is observed.
    #[must_use]
    pub fn new(scroll_loop: L) -> Self {
        Self {
            nodes: Vec::new(),
            scroll_loop,
            running: false,
            frame: StyleFrame::default(),
        }
    }

    /// The scroll loop.
    #[must_use]
    pub fn scroll_loop(&self) -> &L {
        &self.scroll_loop
    }

    /// Returns `true` while the scroll loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of registered nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if no node is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.position(id).is_some()
    }

    /// Finds the id `element` is registered under.
    #[must_use]
    pub fn find(&self, element: &E) -> Option<NodeId> {
        self.nodes.iter().find(|n| n.element == *element).map(|n| n.id)
    }

    /// The node's scroll range as `(range_from, range_to)`.
    #[must_use]
    pub fn range(&self, id: NodeId) -> Option<(f64, f64)> {
        self.node(id).map(|n| (n.range_from, n.range_to))
    }

    /// The node's current progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self, id: NodeId) -> Option<f64> {
        self.node(id).map(|n| n.progress)
    }

    /// The node's options, with each track's current value.
    #[must_use]
    pub fn options(&self, id: NodeId) -> Option<&EffectOptions> {
        self.node(id).map(|n| &n.options)
    }

    /// Registers `element` under `id`.
    ///
    /// Starts the loop if this is the first node, marks the element for
    /// transform compositing, computes its range, and brings every node's
    /// progress up to `viewport.scroll_y`. An id that is already registered
    /// is replaced in place with fresh values. Returns `true` if a node was
    /// replaced.
    pub fn observe_node(
        &mut self,
        id: NodeId,
        element: E,
        options: EffectOptions,
        viewport: Viewport,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        if !self.running {
            self.running = true;
            self.scroll_loop.start();
            tracer.loop_state(&LoopEvent { running: true });
        }

        element.set_style("will-change", "transform");
        let mut node = ParallaxNode {
            id,
            element,
            options,
            range_from: 0.0,
            range_to: 0.0,
            progress: 0.0,
        };
        node.update_range(viewport);
        node.trace_range(tracer);

        let replaced = match self.position(id) {
            Some(index) => {
                self.nodes[index] = node;
                true
            }
            None => {
                self.nodes.push(node);
                false
            }
        };
        tracer.node(&NodeEvent {
            id,
            kind: EffectKind::Parallax,
            action: if replaced {
                NodeAction::Replaced
            } else {
                NodeAction::Observed
            },
        });

        self.update_progress(viewport.scroll_y, tracer);
        replaced
    }

    /// Forgets the node. Stops the loop when the last node leaves. Returns
    /// `false` for an unknown id.
    pub fn unobserve_node(&mut self, id: NodeId, tracer: &mut Tracer<'_>) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.nodes.remove(index);
        tracer.node(&NodeEvent {
            id,
            kind: EffectKind::Parallax,
            action: NodeAction::Unobserved,
        });

        if self.nodes.is_empty() && self.running {
            self.running = false;
            self.scroll_loop.stop();
            tracer.loop_state(&LoopEvent { running: false });
        }
        true
    }

    /// Replaces a node's options, then recomputes its range and progress.
    /// Returns `false` for an unknown id.
    pub fn reconfigure(
        &mut self,
        id: NodeId,
        options: EffectOptions,
        viewport: Viewport,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let node = &mut self.nodes[index];
        node.options = options;
        node.update_range(viewport);
        node.update_progress(viewport.scroll_y);
        node.trace_range(tracer);
        tracer.node(&NodeEvent {
            id,
            kind: EffectKind::Parallax,
            action: NodeAction::Reconfigured,
        });
        true
    }

    /// Recomputes one node's range against `viewport`. Returns `false` for
    /// an unknown id.
    pub fn update_range(
        &mut self,
        id: NodeId,
        viewport: Viewport,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let node = &mut self.nodes[index];
        node.update_range(viewport);
        node.trace_range(tracer);
        true
    }

    /// Recomputes every node's range against `viewport`.
    pub fn update_all_ranges(&mut self, viewport: Viewport, tracer: &mut Tracer<'_>) {
        for node in &mut self.nodes {
            node.update_range(viewport);
            node.trace_range(tracer);
        }
    }

    /// Recomputes every node's progress and track values for `scroll_y`.
    pub fn update_progress(&mut self, scroll_y: f64, tracer: &mut Tracer<'_>) {
        for node in &mut self.nodes {
            node.update_progress(scroll_y);
        }
        tracer.progress(&ProgressEvent {
            scroll_y,
            nodes: count(self.nodes.len()),
        });
    }

    /// Writes each node's current `transform` and `opacity`.
    ///
    /// A value is only written when at least one track contributes to it.
    pub fn tick(&mut self, frame: FrameTick, tracer: &mut Tracer<'_>) {
        let mut transform_writes = 0_u32;
        let mut opacity_writes = 0_u32;

        for node in &self.nodes {
            self.frame.clear();
            for track in node.options.tracks() {
                track.write(&mut self.frame);
            }
            if !self.frame.transform.is_empty() {
                node.element.set_style("transform", &self.frame.transform);
                transform_writes += 1;
            }
            if !self.frame.opacity.is_empty() {
                node.element.set_style("opacity", &self.frame.opacity);
                opacity_writes += 1;
            }
        }

        tracer.frame(&FrameEvent {
            frame_index: frame.frame_index,
            now: frame.now,
            nodes: count(self.nodes.len()),
            transform_writes,
            opacity_writes,
        });
    }

    fn position(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    fn node(&self, id: NodeId) -> Option<&ParallaxNode<E>> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_host::{FakeElement, FakeLoop};
    use crate::time::HostTime;
    use kurbo::Rect;

    const VIEWPORT_H: f64 = 800.0;

    fn at(scroll_y: f64) -> Viewport {
        Viewport::new(scroll_y, VIEWPORT_H)
    }

    fn frame(i: u64) -> FrameTick {
        FrameTick {
            now: HostTime(i * 16_000),
            frame_index: i,
        }
    }

    /// An element whose range is exactly 500..1500 at scroll 0 with no
    /// `y` track and no range end offset.
    fn block(name: &'static str) -> FakeElement {
        FakeElement::new(name, Rect::new(0.0, 1300.0, 300.0, 1500.0))
    }

    fn controller() -> (ParallaxController<FakeElement, FakeLoop>, FakeLoop) {
        let scroll_loop = FakeLoop::default();
        (ParallaxController::new(scroll_loop.clone()), scroll_loop)
    }

    #[test]
    fn progress_clamps_and_guards_degenerate_ranges() {
        assert_eq!(progress(400.0, 500.0, 1500.0), 0.0);
        assert_eq!(progress(500.0, 500.0, 1500.0), 0.0);
        assert_eq!(progress(1000.0, 500.0, 1500.0), 0.5);
        assert_eq!(progress(1500.0, 500.0, 1500.0), 1.0);
        assert_eq!(progress(9000.0, 500.0, 1500.0), 1.0);

        assert_eq!(progress(99.0, 100.0, 100.0), 0.0);
        assert_eq!(progress(100.0, 100.0, 100.0), 1.0);
        assert_eq!(progress(f64::NAN, 100.0, 200.0), 0.0);
    }

    #[test]
    fn range_follows_rect_viewport_and_offsets() {
        let (mut c, _) = controller();
        let el = FakeElement::new("a", Rect::new(0.0, 1000.0, 100.0, 1200.0));
        let opts = EffectOptions::new()
            .with(PropertyKind::TranslateY, 20.0, -40.0)
            .with_range_end(0.5);
        let _ = c.observe_node(NodeId(1), el, opts, at(100.0), &mut Tracer::none());

        let (from, to) = c.range(NodeId(1)).unwrap();
        assert_eq!(from, 1000.0 + 100.0 - 800.0 + 20.0);
        assert_eq!(to, 1200.0 + 100.0 - 400.0 - 40.0);
    }

    #[test]
    fn translate_y_midway() {
        let (mut c, _) = controller();
        let el = block("a");
        let opts = EffectOptions::new().with(PropertyKind::TranslateY, 0.0, -100.0);
        let _ = c.observe_node(NodeId(1), el.clone(), opts, at(0.0), &mut Tracer::none());
        // The y track shifts the range; pin it back to 500..1500.
        el.set_rect(Rect::new(0.0, 1300.0, 300.0, 1600.0));
        assert!(c.update_range(NodeId(1), at(0.0), &mut Tracer::none()));
        assert_eq!(c.range(NodeId(1)), Some((500.0, 1500.0)));

        c.update_progress(1000.0, &mut Tracer::none());
        c.tick(frame(0), &mut Tracer::none());
        assert_eq!(el.style("transform").as_deref(), Some("translateY(-50px)"));
        assert_eq!(el.style_writes("opacity"), 0);
    }

    #[test]
    fn values_stay_within_track_bounds() {
        let (mut c, _) = controller();
        let opts = EffectOptions::new()
            .with(PropertyKind::TranslateX, 0.0, 200.0)
            .with(PropertyKind::Opacity, 1.0, 0.0);
        let _ = c.observe_node(NodeId(1), block("a"), opts, at(0.0), &mut Tracer::none());

        for scroll in [-100.0, 0.0, 500.0, 733.0, 1499.0, 1500.0, 4000.0] {
            c.update_progress(scroll, &mut Tracer::none());
            let opts = c.options(NodeId(1)).unwrap();
            let x = opts.track(PropertyKind::TranslateX).unwrap().at();
            let o = opts.track(PropertyKind::Opacity).unwrap().at();
            assert!((0.0..=200.0).contains(&x), "x={x} at scroll {scroll}");
            assert!((0.0..=1.0).contains(&o), "o={o} at scroll {scroll}");
            if scroll <= 500.0 {
                assert_eq!(x, 0.0);
            }
            if scroll >= 1500.0 {
                assert_eq!(x, 200.0);
            }
        }
    }

    #[test]
    fn update_progress_is_idempotent() {
        let (mut c, _) = controller();
        let opts = EffectOptions::new().with(PropertyKind::Scale, 1.0, 3.0);
        let _ = c.observe_node(NodeId(1), block("a"), opts, at(0.0), &mut Tracer::none());

        c.update_progress(812.5, &mut Tracer::none());
        let first = c.options(NodeId(1)).cloned().unwrap();
        let first_at = first.track(PropertyKind::Scale).unwrap().at();
        c.update_progress(812.5, &mut Tracer::none());
        let second_at = c.options(NodeId(1)).unwrap().track(PropertyKind::Scale).unwrap().at();
        assert_eq!(first_at, second_at);
    }

    #[test]
    fn observe_marks_will_change_and_computes_initial_progress() {
        let (mut c, _) = controller();
        let el = block("a");
        let opts = EffectOptions::new().with(PropertyKind::RotateZ, 0.0, 90.0);
        let _ = c.observe_node(NodeId(1), el.clone(), opts, at(1000.0), &mut Tracer::none());

        assert_eq!(el.style("will-change").as_deref(), Some("transform"));
        // Range is 1500..2500 at scroll 1000, so progress is still 0.
        assert_eq!(c.progress(NodeId(1)), Some(0.0));
        c.update_progress(2000.0, &mut Tracer::none());
        c.tick(frame(1), &mut Tracer::none());
        assert_eq!(el.style("transform").as_deref(), Some("rotateZ(45deg)"));
    }

    #[test]
    fn loop_runs_while_nodes_exist() {
        let (mut c, scroll_loop) = controller();
        let opts = EffectOptions::new().with(PropertyKind::Opacity, 0.0, 1.0);
        let _ = c.observe_node(NodeId(1), block("a"), opts.clone(), at(0.0), &mut Tracer::none());
        let _ = c.observe_node(NodeId(2), block("b"), opts, at(0.0), &mut Tracer::none());
        assert!(scroll_loop.is_running());
        assert_eq!(scroll_loop.starts(), 1);

        assert!(c.unobserve_node(NodeId(1), &mut Tracer::none()));
        assert!(scroll_loop.is_running(), "one node left");
        assert!(c.unobserve_node(NodeId(2), &mut Tracer::none()));
        assert!(!scroll_loop.is_running());
        assert_eq!(scroll_loop.stops(), 1);
        assert!(!c.unobserve_node(NodeId(2), &mut Tracer::none()));
        assert_eq!(scroll_loop.stops(), 1, "unknown id must not stop twice");
    }

    #[test]
    fn reobserve_starts_from_fresh_values() {
        let (mut c, _) = controller();
        let el = block("a");
        let opts = EffectOptions::new().with(PropertyKind::TranslateX, 10.0, 90.0);
        let _ = c.observe_node(NodeId(1), el.clone(), opts.clone(), at(0.0), &mut Tracer::none());
        c.update_progress(1200.0, &mut Tracer::none());
        assert!(c.unobserve_node(NodeId(1), &mut Tracer::none()));

        let _ = c.observe_node(NodeId(2), el, opts, at(0.0), &mut Tracer::none());
        assert_eq!(c.progress(NodeId(2)), Some(0.0));
        let x = c.options(NodeId(2)).unwrap().track(PropertyKind::TranslateX).unwrap().at();
        assert_eq!(x, 10.0);
    }

    #[test]
    fn same_id_is_replaced_in_place() {
        let (mut c, _) = controller();
        let a = block("a");
        let b = block("b");
        let opts = EffectOptions::new().with(PropertyKind::TranslateX, 0.0, 10.0);
        let _ = c.observe_node(NodeId(1), a.clone(), opts.clone(), at(0.0), &mut Tracer::none());
        let _ = c.observe_node(NodeId(2), b.clone(), opts.clone(), at(0.0), &mut Tracer::none());

        assert!(c.observe_node(NodeId(1), a.clone(), opts, at(0.0), &mut Tracer::none()));
        assert_eq!(c.len(), 2);
        assert_eq!(c.find(&a), Some(NodeId(1)));
        assert_eq!(c.find(&b), Some(NodeId(2)));
    }

    #[test]
    fn tick_writes_only_contributed_values() {
        let (mut c, _) = controller();
        let fade = block("fade");
        let slide = block("slide");
        let _ = c.observe_node(
            NodeId(1),
            fade.clone(),
            EffectOptions::new().with(PropertyKind::Opacity, 0.0, 1.0),
            at(0.0),
            &mut Tracer::none(),
        );
        let _ = c.observe_node(
            NodeId(2),
            slide.clone(),
            EffectOptions::new().with(PropertyKind::TranslateX, -20.0, 20.0),
            at(0.0),
            &mut Tracer::none(),
        );
        c.update_progress(750.0, &mut Tracer::none());
        c.tick(frame(0), &mut Tracer::none());

        assert_eq!(fade.style("opacity").as_deref(), Some("0.25"));
        assert_eq!(fade.style_writes("transform"), 0);
        assert_eq!(slide.style("transform").as_deref(), Some("translateX(-10px)"));
        assert_eq!(slide.style_writes("opacity"), 0);
    }

    #[test]
    fn resize_recomputes_ranges() {
        let (mut c, _) = controller();
        let el = block("a");
        let opts = EffectOptions::new().with(PropertyKind::Scale, 1.0, 2.0);
        let _ = c.observe_node(NodeId(1), el.clone(), opts, at(0.0), &mut Tracer::none());

        el.set_rect(Rect::new(0.0, 2300.0, 300.0, 2500.0));
        c.update_all_ranges(Viewport::new(0.0, 1000.0), &mut Tracer::none());
        assert_eq!(c.range(NodeId(1)), Some((1300.0, 2500.0)));
    }

    #[test]
    fn reconfigure_replaces_tracks_and_keeps_position() {
        let (mut c, _) = controller();
        let el = block("a");
        let _ = c.observe_node(
            NodeId(1),
            el.clone(),
            EffectOptions::new().with(PropertyKind::TranslateX, 0.0, 10.0),
            at(0.0),
            &mut Tracer::none(),
        );
        let new_opts = EffectOptions::new().with(PropertyKind::Opacity, 0.0, 1.0);
        assert!(c.reconfigure(NodeId(1), new_opts, at(1000.0), &mut Tracer::none()));
        // Range moved with the scroll offset: 1500..2500.
        assert_eq!(c.range(NodeId(1)), Some((1500.0, 2500.0)));
        assert!(c.options(NodeId(1)).unwrap().track(PropertyKind::TranslateX).is_none());
        assert!(!c.reconfigure(NodeId(9), EffectOptions::new(), at(0.0), &mut Tracer::none()));
    }
}
