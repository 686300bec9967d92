// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the controllers.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! controllers call as nodes come and go, thresholds are crossed, ranges are
//! recomputed, and frames are written. All method bodies default to no-ops,
//! so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.

use crate::id::NodeId;
use crate::options::EffectKind;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// What happened to a node's registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeAction {
    /// Registered for the first time.
    Observed,
    /// Registered again; the previous descriptor was replaced.
    Replaced,
    /// Options changed in place.
    Reconfigured,
    /// Deregistered.
    Unobserved,
}

/// How a visibility change was handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Entered the threshold; the class was added.
    Enter,
    /// Left the threshold; the class was removed.
    Exit,
    /// Left through the top of the viewport; the class was kept.
    SkippedPastViewport,
    /// Arrived after a `once` detach and was ignored.
    Detached,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a node is registered, replaced, reconfigured, or removed.
#[derive(Clone, Copy, Debug)]
pub struct NodeEvent {
    /// The node.
    pub id: NodeId,
    /// The controller it belongs to.
    pub kind: EffectKind,
    /// What happened.
    pub action: NodeAction,
}

/// Emitted for every visibility change that resolved to a node.
#[derive(Clone, Copy, Debug)]
pub struct ThresholdEvent {
    /// The node.
    pub id: NodeId,
    /// Threshold percentage.
    pub threshold: f64,
    /// How the change was handled.
    pub transition: Transition,
}

/// Emitted after a parallax node's scroll range is recomputed.
#[derive(Clone, Copy, Debug)]
pub struct RangeEvent {
    /// The node.
    pub id: NodeId,
    /// Scroll offset at progress 0.
    pub from: f64,
    /// Scroll offset at progress 1.
    pub to: f64,
}

/// Emitted after progress is recomputed for every parallax node.
#[derive(Clone, Copy, Debug)]
pub struct ProgressEvent {
    /// Scroll offset the progress was computed for.
    pub scroll_y: f64,
    /// Number of nodes updated.
    pub nodes: u32,
}

/// Emitted after the per-frame style pass.
#[derive(Clone, Copy, Debug)]
pub struct FrameEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Frame timestamp.
    pub now: HostTime,
    /// Number of nodes visited.
    pub nodes: u32,
    /// Number of `transform` writes.
    pub transform_writes: u32,
    /// Number of `opacity` writes.
    pub opacity_writes: u32,
}

/// Emitted when the scroll loop starts or stops.
#[derive(Clone, Copy, Debug)]
pub struct LoopEvent {
    /// Whether the loop is now running.
    pub running: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the controllers.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a node's registration changes.
    fn on_node(&mut self, e: &NodeEvent) {
        _ = e;
    }

    /// Called for each handled visibility change.
    fn on_threshold(&mut self, e: &ThresholdEvent) {
        _ = e;
    }

    /// Called after a range recomputation.
    fn on_range(&mut self, e: &RangeEvent) {
        _ = e;
    }

    /// Called after a progress recomputation.
    fn on_progress(&mut self, e: &ProgressEvent) {
        _ = e;
    }

    /// Called after each frame's style pass.
    fn on_frame(&mut self, e: &FrameEvent) {
        _ = e;
    }

    /// Called when the scroll loop starts or stops.
    fn on_loop(&mut self, e: &LoopEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`NodeEvent`].
    #[inline]
    pub fn node(&mut self, e: &NodeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_node(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ThresholdEvent`].
    #[inline]
    pub fn threshold(&mut self, e: &ThresholdEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_threshold(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RangeEvent`].
    #[inline]
    pub fn range(&mut self, e: &RangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_range(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ProgressEvent`].
    #[inline]
    pub fn progress(&mut self, e: &ProgressEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_progress(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameEvent`].
    #[inline]
    pub fn frame(&mut self, e: &FrameEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LoopEvent`].
    #[inline]
    pub fn loop_state(&mut self, e: &LoopEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_loop(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_node() -> NodeEvent {
        NodeEvent {
            id: NodeId(3),
            kind: EffectKind::Parallax,
            action: NodeAction::Observed,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_node(&sample_node());
        sink.on_loop(&LoopEvent { running: true });
        sink.on_frame(&FrameEvent {
            frame_index: 0,
            now: HostTime(0),
            nodes: 0,
            transform_writes: 0,
            opacity_writes: 0,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.node(&sample_node());
        tracer.progress(&ProgressEvent {
            scroll_y: 10.0,
            nodes: 1,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            nodes: Vec<NodeId>,
        }
        impl TraceSink for RecordingSink {
            fn on_node(&mut self, e: &NodeEvent) {
                self.nodes.push(e.id);
            }
        }

        let mut sink = RecordingSink { nodes: Vec::new() };
        let mut tracer = Tracer::new(&mut sink);
        tracer.node(&sample_node());
        // Access sink after tracer is dropped.
        drop(tracer);
        assert_eq!(sink.nodes, [NodeId(3)]);
    }
}
