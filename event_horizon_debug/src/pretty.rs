// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use event_horizon_core::trace::{
    FrameEvent, LoopEvent, NodeAction, NodeEvent, ProgressEvent, RangeEvent, ThresholdEvent,
    TraceSink, Transition,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    frames: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            frames: true,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            frames: true,
        }
    }

    /// Skips progress and frame lines, which arrive on every scroll and
    /// every animation frame.
    #[must_use]
    pub fn without_frames(mut self) -> Self {
        self.frames = false;
        self
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn action_name(action: NodeAction) -> &'static str {
    match action {
        NodeAction::Observed => "observe",
        NodeAction::Replaced => "replace",
        NodeAction::Reconfigured => "reconfigure",
        NodeAction::Unobserved => "unobserve",
    }
}

fn transition_name(transition: Transition) -> &'static str {
    match transition {
        Transition::Enter => "enter",
        Transition::Exit => "exit",
        Transition::SkippedPastViewport => "past-viewport",
        Transition::Detached => "detached",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_node(&mut self, e: &NodeEvent) {
        let _ = writeln!(
            self.writer,
            "[node] {} {:?} id={}",
            action_name(e.action),
            e.kind,
            e.id,
        );
    }

    fn on_threshold(&mut self, e: &ThresholdEvent) {
        let _ = writeln!(
            self.writer,
            "[threshold] id={} at={}% {}",
            e.id,
            e.threshold,
            transition_name(e.transition),
        );
    }

    fn on_range(&mut self, e: &RangeEvent) {
        let _ = writeln!(
            self.writer,
            "[range] id={} from={:.1} to={:.1}",
            e.id, e.from, e.to,
        );
    }

    fn on_progress(&mut self, e: &ProgressEvent) {
        if !self.frames {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[progress] scroll_y={:.1} nodes={}",
            e.scroll_y, e.nodes,
        );
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        if !self.frames {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[frame] frame={} now={}µs nodes={} transform={} opacity={}",
            e.frame_index,
            e.now.ticks(),
            e.nodes,
            e.transform_writes,
            e.opacity_writes,
        );
    }

    fn on_loop(&mut self, e: &LoopEvent) {
        let state = if e.running { "start" } else { "stop" };
        let _ = writeln!(self.writer, "[loop] {state}");
    }
}
