// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debug logging to the browser console.

use alloc::format;
use alloc::string::String;

use event_horizon_core::trace::{
    FrameEvent, LoopEvent, NodeAction, NodeEvent, ProgressEvent, RangeEvent, ThresholdEvent,
    TraceSink, Transition,
};

/// Prefix of every console line.
pub(crate) const PREFIX: &str = "[event-horizon]";

/// A [`TraceSink`] that writes one `console.log` line per event.
///
/// Progress and frame events arrive on every scroll and every animation
/// frame; they are only logged when `verbose` is set.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSink {
    /// Also log progress and frame events.
    pub verbose: bool,
}

impl ConsoleSink {
    /// Creates a sink, optionally logging progress and frame events.
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

/// Installs or removes the debug sink. Returns `true` when logging was off
/// and is now on.
pub(crate) fn toggle(slot: &mut Option<ConsoleSink>, enabled: bool, verbose: bool) -> bool {
    if !enabled {
        *slot = None;
        return false;
    }
    slot.replace(ConsoleSink::new(verbose)).is_none()
}

/// Logs a prefixed line to the console.
pub(crate) fn log(message: &str) {
    web_sys::console::log_1(&format!("{PREFIX} {message}").into());
}

fn node_line(e: &NodeEvent) -> String {
    let action = match e.action {
        NodeAction::Observed => "observe",
        NodeAction::Replaced => "replace",
        NodeAction::Reconfigured => "reconfigure",
        NodeAction::Unobserved => "unobserve",
    };
    format!("{action} {:?} node {}", e.kind, e.id)
}

fn threshold_line(e: &ThresholdEvent) -> String {
    let transition = match e.transition {
        Transition::Enter => "enter",
        Transition::Exit => "exit",
        Transition::SkippedPastViewport => "exit ignored (past viewport)",
        Transition::Detached => "ignored (once)",
    };
    format!("node {} {transition} at {}%", e.id, e.threshold)
}

impl TraceSink for ConsoleSink {
    fn on_node(&mut self, e: &NodeEvent) {
        log(&node_line(e));
    }

    fn on_threshold(&mut self, e: &ThresholdEvent) {
        log(&threshold_line(e));
    }

    fn on_range(&mut self, e: &RangeEvent) {
        log(&format!("node {} range {}..{}", e.id, e.from, e.to));
    }

    fn on_progress(&mut self, e: &ProgressEvent) {
        if self.verbose {
            log(&format!("progress at {} for {} nodes", e.scroll_y, e.nodes));
        }
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        if self.verbose {
            log(&format!(
                "frame {}: {} transform, {} opacity writes",
                e.frame_index, e.transform_writes, e.opacity_writes
            ));
        }
    }

    fn on_loop(&mut self, e: &LoopEvent) {
        log(if e.running { "loop started" } else { "loop stopped" });
    }
}
