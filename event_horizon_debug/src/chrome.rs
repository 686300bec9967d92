// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Only frame events carry a timestamp. Every other event is stamped with the
//! time of the most recent frame before it (zero before the first frame), so
//! registrations and threshold crossings line up with the frames around them.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Host time is already in microseconds, which is the unit the format uses.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut clock = 0_u64;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::Node(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.action),
                    "cat": format!("{:?}", e.kind),
                    "ts": clock,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "id": e.id.get(),
                    }
                }));
            }
            RecordedEvent::Threshold(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.transition),
                    "cat": "Trigger",
                    "ts": clock,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "id": e.id.get(),
                        "threshold": e.threshold,
                    }
                }));
            }
            RecordedEvent::Range(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Range",
                    "cat": "Parallax",
                    "ts": clock,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "id": e.id.get(),
                        "from": e.from,
                        "to": e.to,
                    }
                }));
            }
            RecordedEvent::Progress(e) => {
                events.push(json!({
                    "ph": "C",
                    "name": "scroll_y",
                    "cat": "Parallax",
                    "ts": clock,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "scroll_y": e.scroll_y,
                    }
                }));
            }
            RecordedEvent::Frame(e) => {
                clock = e.now.ticks();
                events.push(json!({
                    "ph": "i",
                    "name": "Frame",
                    "cat": "Loop",
                    "ts": clock,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                        "nodes": e.nodes,
                        "transform_writes": e.transform_writes,
                        "opacity_writes": e.opacity_writes,
                    }
                }));
            }
            RecordedEvent::Loop(e) => {
                let name = if e.running { "LoopStart" } else { "LoopStop" };
                events.push(json!({
                    "ph": "i",
                    "name": name,
                    "cat": "Loop",
                    "ts": clock,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use event_horizon_core::id::NodeId;
    use event_horizon_core::options::EffectKind;
    use event_horizon_core::time::HostTime;
    use event_horizon_core::trace::{
        FrameEvent, LoopEvent, NodeAction, NodeEvent, ThresholdEvent, TraceSink, Transition,
    };

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_node(&NodeEvent {
            id: NodeId::from_raw(0),
            kind: EffectKind::Trigger,
            action: NodeAction::Observed,
        });
        rec.on_loop(&LoopEvent { running: true });
        rec.on_frame(&FrameEvent {
            frame_index: 0,
            now: HostTime(16_000),
            nodes: 1,
            transform_writes: 1,
            opacity_writes: 0,
        });
        rec.on_threshold(&ThresholdEvent {
            id: NodeId::from_raw(0),
            threshold: 50.0,
            transition: Transition::Enter,
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 4);

        assert_eq!(parsed[0]["name"], "Observed");
        assert_eq!(parsed[0]["cat"], "Trigger");
        assert_eq!(parsed[0]["ts"], 0);

        assert_eq!(parsed[1]["name"], "LoopStart");

        assert_eq!(parsed[2]["name"], "Frame");
        assert_eq!(parsed[2]["ts"], 16_000);

        // Stamped with the preceding frame's time.
        assert_eq!(parsed[3]["name"], "Enter");
        assert_eq!(parsed[3]["ts"], 16_000);
        assert_eq!(parsed[3]["args"]["threshold"], 50.0);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty(), "an empty recording exports an empty array");
    }
}
