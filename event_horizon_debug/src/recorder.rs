// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Floating-point fields are stored as their IEEE 754 bit patterns, so a
//! decoded threshold or scroll offset is bit-identical to the one recorded.

use event_horizon_core::id::NodeId;
use event_horizon_core::options::EffectKind;
use event_horizon_core::time::HostTime;
use event_horizon_core::trace::{
    FrameEvent, LoopEvent, NodeAction, NodeEvent, ProgressEvent, RangeEvent, ThresholdEvent,
    TraceSink, Transition,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_NODE: u8 = 1;
const TAG_THRESHOLD: u8 = 2;
const TAG_RANGE: u8 = 3;
const TAG_PROGRESS: u8 = 4;
const TAG_FRAME: u8 = 5;
const TAG_LOOP: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_kind(&mut self, k: EffectKind) {
        self.write_u8(match k {
            EffectKind::Trigger => 0,
            EffectKind::Parallax => 1,
        });
    }

    fn write_action(&mut self, a: NodeAction) {
        self.write_u8(match a {
            NodeAction::Observed => 0,
            NodeAction::Replaced => 1,
            NodeAction::Reconfigured => 2,
            NodeAction::Unobserved => 3,
        });
    }

    fn write_transition(&mut self, t: Transition) {
        self.write_u8(match t {
            Transition::Enter => 0,
            Transition::Exit => 1,
            Transition::SkippedPastViewport => 2,
            Transition::Detached => 3,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_node(&mut self, e: &NodeEvent) {
        self.write_u8(TAG_NODE);
        self.write_u64(e.id.get());
        self.write_kind(e.kind);
        self.write_action(e.action);
    }

    fn on_threshold(&mut self, e: &ThresholdEvent) {
        self.write_u8(TAG_THRESHOLD);
        self.write_u64(e.id.get());
        self.write_f64(e.threshold);
        self.write_transition(e.transition);
    }

    fn on_range(&mut self, e: &RangeEvent) {
        self.write_u8(TAG_RANGE);
        self.write_u64(e.id.get());
        self.write_f64(e.from);
        self.write_f64(e.to);
    }

    fn on_progress(&mut self, e: &ProgressEvent) {
        self.write_u8(TAG_PROGRESS);
        self.write_f64(e.scroll_y);
        self.write_u32(e.nodes);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.write_u8(TAG_FRAME);
        self.write_u64(e.frame_index);
        self.write_u64(e.now.ticks());
        self.write_u32(e.nodes);
        self.write_u32(e.transform_writes);
        self.write_u32(e.opacity_writes);
    }

    fn on_loop(&mut self, e: &LoopEvent) {
        self.write_u8(TAG_LOOP);
        self.write_u8(u8::from(e.running));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`NodeEvent`].
    Node(NodeEvent),
    /// A [`ThresholdEvent`].
    Threshold(ThresholdEvent),
    /// A [`RangeEvent`].
    Range(RangeEvent),
    /// A [`ProgressEvent`].
    Progress(ProgressEvent),
    /// A [`FrameEvent`].
    Frame(FrameEvent),
    /// A [`LoopEvent`].
    Loop(LoopEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first unknown tag or truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_id(&mut self) -> Option<NodeId> {
        self.read_u64().map(NodeId::from_raw)
    }

    fn read_kind(&mut self) -> Option<EffectKind> {
        Some(match self.read_u8()? {
            0 => EffectKind::Trigger,
            _ => EffectKind::Parallax,
        })
    }

    fn read_action(&mut self) -> Option<NodeAction> {
        Some(match self.read_u8()? {
            0 => NodeAction::Observed,
            1 => NodeAction::Replaced,
            2 => NodeAction::Reconfigured,
            _ => NodeAction::Unobserved,
        })
    }

    fn read_transition(&mut self) -> Option<Transition> {
        Some(match self.read_u8()? {
            0 => Transition::Enter,
            1 => Transition::Exit,
            2 => Transition::SkippedPastViewport,
            _ => Transition::Detached,
        })
    }

    fn decode_node(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Node(NodeEvent {
            id: self.read_id()?,
            kind: self.read_kind()?,
            action: self.read_action()?,
        }))
    }

    fn decode_threshold(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Threshold(ThresholdEvent {
            id: self.read_id()?,
            threshold: self.read_f64()?,
            transition: self.read_transition()?,
        }))
    }

    fn decode_range(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Range(RangeEvent {
            id: self.read_id()?,
            from: self.read_f64()?,
            to: self.read_f64()?,
        }))
    }

    fn decode_progress(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Progress(ProgressEvent {
            scroll_y: self.read_f64()?,
            nodes: self.read_u32()?,
        }))
    }

    fn decode_frame(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Frame(FrameEvent {
            frame_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            nodes: self.read_u32()?,
            transform_writes: self.read_u32()?,
            opacity_writes: self.read_u32()?,
        }))
    }

    fn decode_loop(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Loop(LoopEvent {
            running: self.read_u8()? != 0,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_NODE => self.decode_node(),
            TAG_THRESHOLD => self.decode_threshold(),
            TAG_RANGE => self.decode_range(),
            TAG_PROGRESS => self.decode_progress(),
            TAG_FRAME => self.decode_frame(),
            TAG_LOOP => self.decode_loop(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> FrameEvent {
        FrameEvent {
            frame_index: 12,
            now: HostTime(200_000),
            nodes: 3,
            transform_writes: 2,
            opacity_writes: 1,
        }
    }

    #[test]
    fn threshold_percentages_survive_bit_for_bit() {
        let mut rec = RecorderSink::new();
        rec.on_threshold(&ThresholdEvent {
            id: NodeId::from_raw(4),
            threshold: 100.0 / 3.0,
            transition: Transition::SkippedPastViewport,
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 1);
        match &events[0] {
            RecordedEvent::Threshold(e) => {
                assert_eq!(e.id, NodeId::from_raw(4));
                assert_eq!(e.threshold.to_bits(), (100.0_f64 / 3.0).to_bits());
                assert_eq!(e.transition, Transition::SkippedPastViewport);
            }
            other => panic!("expected Threshold, got {other:?}"),
        }
    }

    #[test]
    fn registration_lifecycle_keeps_order() {
        let mut rec = RecorderSink::new();
        let id = NodeId::from_raw(7);
        for action in [
            NodeAction::Observed,
            NodeAction::Reconfigured,
            NodeAction::Unobserved,
        ] {
            rec.on_node(&NodeEvent {
                id,
                kind: EffectKind::Parallax,
                action,
            });
        }
        rec.on_range(&RangeEvent {
            id,
            from: -40.5,
            to: 1200.0,
        });

        let decoded: Vec<_> = decode(rec.as_bytes()).collect();
        let actions: Vec<_> = decoded
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::Node(n) => Some(n.action),
                _ => None,
            })
            .collect();
        assert_eq!(
            actions,
            [
                NodeAction::Observed,
                NodeAction::Reconfigured,
                NodeAction::Unobserved
            ]
        );
        match decoded.last() {
            Some(RecordedEvent::Range(r)) => {
                assert_eq!(r.from, -40.5);
                assert_eq!(r.to, 1200.0);
            }
            other => panic!("expected Range last, got {other:?}"),
        }
    }

    #[test]
    fn scroll_session_decodes_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_loop(&LoopEvent { running: true });
        rec.on_progress(&ProgressEvent {
            scroll_y: 320.0,
            nodes: 3,
        });
        rec.on_frame(&sample_frame());
        rec.on_loop(&LoopEvent { running: false });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], RecordedEvent::Loop(LoopEvent { running: true })));
        match &events[2] {
            RecordedEvent::Frame(f) => {
                assert_eq!(f.frame_index, 12);
                assert_eq!(f.now, HostTime(200_000));
                assert_eq!(f.transform_writes, 2);
                assert_eq!(f.opacity_writes, 1);
            }
            other => panic!("expected Frame, got {other:?}"),
        }
        assert!(matches!(events[3], RecordedEvent::Loop(LoopEvent { running: false })));
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_frame(&sample_frame());
        let bytes = rec.into_bytes();
        let truncated = &bytes[..bytes.len() - 1];
        assert_eq!(decode(truncated).count(), 0);
    }

    #[test]
    fn unknown_tag_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_loop(&LoopEvent { running: true });
        let mut bytes = rec.into_bytes();
        bytes.push(0xFF);
        bytes.push(TAG_LOOP);
        bytes.push(0);
        assert_eq!(decode(&bytes).count(), 1);
    }
}
