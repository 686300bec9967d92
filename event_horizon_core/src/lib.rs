// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility thresholds and scroll-driven parallax for page elements.
//!
//! `event_horizon_core` tracks a set of elements and, as the page scrolls or
//! the viewport resizes,
//!
//! - toggles `trigger-<percent>` classes on *trigger* elements as they cross
//!   visibility thresholds, optionally calling back at one threshold, and
//! - maps the scroll offset onto interpolated `transform` and `opacity`
//!   values for *parallax* elements, written once per animation frame.
//!
//! It is `no_std` compatible (with `alloc`) and never touches a DOM itself:
//! the host supplies elements, intersection observers, and a scroll loop
//! through the traits in [`host`].
//!
//! # Architecture
//!
//! ```text
//!   host events                       EventHorizon
//!   ───────────                       ────────────
//!   visibility change ─────────────► TriggerController ──► classes, Notifications
//!   scroll  ──► Throttle (10 ms)  ─┐
//!   resize  ──► Throttle (100 ms) ─┼► ParallaxController ──► ranges, progress
//!   animation frame ───────────────┘                      └─► transform / opacity
//! ```
//!
//! **[`horizon`]**: The [`EventHorizon`] context object. Allocates ids,
//! routes registrations, owns the throttles.
//!
//! **[`trigger`]**: One observer per threshold; class and callback dispatch.
//!
//! **[`parallax`]**: Range computation, progress, per-frame style synthesis.
//!
//! **[`throttle`]**: Leading/trailing throttle keyed by a gating state.
//!
//! **[`threshold`]**: Threshold spacing, class names, root margins.
//!
//! **[`property`]** and **[`options`]**: The closed property vocabulary and
//! per-node options.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod horizon;
pub mod host;
pub mod id;
pub mod options;
pub mod parallax;
pub mod property;
pub mod threshold;
pub mod throttle;
pub mod time;
pub mod trace;
pub mod trigger;

#[cfg(test)]
mod test_host;

pub use horizon::{EventHorizon, HorizonConfig, Registration, UpdateOutcome};
pub use id::NodeId;
pub use options::{EffectKind, EffectOptions, Modifiers};
pub use property::PropertyKind;
