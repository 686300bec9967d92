// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated page scroll that exercises both controllers and the tracing
//! pipeline.
//!
//! Scrolls an in-memory page down past three trigger blocks and two parallax
//! elements, resizes the viewport, and scrolls back up. Events go to both a
//! [`PrettyPrintSink`](event_horizon_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](event_horizon_debug::recorder::RecorderSink), and the
//! recording is exported as a Chrome trace JSON file.

mod page;

use std::fs::File;
use std::io::BufWriter;

use event_horizon_core::host::HostElement as _;
use event_horizon_core::options::{EffectOptions, Modifiers};
use event_horizon_core::property::PropertyKind;
use event_horizon_core::threshold::Thresholds;
use event_horizon_core::time::{FrameTick, HostTime};
use event_horizon_core::trace::{
    FrameEvent, LoopEvent, NodeEvent, ProgressEvent, RangeEvent, ThresholdEvent, TraceSink,
    Tracer,
};
use event_horizon_core::{EventHorizon, HorizonConfig, Registration, UpdateOutcome};

use event_horizon_debug::pretty::PrettyPrintSink;
use event_horizon_debug::recorder::RecorderSink;

use page::{Page, SimBackend, SimElement, SimLoop, SimObservers};

const FRAME_COUNT: u64 = 240;
const FRAME_MS: u64 = 16;
/// Document height minus the initial viewport height.
const MAX_SCROLL: f64 = 2800.0;
/// Frame at which the scroll reverses.
const TURN_FRAME: u64 = 140;
const RESIZE_FRAME: u64 = 120;
const DETACH_FRAME: u64 = 200;

/// Fans every event out to both sinks.
struct Sinks {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for Sinks {
    fn on_node(&mut self, e: &NodeEvent) {
        self.pretty.on_node(e);
        self.recorder.on_node(e);
    }

    fn on_threshold(&mut self, e: &ThresholdEvent) {
        self.pretty.on_threshold(e);
        self.recorder.on_threshold(e);
    }

    fn on_range(&mut self, e: &RangeEvent) {
        self.pretty.on_range(e);
        self.recorder.on_range(e);
    }

    fn on_progress(&mut self, e: &ProgressEvent) {
        self.pretty.on_progress(e);
        self.recorder.on_progress(e);
    }

    fn on_frame(&mut self, e: &FrameEvent) {
        self.pretty.on_frame(e);
        self.recorder.on_frame(e);
    }

    fn on_loop(&mut self, e: &LoopEvent) {
        self.pretty.on_loop(e);
        self.recorder.on_loop(e);
    }
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let mut sinks = Sinks {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())).without_frames(),
        recorder: RecorderSink::new(),
    };

    // -- page + horizon ----------------------------------------------------
    let page = Page::new(800.0);
    let config = HorizonConfig::web();
    let thresholds = Thresholds::evenly_spaced(config.event_horizons);
    let observers = SimObservers::new(&thresholds, page.clone());
    let scroll_loop = SimLoop::default();
    let mut horizon: EventHorizon<SimBackend> =
        EventHorizon::new(config, observers.clone(), scroll_loop.clone());

    let hero = page.element("hero", 0.0, 600.0);
    let intro = page.element("intro", 900.0, 300.0);
    let gallery = page.element("gallery", 1600.0, 500.0);
    let card = page.element("card", 2200.0, 400.0);
    let footer = page.element("footer", 3200.0, 400.0);

    // -- registrations -----------------------------------------------------
    let hero_id = horizon.register(
        Registration::parallax(
            hero.clone(),
            EffectOptions::new()
                .with(PropertyKind::TranslateY, 0.0, -200.0)
                .with(PropertyKind::Opacity, 1.0, 0.0),
        ),
        page.viewport(),
        &mut Tracer::new(&mut sinks),
    );
    let card_id = horizon.register(
        Registration::parallax(
            card.clone(),
            EffectOptions::new()
                .with(PropertyKind::RotateZ, -8.0, 8.0)
                .with(PropertyKind::Scale, 0.9, 1.0)
                .with_range_end(0.5),
        ),
        page.viewport(),
        &mut Tracer::new(&mut sinks),
    );
    let intro_id = horizon.register(
        Registration::trigger(intro.clone()).with_callback("intro", 50.0),
        page.viewport(),
        &mut Tracer::new(&mut sinks),
    );
    let _ = horizon.register(
        Registration::trigger(gallery.clone())
            .with_modifiers(Modifiers::from_names(["once"]))
            .with_callback("gallery", 0.0),
        page.viewport(),
        &mut Tracer::new(&mut sinks),
    );
    let footer_id = horizon.register(
        Registration::trigger(footer.clone()),
        page.viewport(),
        &mut Tracer::new(&mut sinks),
    );

    // -- simulated scroll --------------------------------------------------
    let mut scroll_deadline: Option<HostTime> = None;
    let mut resize_deadline: Option<HostTime> = None;

    for frame_index in 0..FRAME_COUNT {
        let now = HostTime((frame_index * FRAME_MS) * 1000);

        let target = scroll_position(frame_index);
        if target != page.viewport().scroll_y {
            page.scroll_to(target);
            // Listeners are only attached while the loop runs.
            if scroll_loop.is_running() {
                scroll_deadline = horizon
                    .on_scroll(now, page.viewport(), &mut Tracer::new(&mut sinks))
                    .or(scroll_deadline);
            }
        }

        if frame_index == RESIZE_FRAME {
            page.resize(700.0);
            if scroll_loop.is_running() {
                resize_deadline = horizon.on_resize(now).or(resize_deadline);
            }
        }

        if frame_index == DETACH_FRAME {
            let outcome =
                horizon.update(card_id, None, page.viewport(), &mut Tracer::new(&mut sinks));
            assert_eq!(outcome, UpdateOutcome::Unregistered, "card had options");
        }

        // -- timers ---------------------------------------------------------
        if scroll_deadline.is_some_and(|d| d <= now) {
            scroll_deadline = None;
            horizon.on_scroll_timer(&mut Tracer::new(&mut sinks));
        }
        if resize_deadline.is_some_and(|d| d <= now) {
            resize_deadline = None;
            horizon.on_resize_timer(page.viewport(), &mut Tracer::new(&mut sinks));
        }

        deliver_visibility(&mut horizon, &observers, &mut sinks);

        if scroll_loop.is_running() {
            horizon.on_frame(FrameTick { now, frame_index }, &mut Tracer::new(&mut sinks));
        }
    }

    println!(
        "hero: transform={:?} opacity={:?}",
        hero.style("transform"),
        hero.style("opacity"),
    );
    println!("intro classes: {:?}", intro.classes());
    println!("gallery classes: {:?}", gallery.classes());

    // -- teardown ----------------------------------------------------------
    for id in [hero_id, intro_id, footer_id] {
        let _ = horizon.unregister(id, &mut Tracer::new(&mut sinks));
    }
    assert!(!scroll_loop.is_running(), "loop stops with the last parallax node");
    assert_eq!(footer.node_id(), Some(footer_id));

    // -- export Chrome trace -----------------------------------------------
    let path = "scroll_trace.json";
    let file = File::create(path).expect("failed to create scroll_trace.json");
    let mut writer = BufWriter::new(file);
    event_horizon_debug::chrome::export(sinks.recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({FRAME_COUNT} frames)");
}

/// Scroll offset for a frame: down at 30px per frame, a pause at the bottom,
/// then back up at 40px per frame.
fn scroll_position(frame_index: u64) -> f64 {
    if frame_index < TURN_FRAME {
        (frame_index as f64 * 30.0).min(MAX_SCROLL)
    } else {
        (MAX_SCROLL - (frame_index - TURN_FRAME) as f64 * 40.0).max(0.0)
    }
}

/// Samples the observers and runs the resulting callbacks.
fn deliver_visibility(
    horizon: &mut EventHorizon<SimBackend>,
    observers: &SimObservers,
    sinks: &mut Sinks,
) {
    for (index, entries) in observers.sample() {
        let notifications = horizon.on_visibility_change(index, entries, &mut Tracer::new(sinks));
        for n in notifications {
            announce(n.callback, &n.element, n.visible);
        }
    }
}

fn announce(label: &str, element: &SimElement, visible: bool) {
    let edge = if visible { "enter" } else { "exit" };
    println!("[callback] {label}: {} {edge}", element.name());
}
