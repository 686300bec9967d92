// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node configuration handed over by the binder.

use alloc::vec::Vec;

use crate::property::{PropertyKind, PropertyTrack};

/// Which controller a node is registered with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    /// Visibility classes and enter/exit callback.
    Trigger,
    /// Scroll-driven style interpolation.
    Parallax,
}

impl EffectKind {
    /// Parses the directive argument. Anything but `"parallax"` is a trigger.
    #[must_use]
    pub fn from_arg(arg: &str) -> Self {
        if arg == "parallax" {
            Self::Parallax
        } else {
            Self::Trigger
        }
    }
}

/// Boolean directive modifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    /// Stop observing a threshold after the element first enters it.
    pub once: bool,
    /// Also clear classes when the element leaves through the viewport top.
    pub cleanup: bool,
}

impl Modifiers {
    /// Builds modifiers from directive modifier names. Unknown names are
    /// ignored.
    #[must_use]
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut modifiers = Self::default();
        for name in names {
            match name {
                "once" => modifiers.once = true,
                "cleanup" => modifiers.cleanup = true,
                _ => {}
            }
        }
        modifiers
    }
}

/// Parallax options: property tracks in declaration order plus the range end
/// offset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectOptions {
    tracks: Vec<PropertyTrack>,
    range_end: f64,
}

impl EffectOptions {
    /// Creates options with no tracks and no range end offset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a track for `kind`. A second track for the same kind replaces the
    /// first in place, keeping its position.
    #[must_use]
    pub fn with(mut self, kind: PropertyKind, from: f64, to: f64) -> Self {
        self.set(kind, from, to);
        self
    }

    /// Adds a track for an option key; unknown keys are ignored.
    #[must_use]
    pub fn with_key(mut self, key: &str, from: f64, to: f64) -> Self {
        if let Some(kind) = PropertyKind::from_key(key) {
            self.set(kind, from, to);
        }
        self
    }

    /// Sets `fx_range_end`, as a fraction of the viewport height.
    #[must_use]
    pub fn with_range_end(mut self, range_end: f64) -> Self {
        self.range_end = range_end;
        self
    }

    /// Adds or replaces the track for `kind`.
    pub fn set(&mut self, kind: PropertyKind, from: f64, to: f64) {
        let track = PropertyTrack::new(kind, from, to);
        match self.tracks.iter_mut().find(|t| t.kind() == kind) {
            Some(existing) => *existing = track,
            None => self.tracks.push(track),
        }
    }

    /// The range end offset as a fraction of the viewport height.
    #[must_use]
    pub const fn range_end(&self) -> f64 {
        self.range_end
    }

    /// The configured tracks, in declaration order.
    #[must_use]
    pub fn tracks(&self) -> &[PropertyTrack] {
        &self.tracks
    }

    pub(crate) fn tracks_mut(&mut self) -> &mut [PropertyTrack] {
        &mut self.tracks
    }

    /// The track for `kind`, if configured.
    #[must_use]
    pub fn track(&self, kind: PropertyKind) -> Option<&PropertyTrack> {
        self.tracks.iter().find(|t| t.kind() == kind)
    }

    /// Returns `true` if no track is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_arg_defaults_to_trigger() {
        assert_eq!(EffectKind::from_arg("parallax"), EffectKind::Parallax);
        assert_eq!(EffectKind::from_arg("trigger"), EffectKind::Trigger);
        assert_eq!(EffectKind::from_arg(""), EffectKind::Trigger);
    }

    #[test]
    fn modifiers_from_names() {
        let m = Modifiers::from_names(["once", "bogus"]);
        assert!(m.once);
        assert!(!m.cleanup);
        assert_eq!(Modifiers::from_names(Vec::<&str>::new()), Modifiers::default());
    }

    #[test]
    fn tracks_keep_declaration_order() {
        let opts = EffectOptions::new()
            .with_key("o", 0.0, 1.0)
            .with_key("x", 0.0, 50.0)
            .with_key("nope", 1.0, 2.0)
            .with_key("o", 0.5, 1.0);
        let kinds: Vec<PropertyKind> = opts.tracks().iter().map(PropertyTrack::kind).collect();
        assert_eq!(kinds, [PropertyKind::Opacity, PropertyKind::TranslateX]);
        assert_eq!(opts.track(PropertyKind::Opacity).map(PropertyTrack::from), Some(0.5));
    }

    #[test]
    fn equal_options_compare_equal() {
        let a = EffectOptions::new().with(PropertyKind::Scale, 1.0, 2.0).with_range_end(0.25);
        let b = a.clone();
        assert_eq!(a, b);
        assert_ne!(a, b.with_range_end(0.5));
    }
}
