// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interpolated visual properties and their CSS formatting.
//!
//! Each configured property is a [`PropertyTrack`]: a [`PropertyKind`], a
//! `from → to` range, the current interpolated value `at`, and a formatter
//! chosen once when the track is created. The per-frame pass only calls the
//! stored formatters; it never re-dispatches on the property kind.

use alloc::string::String;
use core::fmt::Write as _;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Perspective depth used by the `rx` and `ry` rotations.
pub const PERSPECTIVE_PX: u32 = 800;

/// The closed vocabulary of animatable properties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// `x`: `translateX(<px>)`.
    TranslateX,
    /// `y`: `translateY(<px>)`. Also shifts the node's scroll range.
    TranslateY,
    /// `r`: `rotateZ(<deg>)`.
    RotateZ,
    /// `rx`: `perspective(800px) rotateX(<deg>)`.
    RotateX,
    /// `ry`: `perspective(800px) rotateY(<deg>)`.
    RotateY,
    /// `s`: `scale(<factor>)`.
    Scale,
    /// `o`: the `opacity` property.
    Opacity,
}

impl PropertyKind {
    /// Every kind, in option-key order.
    pub const ALL: [Self; 7] = [
        Self::TranslateX,
        Self::TranslateY,
        Self::RotateZ,
        Self::RotateX,
        Self::RotateY,
        Self::Scale,
        Self::Opacity,
    ];

    /// Parses an option key. Unknown keys yield `None`.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "x" => Self::TranslateX,
            "y" => Self::TranslateY,
            "r" => Self::RotateZ,
            "rx" => Self::RotateX,
            "ry" => Self::RotateY,
            "s" => Self::Scale,
            "o" => Self::Opacity,
            _ => return None,
        })
    }

    /// The option key for this kind.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::TranslateX => "x",
            Self::TranslateY => "y",
            Self::RotateZ => "r",
            Self::RotateX => "rx",
            Self::RotateY => "ry",
            Self::Scale => "s",
            Self::Opacity => "o",
        }
    }

    /// Selects the formatter for this kind.
    #[must_use]
    pub const fn formatter(self) -> Formatter {
        match self {
            Self::TranslateX => write_translate_x,
            Self::TranslateY => write_translate_y,
            Self::RotateZ => write_rotate_z,
            Self::RotateX => write_rotate_x,
            Self::RotateY => write_rotate_y,
            Self::Scale => write_scale,
            Self::Opacity => write_opacity,
        }
    }
}

/// Appends one property's contribution to a [`StyleFrame`].
pub type Formatter = fn(&mut StyleFrame, f64);

/// The inline style values synthesized for one element in one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleFrame {
    /// Space-separated CSS transform functions, in declaration order.
    pub transform: String,
    /// Opacity as a decimal string, empty if no opacity track exists.
    pub opacity: String,
}

impl StyleFrame {
    /// Clears both values, keeping the allocations.
    pub fn clear(&mut self) {
        self.transform.clear();
        self.opacity.clear();
    }

    fn push_transform(&mut self, args: core::fmt::Arguments<'_>) {
        if !self.transform.is_empty() {
            self.transform.push(' ');
        }
        let _ = self.transform.write_fmt(args);
    }
}

/// One interpolated property of a parallax node.
#[derive(Clone, Copy)]
pub struct PropertyTrack {
    kind: PropertyKind,
    from: f64,
    to: f64,
    at: f64,
    format: Formatter,
}

impl PropertyTrack {
    /// Creates a track resting at `from`.
    #[must_use]
    pub const fn new(kind: PropertyKind, from: f64, to: f64) -> Self {
        Self {
            kind,
            from,
            to,
            at: from,
            format: kind.formatter(),
        }
    }

    /// The property this track animates.
    #[must_use]
    pub const fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Value at progress 0.
    #[must_use]
    pub const fn from(&self) -> f64 {
        self.from
    }

    /// Value at progress 1.
    #[must_use]
    pub const fn to(&self) -> f64 {
        self.to
    }

    /// Current interpolated value.
    #[must_use]
    pub const fn at(&self) -> f64 {
        self.at
    }

    /// Moves `at` to the given progress in `[0, 1]`.
    ///
    /// The endpoints are hit exactly, whatever rounding the interpolation
    /// would introduce.
    pub fn seek(&mut self, progress: f64) {
        self.at = if progress >= 1.0 {
            self.to
        } else if progress <= 0.0 {
            self.from
        } else {
            self.from + (self.to - self.from) * progress
        };
    }

    /// Appends the current value to `frame`.
    #[inline]
    pub fn write(&self, frame: &mut StyleFrame) {
        (self.format)(frame, self.at);
    }
}

impl PartialEq for PropertyTrack {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.from == other.from && self.to == other.to
    }
}

impl core::fmt::Debug for PropertyTrack {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyTrack")
            .field("kind", &self.kind)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("at", &self.at)
            .finish_non_exhaustive()
    }
}

/// Rounds half-way cases toward positive infinity, as `Math.round` does.
///
/// The result is returned as an integer so that `-0.4` prints as `0`.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "style values are far inside the i64 range; saturation is fine"
)]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn write_translate_x(frame: &mut StyleFrame, at: f64) {
    frame.push_transform(format_args!("translateX({}px)", round_half_up(at)));
}

fn write_translate_y(frame: &mut StyleFrame, at: f64) {
    frame.push_transform(format_args!("translateY({}px)", round_half_up(at)));
}

fn write_rotate_z(frame: &mut StyleFrame, at: f64) {
    frame.push_transform(format_args!("rotateZ({}deg)", round_half_up(at)));
}

fn write_rotate_x(frame: &mut StyleFrame, at: f64) {
    frame.push_transform(format_args!(
        "perspective({PERSPECTIVE_PX}px) rotateX({}deg)",
        round_half_up(at)
    ));
}

fn write_rotate_y(frame: &mut StyleFrame, at: f64) {
    frame.push_transform(format_args!(
        "perspective({PERSPECTIVE_PX}px) rotateY({}deg)",
        round_half_up(at)
    ));
}

fn write_scale(frame: &mut StyleFrame, at: f64) {
    frame.push_transform(format_args!("scale({at})"));
}

fn write_opacity(frame: &mut StyleFrame, at: f64) {
    frame.opacity.clear();
    let _ = write!(frame.opacity, "{at}");
}
