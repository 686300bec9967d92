// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility thresholds and their CSS class names.
//!
//! A page is split into `N` *event horizons*. Threshold `i` sits at
//! `i / (N - 1) * 100` percent, so the first is always `0` and the last is
//! always `100`. Each threshold gets its own intersection observer whose root
//! margin pulls the viewport's bottom edge up by that percentage, and its own
//! class name, `trigger-<percent>`.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

/// Largest supported number of thresholds (one bit per threshold in
/// [`ThresholdSet`]).
pub const MAX_EVENT_HORIZONS: usize = 64;

/// Prefix shared by every threshold class name.
pub const CLASS_PREFIX: &str = "trigger-";

/// The configured thresholds, in ascending order.
#[derive(Clone, Debug, PartialEq)]
pub struct Thresholds {
    percents: Vec<f64>,
    classes: Vec<String>,
}

impl Thresholds {
    /// Builds `count` evenly spaced thresholds from 0 to 100 inclusive.
    ///
    /// A single horizon yields the lone threshold `0`.
    ///
    /// # Panics
    ///
    /// Panics if `count` is zero or greater than [`MAX_EVENT_HORIZONS`].
    #[must_use]
    pub fn evenly_spaced(count: usize) -> Self {
        assert!(
            (1..=MAX_EVENT_HORIZONS).contains(&count),
            "event horizon count must be within 1..={MAX_EVENT_HORIZONS}, got {count}"
        );
        let percents: Vec<f64> = if count == 1 {
            Vec::from([0.0])
        } else {
            (0..count)
                .map(|i| (1.0 / (count - 1) as f64) * i as f64 * 100.0)
                .collect()
        };
        let classes = percents.iter().map(|&p| class_name(p)).collect();
        Self { percents, classes }
    }

    /// Number of thresholds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.percents.len()
    }

    /// Always `false`; at least one threshold exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.percents.is_empty()
    }

    /// Threshold percentage at `index`.
    #[must_use]
    pub fn percent(&self, index: usize) -> Option<f64> {
        self.percents.get(index).copied()
    }

    /// Class name for the threshold at `index`.
    #[must_use]
    pub fn class(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    /// Index of the threshold equal to `percent`, if configured.
    #[must_use]
    pub fn index_of(&self, percent: f64) -> Option<usize> {
        self.percents.iter().position(|&p| p == percent)
    }

    /// Iterates over `(index, percent)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.percents.iter().copied().enumerate()
    }

    /// Intersection observer root margin for the threshold at `index`.
    #[must_use]
    pub fn root_margin(&self, index: usize) -> Option<String> {
        self.percent(index).map(root_margin)
    }
}

/// Returns the class name for a threshold percentage.
///
/// Integral percentages print without a fractional part (`trigger-25`);
/// others use the shortest representation that round-trips
/// (`trigger-33.33333333333333`).
#[must_use]
pub fn class_name(percent: f64) -> String {
    format!("{CLASS_PREFIX}{percent}")
}

/// Returns the observer root margin that moves the viewport's bottom edge up
/// by `percent`.
#[must_use]
pub fn root_margin(percent: f64) -> String {
    format!("0px 0px -{percent}% 0px")
}

/// A set of threshold indices, one bit per threshold.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ThresholdSet(u64);

impl ThresholdSet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Adds `index`; returns `true` if it was not present.
    pub fn insert(&mut self, index: usize) -> bool {
        let bit = 1_u64 << index;
        let added = self.0 & bit == 0;
        self.0 |= bit;
        added
    }

    /// Removes `index`; returns `true` if it was present.
    pub fn remove(&mut self, index: usize) -> bool {
        let bit = 1_u64 << index;
        let removed = self.0 & bit != 0;
        self.0 &= !bit;
        removed
    }

    /// Returns whether `index` is in the set.
    #[must_use]
    pub const fn contains(self, index: usize) -> bool {
        self.0 & (1_u64 << index) != 0
    }

    /// Number of indices in the set.
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates over the indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..MAX_EVENT_HORIZONS).filter(move |&i| self.contains(i))
    }
}

impl core::fmt::Debug for ThresholdSet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_horizons_reach_one_hundred() {
        let t = Thresholds::evenly_spaced(5);
        let percents: Vec<f64> = t.iter().map(|(_, p)| p).collect();
        assert_eq!(percents, [0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(t.class(0), Some("trigger-0"));
        assert_eq!(t.class(4), Some("trigger-100"));
        assert_eq!(t.index_of(75.0), Some(3));
        assert_eq!(t.index_of(10.0), None);
    }

    #[test]
    fn fractional_thresholds_keep_full_precision() {
        let t = Thresholds::evenly_spaced(4);
        assert_eq!(t.class(1), Some("trigger-33.33333333333333"));
        assert_eq!(t.class(2), Some("trigger-66.66666666666666"));
        assert_eq!(t.class(3), Some("trigger-100"));
    }

    #[test]
    fn single_horizon_is_baseline_only() {
        let t = Thresholds::evenly_spaced(1);
        assert_eq!(t.len(), 1);
        assert_eq!(t.percent(0), Some(0.0));
    }

    #[test]
    #[should_panic(expected = "event horizon count")]
    fn zero_horizons_rejected() {
        let _ = Thresholds::evenly_spaced(0);
    }

    #[test]
    fn root_margin_shrinks_viewport_bottom() {
        let t = Thresholds::evenly_spaced(5);
        assert_eq!(t.root_margin(0).as_deref(), Some("0px 0px -0% 0px"));
        assert_eq!(t.root_margin(2).as_deref(), Some("0px 0px -50% 0px"));
        assert_eq!(t.root_margin(5), None);
    }

    #[test]
    fn threshold_set_tracks_membership() {
        let mut set = ThresholdSet::EMPTY;
        assert!(set.insert(0));
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert!(set.contains(3));
        assert_eq!(set.len(), 2);
        assert_eq!(set.iter().collect::<Vec<_>>(), [0, 3]);
        assert!(set.remove(0));
        assert!(!set.remove(0));
        assert_eq!(set.iter().collect::<Vec<_>>(), [3]);
    }
}
