// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node identity.

use core::fmt;
use core::str::FromStr;

/// Name of the data attribute that carries a trigger element's [`NodeId`].
///
/// Intersection callbacks only hand back the target element, so the id is
/// read from this attribute to find the element's descriptor.
pub const UID_ATTRIBUTE: &str = "data-event-horizon-uid";

/// A handle to a tracked node in an [`EventHorizon`](crate::EventHorizon).
///
/// Ids are allocated from a monotonically increasing counter and never reused,
/// so a handle that outlives its node simply stops resolving.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    /// Rebuilds an id from its raw counter value, e.g. when decoding a trace
    /// recording. An id made up this way resolves only if it was allocated.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw counter value (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = core::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// Hands out fresh [`NodeId`]s.
#[derive(Clone, Debug, Default)]
pub(crate) struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub(crate) fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}
