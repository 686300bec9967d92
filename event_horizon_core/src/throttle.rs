// Copyright 2026 the Event Horizon Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-gated dispatch for high-frequency events.
//!
//! [`Throttle`] turns a burst of calls into at most one *leading* dispatch
//! and one *trailing* flush per window. It owns no timer: [`Throttle::call`]
//! reports the deadline a host timer should be armed for, and the host hands
//! control back through [`Throttle::flush`] (timer fired) or
//! [`Throttle::poll`] (clock-driven hosts and tests).
//!
//! Every call carries a *gating state* `S`. While a flush is pending, calls
//! with an unchanged state only replace the pending arguments. A call whose
//! state differs from the previous one restarts the window, and may dispatch
//! immediately, so a state transition is never swallowed by the coalescing.
//!
//! ```text
//!  call   call call call         call
//!   │      │    │    │             │
//!   ▼      ·    ·    ·             ▼
//!  lead ─────── delay ───────► flush(latest args)   lead ─ … ─►
//! ```

use crate::time::{Duration, HostTime};

/// Decides whether a call may dispatch on the leading edge.
#[derive(Clone, Copy, Debug)]
pub enum LeadingEdge<S> {
    /// Only the trailing flush ever dispatches.
    Never,
    /// Dispatch immediately when idle or when the gating state changed.
    Always,
    /// Like [`Always`](Self::Always), but only when the predicate over
    /// `(state, last_state)` agrees.
    When(fn(&S, Option<&S>) -> bool),
}

/// What a single [`Throttle::call`] produced.
#[derive(Clone, Debug, PartialEq)]
#[must_use]
pub enum Call<S, A> {
    /// A flush is already pending for the same state; its arguments were
    /// replaced and no timer change is needed.
    Coalesced,
    /// The flush was (re)scheduled. The host must (re)arm its timer for
    /// `deadline`, and dispatch `leading` right away if present.
    Scheduled {
        /// Arguments to dispatch immediately.
        leading: Option<(S, A)>,
        /// When the trailing flush is due.
        deadline: HostTime,
    },
}

/// Leading/trailing throttle keyed by a gating state.
///
/// See the [module docs](self) for the dispatch rules.
#[derive(Clone, Debug)]
pub struct Throttle<S, A> {
    delay: Duration,
    leading: LeadingEdge<S>,
    last_state: Option<S>,
    pending: Option<(S, A)>,
    deadline: Option<HostTime>,
}

impl<S: Clone + PartialEq, A: Clone> Throttle<S, A> {
    /// Creates an idle throttle with the given window and leading policy.
    #[must_use]
    pub const fn new(delay: Duration, leading: LeadingEdge<S>) -> Self {
        Self {
            delay,
            leading,
            last_state: None,
            pending: None,
            deadline: None,
        }
    }

    /// Returns the throttle window.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns when the pending flush is due, if one is pending.
    #[must_use]
    pub const fn deadline(&self) -> Option<HostTime> {
        self.deadline
    }

    /// Returns `true` if a trailing flush is pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Registers one event.
    pub fn call(&mut self, now: HostTime, state: S, args: A) -> Call<S, A> {
        let state_changed = self.last_state.as_ref() != Some(&state);

        if self.deadline.is_some() && !state_changed {
            if let Some((_, pending_args)) = &mut self.pending {
                *pending_args = args;
            }
            return Call::Coalesced;
        }

        let allowed = match self.leading {
            LeadingEdge::Never => false,
            LeadingEdge::Always => true,
            LeadingEdge::When(predicate) => predicate(&state, self.last_state.as_ref()),
        };
        let leading = allowed.then(|| (state.clone(), args.clone()));

        let deadline = now.saturating_add(self.delay);
        self.last_state = Some(state.clone());
        self.pending = Some((state, args));
        self.deadline = Some(deadline);

        Call::Scheduled { leading, deadline }
    }

    /// Returns the pending call if its deadline has passed at `now`.
    pub fn poll(&mut self, now: HostTime) -> Option<(S, A)> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.flush(),
            _ => None,
        }
    }

    /// Returns the pending call regardless of its deadline.
    ///
    /// Timer-driven hosts call this from the timer callback; the timer is the
    /// authority on when the window closed.
    pub fn flush(&mut self) -> Option<(S, A)> {
        self.deadline = None;
        self.pending.take()
    }

    /// Drops any pending call. The last gating state is kept.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.pending = None;
    }
}
