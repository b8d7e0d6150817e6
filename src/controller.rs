//! Pagination trigger rule and fetch lifecycle state machine.
//!
//! Sans-IO: the controller never touches the transport. It answers "is a
//! fetch warranted for this window state" and tracks `Idle → InFlight →
//! Idle` transitions (or `→ Exhausted` once the source reports no next
//! cursor). The trigger rule is level-triggered and safe to re-evaluate on
//! every window recomputation; the in-flight state is what prevents
//! re-firing while a fetch is outstanding.

use crate::window::VisibleWindow;

/// Fetch lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchState {
    /// No fetch outstanding; a trigger may start one.
    #[default]
    Idle,
    /// Exactly one fetch outstanding; triggers are suppressed.
    InFlight,
    /// The source reported no next cursor; no fetch will ever fire again.
    Exhausted,
}

/// Decides when the next page must be fetched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginationController {
    state: FetchState,
}

impl PaginationController {
    /// Fresh controller in the idle state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> FetchState {
        self.state
    }

    /// Whether a fetch is outstanding.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.state == FetchState::InFlight
    }

    /// Whether a fetch is warranted for the given window state.
    ///
    /// True iff more data may exist, no fetch is outstanding, and the last
    /// materialized index has reached the final loaded item (the loader
    /// sentinel sits past `total_loaded`, so it counts as reaching the
    /// frontier). An empty window never triggers.
    #[must_use]
    pub fn should_fetch(&self, window: &VisibleWindow, total_loaded: usize, has_more: bool) -> bool {
        if self.state != FetchState::Idle || !has_more {
            return false;
        }
        let Some(last) = window.last_index() else {
            return false;
        };
        last + 1 >= total_loaded
    }

    /// Mark a fetch as started. Returns `false` (and changes nothing) if one
    /// is already outstanding or the source is exhausted.
    pub fn begin(&mut self) -> bool {
        if self.state != FetchState::Idle {
            return false;
        }
        self.state = FetchState::InFlight;
        true
    }

    /// Mark the outstanding fetch as successfully applied.
    ///
    /// `has_more = false` moves the controller to its terminal state.
    pub fn complete(&mut self, has_more: bool) {
        debug_assert_eq!(self.state, FetchState::InFlight, "complete without begin");
        self.state = if has_more {
            FetchState::Idle
        } else {
            FetchState::Exhausted
        };
    }

    /// Mark the outstanding fetch as failed: back to idle with nothing
    /// appended, leaving retry to the next window recomputation.
    pub fn fail(&mut self) {
        debug_assert_eq!(self.state, FetchState::InFlight, "fail without begin");
        self.state = FetchState::Idle;
    }
}
