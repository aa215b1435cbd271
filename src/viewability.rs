// Viewability state machine: turns per-tick overlap readings into cumulative viewable time.
// See DESIGN.md: ViewabilityStateMachine
//
// Time is only folded into the cumulative total when viewability is lost. While the
// element stays viewable, queries add the in-progress interval on the fly.

use crate::geometry::percent_viewable;
use crate::types::{OverlapFraction, Timestamp};

/// Viewability state. `Viewable` carries the start of the current viewable interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    NotViewable,
    Viewable { since: Timestamp },
}

#[derive(Debug, Clone)]
pub struct ViewabilityStateMachine {
    threshold: f64,
    state: ViewState,
    percent_viewable: f64,
    cumulative_us: u64,
}

impl ViewabilityStateMachine {
    pub fn new(threshold: f64) -> Self {
        ViewabilityStateMachine {
            threshold,
            state: ViewState::NotViewable,
            percent_viewable: 0.0,
            cumulative_us: 0,
        }
    }

    /// Evaluates one tick from both axis fractions and the current focus signal.
    pub fn tick(
        &mut self,
        vertical: OverlapFraction,
        horizontal: OverlapFraction,
        focused: bool,
        now: Timestamp,
    ) -> ViewState {
        self.percent_viewable = percent_viewable(vertical, horizontal);
        let viewable = self.percent_viewable >= self.threshold && focused;

        match (viewable, self.state) {
            (false, ViewState::Viewable { since }) => {
                self.cumulative_us = self.cumulative_us.saturating_add(now.micros_since(since));
                self.state = ViewState::NotViewable;
                tracing::debug!(
                    percent = self.percent_viewable,
                    focused,
                    cumulative_secs = self.cumulative_secs(),
                    "element left viewability"
                );
            }
            (true, ViewState::NotViewable) => {
                self.state = ViewState::Viewable { since: now };
                tracing::debug!(
                    percent = self.percent_viewable,
                    threshold = self.threshold,
                    "element became viewable"
                );
            }
            _ => {}
        }

        self.state
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn is_viewable(&self) -> bool {
        matches!(self.state, ViewState::Viewable { .. })
    }

    /// Start of the current viewable interval, if any.
    pub fn viewable_since(&self) -> Option<Timestamp> {
        match self.state {
            ViewState::Viewable { since } => Some(since),
            ViewState::NotViewable => None,
        }
    }

    pub fn percent_viewable(&self) -> f64 {
        self.percent_viewable
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Viewable time already folded into the total, excluding any open interval.
    pub fn cumulative_secs(&self) -> f64 {
        self.cumulative_us as f64 / 1_000_000.0
    }

    /// Viewable time as of `now`, including the open interval. Does not mutate.
    pub fn viewable_time_at(&self, now: Timestamp) -> f64 {
        let open = self
            .viewable_since()
            .map_or(0, |since| now.micros_since(since));
        self.cumulative_us.saturating_add(open) as f64 / 1_000_000.0
    }
}
