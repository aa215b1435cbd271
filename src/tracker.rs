// Single owner of all viewability metrics for the session.
// Scheduler ticks, visibility events and clicks all go through here.

use std::cell::RefCell;
use std::rc::Rc;

use crate::clicks::ClickCounter;
use crate::error::ProbeError;
use crate::focus::{FocusTracker, VisibilitySignal};
use crate::geometry::{horizontal_overlap, vertical_overlap};
use crate::types::{
    ProbeConfig, Rect, Timestamp, ViewabilitySnapshot, ViewportSize, VisibilityState,
};
use crate::viewability::{ViewState, ViewabilityStateMachine};

/// Live layout reads for the tracked element and the window.
pub trait LayoutSource {
    fn target_rect(&self) -> Rect;
    fn viewport(&self) -> ViewportSize;
}

/// Tracker shared between the scheduler loop and host event handlers.
/// Everything runs on one thread; borrows never span an await point.
pub type SharedTracker = Rc<RefCell<ViewabilityTracker>>;

#[derive(Debug, Clone)]
pub struct ViewabilityTracker {
    machine: ViewabilityStateMachine,
    focus: FocusTracker,
    clicks: ClickCounter,
}

impl ViewabilityTracker {
    pub fn new(config: &ProbeConfig) -> Result<Self, ProbeError> {
        config.validate()?;
        Ok(ViewabilityTracker {
            machine: ViewabilityStateMachine::new(config.threshold),
            focus: FocusTracker::new(),
            clicks: ClickCounter::new(),
        })
    }

    pub fn into_shared(self) -> SharedTracker {
        Rc::new(RefCell::new(self))
    }

    /// One scheduler tick: fresh layout read, overlap on both axes, state update.
    pub fn tick<L: LayoutSource + ?Sized>(&mut self, layout: &L, now: Timestamp) -> ViewState {
        let rect = layout.target_rect();
        let viewport = layout.viewport();
        let vertical = vertical_overlap(&rect, &viewport);
        let horizontal = horizontal_overlap(&rect, &viewport);

        let state = self
            .machine
            .tick(vertical, horizontal, self.focus.is_focused(), now);
        tracing::trace!(
            vertical,
            horizontal,
            percent = self.machine.percent_viewable(),
            viewable = self.machine.is_viewable(),
            "viewability tick"
        );
        state
    }

    pub fn on_visibility_change(&mut self, state: VisibilityState) {
        tracing::debug!(?state, "page visibility changed");
        self.focus.on_visibility_change(state);
    }

    pub fn on_click(&mut self) {
        self.clicks.on_click();
    }

    /// Snapshot as of `now`, folding in any viewable interval still open.
    pub fn snapshot(&self, now: Timestamp) -> ViewabilitySnapshot {
        ViewabilitySnapshot {
            is_viewable: self.machine.is_viewable(),
            percent_viewable: self.machine.percent_viewable(),
            viewable_time_seconds: self.machine.viewable_time_at(now),
            click_count: self.clicks.count(),
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focus.is_focused()
    }

    pub fn focus(&self) -> &FocusTracker {
        &self.focus
    }

    pub fn machine(&self) -> &ViewabilityStateMachine {
        &self.machine
    }

    pub fn click_count(&self) -> u64 {
        self.clicks.count()
    }

    fn disable_focus_gating(&mut self) {
        self.focus.disable_gating();
    }
}

/// Wires a host visibility signal to the tracker's focus state.
///
/// Returns `Ok(false)` when the host has no visibility API; focus then stays
/// `true` for the rest of the session.
pub fn watch_visibility<S: VisibilitySignal + ?Sized>(
    signal: &mut S,
    tracker: &SharedTracker,
) -> Result<bool, ProbeError> {
    if !signal.supports_visibility_signal() {
        tracing::warn!("no page visibility API available, focus gating disabled");
        tracker.borrow_mut().disable_focus_gating();
        return Ok(false);
    }

    let handle = Rc::clone(tracker);
    signal.on_visibility_change(Box::new(move |state| {
        handle.borrow_mut().on_visibility_change(state);
    }))?;
    Ok(true)
}
