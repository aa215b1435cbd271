// Window focus tracking from host visibility-change notifications.
// Hosts without a visibility API leave the probe permanently focused.

use crate::error::ProbeError;
use crate::types::VisibilityState;

/// Handler invoked with the new page visibility on every change notification.
pub type VisibilityHandler = Box<dyn FnMut(VisibilityState)>;

/// Host capability for page visibility notifications.
pub trait VisibilitySignal {
    /// Whether the host exposes any known visibility API.
    fn supports_visibility_signal(&self) -> bool;

    /// Registers `handler` for visibility changes. Only called when supported.
    fn on_visibility_change(&mut self, handler: VisibilityHandler) -> Result<(), ProbeError>;
}

/// Holds the "window is focused" signal read by the viewability state machine.
#[derive(Debug, Clone)]
pub struct FocusTracker {
    focused: bool,
    gated: bool,
}

impl FocusTracker {
    pub fn new() -> Self {
        FocusTracker {
            focused: true,
            gated: true,
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether visibility changes still affect the signal.
    pub fn is_gated(&self) -> bool {
        self.gated
    }

    pub fn on_visibility_change(&mut self, state: VisibilityState) {
        if !self.gated {
            return;
        }
        self.focused = state == VisibilityState::Visible;
    }

    /// Fallback for hosts without a visibility API: stay focused for the session.
    pub fn disable_gating(&mut self) {
        self.gated = false;
        self.focused = true;
    }
}

impl Default for FocusTracker {
    fn default() -> Self {
        Self::new()
    }
}
