// viewability_probe: Rust/WASM probe for the on-screen viewability of one element.
// Geometry, state machine and scheduling are host-agnostic; `web` wires them to the DOM.

mod clicks;
mod error;
mod focus;
mod geometry;
mod report;
mod scheduler;
mod tracker;
mod types;
mod viewability;
mod web;

use wasm_bindgen::prelude::*;

pub use clicks::ClickCounter;
pub use error::ProbeError;
pub use focus::{FocusTracker, VisibilityHandler, VisibilitySignal};
pub use geometry::{
    axis_overlap, horizontal_overlap, percent_viewable, round_to_hundredths, vertical_overlap,
};
pub use scheduler::{Clock, Scheduler, Sleeper, TICK_INTERVAL};
pub use tracker::{watch_visibility, LayoutSource, SharedTracker, ViewabilityTracker};
pub use types::*;
pub use viewability::{ViewState, ViewabilityStateMachine};
pub use web::{DocumentVisibility, DomLayout, PerformanceClock, TimeoutSleeper, ViewabilityProbe};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
