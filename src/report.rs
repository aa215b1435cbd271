// Human-readable console report for a snapshot.

use std::fmt;

use crate::types::ViewabilitySnapshot;

impl fmt::Display for ViewabilitySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Ad is viewable: {},",
            if self.is_viewable { "Yes" } else { "No" }
        )?;
        writeln!(f, "Percentage viewable: {:.2}%,", self.percent_viewable)?;
        // Whole seconds, truncated.
        writeln!(
            f,
            "Viewability time of the ad in sec: {} sec.,",
            self.viewable_time_seconds.trunc() as u64
        )?;
        write!(f, "No of Clicks: {}", self.click_count)
    }
}
