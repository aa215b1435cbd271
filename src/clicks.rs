// Click counting on the tracked element.

/// Monotonic count of clicks delivered for the target element.
#[derive(Debug, Clone, Default)]
pub struct ClickCounter {
    count: u64,
}

impl ClickCounter {
    pub fn new() -> Self {
        ClickCounter { count: 0 }
    }

    /// Every delivered click counts; no deduplication or rate limiting.
    pub fn on_click(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}
