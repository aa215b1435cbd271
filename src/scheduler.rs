// Fixed-cadence tick loop. The next tick is scheduled only after the current one
// finishes, so ticks never overlap and the real period is interval + evaluation time.
// See DESIGN.md: Scheduler

use std::future::Future;
use std::pin::pin;
use std::time::Duration;

use futures::future::{select, Either};
use tokio_util::sync::CancellationToken;

use crate::tracker::{LayoutSource, SharedTracker};
use crate::types::Timestamp;

/// Nominal delay between the end of one tick and the start of the next.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Time source for tick evaluation and snapshot queries.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Delay primitive for the tick loop.
pub trait Sleeper {
    type Sleep: Future<Output = ()>;

    fn sleep(&self, duration: Duration) -> Self::Sleep;
}

pub struct Scheduler<C, S> {
    clock: C,
    sleeper: S,
    token: CancellationToken,
}

impl<C: Clock, S: Sleeper> Scheduler<C, S> {
    pub fn new(clock: C, sleeper: S) -> Self {
        Scheduler {
            clock,
            sleeper,
            token: CancellationToken::new(),
        }
    }

    /// Uses an externally owned token, so the loop can be stopped from elsewhere.
    pub fn with_token(clock: C, sleeper: S, token: CancellationToken) -> Self {
        Scheduler {
            clock,
            sleeper,
            token,
        }
    }

    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Runs ticks until the token is cancelled. The first tick is immediate.
    /// Returns the number of ticks evaluated.
    pub async fn run<L: LayoutSource + ?Sized>(
        &self,
        tracker: &SharedTracker,
        layout: &L,
    ) -> u64 {
        tracing::info!(
            interval_ms = TICK_INTERVAL.as_millis() as u64,
            "viewability scheduler started"
        );
        let mut ticks = 0u64;

        while !self.token.is_cancelled() {
            let now = self.clock.now();
            tracker.borrow_mut().tick(layout, now);
            ticks += 1;

            let sleep = pin!(self.sleeper.sleep(TICK_INTERVAL));
            let cancelled = pin!(self.token.cancelled());
            if let Either::Right(_) = select(sleep, cancelled).await {
                break;
            }
        }

        tracing::info!(ticks, "viewability scheduler stopped");
        ticks
    }
}
