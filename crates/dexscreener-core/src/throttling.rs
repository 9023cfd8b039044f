use std::num::NonZeroU32;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use governor::clock::{Clock, DefaultClock};
use governor::state::direct::NotKeyed;
use governor::state::InMemoryState;
use governor::Quota;
use tracing::trace;

use crate::config::RateLimit;

type DirectRateLimiter = governor::RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Shared call budget. Callers over budget wait for a slot; they are never refused.
///
/// Clones share the same budget, and the limiter may be used from blocking threads
/// and async tasks at the same time.
#[derive(Clone)]
pub struct RateLimiter {
    limiter: Arc<DirectRateLimiter>,
    clock: DefaultClock,
    in_flight: Arc<AtomicUsize>,
    rate_limit: RateLimit,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("rate_limit", &self.rate_limit)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

impl RateLimiter {
    pub fn new(rate_limit: RateLimit) -> Self {
        let quota = quota_from_window(rate_limit.period(), rate_limit.calls());
        Self {
            limiter: Arc::new(governor::RateLimiter::direct(quota)),
            clock: DefaultClock::default(),
            in_flight: Arc::new(AtomicUsize::new(0)),
            rate_limit,
        }
    }

    pub const fn rate_limit(&self) -> RateLimit {
        self.rate_limit
    }

    /// Blocks the calling thread until a slot is available.
    pub fn acquire_blocking(&self) -> Permit {
        loop {
            match self.limiter.check() {
                Ok(()) => break,
                Err(not_until) => {
                    let wait = not_until.wait_time_from(self.clock.now());
                    trace!(wait_ms = wait.as_millis() as u64, "rate budget exhausted, sleeping");
                    if wait.is_zero() {
                        std::thread::yield_now();
                    } else {
                        std::thread::sleep(wait);
                    }
                }
            }
        }
        Permit::new(Arc::clone(&self.in_flight))
    }

    /// Suspends the calling task until a slot is available.
    pub async fn acquire(&self) -> Permit {
        self.limiter.until_ready().await;
        Permit::new(Arc::clone(&self.in_flight))
    }

    /// Takes a slot only if one is free right now.
    pub fn try_acquire(&self) -> Option<Permit> {
        self.limiter
            .check()
            .ok()
            .map(|()| Permit::new(Arc::clone(&self.in_flight)))
    }

    /// Number of permits currently held.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// One acquired call slot, released when dropped.
#[derive(Debug)]
#[must_use = "the slot is released as soon as the permit is dropped"]
pub struct Permit {
    in_flight: Arc<AtomicUsize>,
}

impl Permit {
    fn new(in_flight: Arc<AtomicUsize>) -> Self {
        in_flight.fetch_add(1, Ordering::AcqRel);
        Self { in_flight }
    }
}

impl Drop for Permit {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }
}

/// One cell every `window / limit` with a burst of one, so no `window`-long span
/// ever admits more than `limit` calls.
fn quota_from_window(quota_window: Duration, quota_limit: NonZeroU32) -> Quota {
    let per_cell = (quota_window / quota_limit.get()).max(Duration::from_nanos(1));

    Quota::with_period(per_cell).unwrap_or_else(|| Quota::per_second(quota_limit))
}
