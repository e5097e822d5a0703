//! Token-bucket admission control for outbound calls
//!
//! Every dispatched request passes through here before touching the wire.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Rates below this are clamped up; a zero rate would never admit anything.
pub const MIN_RATE_PER_MINUTE: u32 = 1;

/// Rate used when the client owner configures none
pub const DEFAULT_RATE_PER_MINUTE: u32 = 60;

#[derive(Debug)]
struct LimiterState {
    next_slot: Instant,
}

/// Token bucket with burst capacity one.
///
/// The first call is admitted immediately; each subsequent call waits out the
/// refill interval derived from the configured permits-per-minute rate.
/// Waiting suspends the task, it never spins. Rates below
/// [`MIN_RATE_PER_MINUTE`] are clamped up to it rather than rejected.
///
/// Reconfiguration happens by replacing the limiter wholesale (see
/// [`Client::set_rate_limit`](crate::Client::set_rate_limit)); callers
/// already suspended keep waiting against the instance they hold.
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,
    state: Mutex<LimiterState>,
}

impl RateLimiter {
    pub fn per_minute(rate: u32) -> Self {
        let rate = rate.max(MIN_RATE_PER_MINUTE);
        // permits/minute to seconds-per-permit
        let interval = Duration::from_secs_f64(60.0 / f64::from(rate));
        Self {
            interval,
            state: Mutex::new(LimiterState {
                next_slot: Instant::now(),
            }),
        }
    }

    /// Seconds between permits after the burst is spent
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Suspend until a permit is free or `cancel` fires.
    ///
    /// An already-cancelled token fails immediately. A wait that is cancelled
    /// consumes nothing: the slot is only claimed under the lock, never
    /// reserved across the sleep.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Result<()> {
        loop {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let wait = {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                if state.next_slot <= now {
                    state.next_slot = now + self.interval;
                    return Ok(());
                }
                state.next_slot - now
            };

            tokio::select! {
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }
}
