//! Wall-clock abstraction.
//!
//! - `SystemClock`: delegates to `SystemTime::now()`
//! - `FixedClock`: returns a controllable time, for tests

use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of the current wall-clock time.
///
/// Signature verification compares Slack's request timestamp (unix seconds)
/// against this clock, so it must be wall time rather than a monotonic instant.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> SystemTime;

    /// Seconds since the unix epoch. Times before the epoch read as negative.
    fn unix_secs(&self) -> i64 {
        match self.now().duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            Err(e) => -(e.duration().as_secs() as i64),
        }
    }

    /// Nanoseconds since the unix epoch, saturating at zero.
    fn unix_nanos(&self) -> u128 {
        self.now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    }
}

#[derive(Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Clock pinned to a given time; only moves when `advance()` is called.
#[derive(Clone)]
pub struct FixedClock {
    current: Arc<Mutex<SystemTime>>,
}

impl FixedClock {
    pub fn at_unix_secs(secs: u64) -> Self {
        Self {
            current: Arc::new(Mutex::new(UNIX_EPOCH + Duration::from_secs(secs))),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|p| p.into_inner());
        *current += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> SystemTime {
        *self.current.lock().unwrap_or_else(|p| p.into_inner())
    }
}
