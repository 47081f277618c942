//! Time source for the demo timeline
//!
//! The sequencer only ever asks "how long since the clock started", so a
//! [`Clock`] reports a monotonic [`Duration`]. Production code uses
//! [`SystemClock`]; tests drive a [`ManualClock`] by hand.
//!
//! # Example
//!
//! ```
//! use goldrush::sequencer::{Clock, ManualClock};
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! clock.advance(Duration::from_millis(160));
//! assert_eq!(clock.now(), Duration::from_millis(160));
//! ```

use std::fmt::Debug;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub trait Clock: Send + Sync + Debug {
    /// Time elapsed since the clock's origin. Never goes backwards.
    fn now(&self) -> Duration;
}

/// Wall clock anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    elapsed: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut elapsed) = self.elapsed.lock() {
            *elapsed += by;
        }
    }

    /// Jump to `at`; earlier values are ignored so time stays monotonic.
    pub fn set(&self, at: Duration) {
        if let Ok(mut elapsed) = self.elapsed.lock() {
            *elapsed = (*elapsed).max(at);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.elapsed.lock().map(|elapsed| *elapsed).unwrap_or_default()
    }
}
