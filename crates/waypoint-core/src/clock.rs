use jiff::{SignedDuration, Timestamp};
use std::sync::Mutex;

/// Source of the current time for expiry decisions.
///
/// Exists so expiry logic stays deterministic under test: inject a
/// [`ManualClock`] instead of the real [`SystemClock`].
pub trait Clock: Send + Sync {
    /// Returns the current time of the clock.
    fn now(&self) -> Timestamp;
}

// A shared handle to a clock is a clock, so callers can keep a handle to
// a ManualClock they hand to the registry.
impl<C: Clock> Clock for std::sync::Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Clock backed by the real system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
///
/// Public rather than test-only because registry and store tests in other
/// crates drive expiry through it.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    /// Creates a manual clock frozen at the given instant.
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Moves the clock forward by the given duration.
    pub fn advance(&self, by: SignedDuration) {
        let mut now = self
            .now
            .lock()
            .expect("manual clock lock should not be poisoned");
        *now = *now + by;
    }

    /// Jumps the clock to a specific instant.
    pub fn set(&self, to: Timestamp) {
        let mut now = self
            .now
            .lock()
            .expect("manual clock lock should not be poisoned");
        *now = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self
            .now
            .lock()
            .expect("manual clock lock should not be poisoned")
    }
}
