//! Injectable time source.

use std::fmt::Debug;

/// Source of the current Unix time in seconds.
pub trait Clock: Send + Sync + Debug {
    /// Current Unix time, in whole seconds.
    fn now_unix_seconds(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_seconds(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// A clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_unix_seconds(&self) -> i64 {
        self.0
    }
}
