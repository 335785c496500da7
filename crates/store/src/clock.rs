//! Time sources for entry timestamps.

use time::UtcDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Source of "now" for the store.
pub trait Clock: Send + Sync {
    fn now(&self) -> UtcDateTime;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> UtcDateTime {
        UtcDateTime::now()
    }
}

/// Display form of an entry timestamp, e.g. `2024-03-01 14:05:09`.
pub fn format_timestamp(timestamp: UtcDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).unwrap_or_else(|_| timestamp.unix_timestamp().to_string())
}

/// Manually advanced clock for tests.
///
/// Do NOT restrict this to `#[cfg(test)]` only; other crates enable the
/// `mock` feature to use it in their own tests.
#[cfg(any(test, feature = "mock"))]
#[derive(Debug)]
pub struct ManualClock {
    now: std::sync::Mutex<UtcDateTime>,
}
#[cfg(any(test, feature = "mock"))]
impl ManualClock {
    pub fn new(start: UtcDateTime) -> Self {
        Self { now: std::sync::Mutex::new(start) }
    }

    pub fn advance(&self, by: time::Duration) {
        let mut now = self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        *now = *now + by;
    }
}
#[cfg(any(test, feature = "mock"))]
impl Clock for ManualClock {
    fn now(&self) -> UtcDateTime {
        *self.now.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
#[cfg(any(test, feature = "mock"))]
impl Clock for std::sync::Arc<ManualClock> {
    fn now(&self) -> UtcDateTime {
        self.as_ref().now()
    }
}
