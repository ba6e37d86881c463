//! Notification-level diagnostics on stderr.
//!
//! A single process-wide level decides which messages are printed:
//!
//! | level | meaning                                  |
//! |-------|------------------------------------------|
//! | 0     | silent                                   |
//! | 1     | errors (default)                         |
//! | 2     | warnings, e.g. dispatcher fallback       |
//! | 3     | informational summaries                  |
//! | 4     | debug: pool start/stop, frame headers    |
//! | 5     | trace: per-block sizes                   |

use std::sync::atomic::{AtomicI32, Ordering};

/// Current notification level.
pub static DISPLAY_LEVEL: AtomicI32 = AtomicI32::new(1);

/// Set the notification level for all subsequent messages.
pub fn set_display_level(level: i32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Returns the current notification level.
#[inline]
pub fn display_level() -> i32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Conditionally print to stderr at or above `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::display::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}
