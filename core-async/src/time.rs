//! Time-related abstractions.
//!
//! `Instant` is Tokio's instant so that code measuring elapsed time follows
//! the runtime clock, including the paused clock used by tests.
//!
//! # Examples
//!
//! ```rust
//! use core_async::time::{sleep, Duration, Instant};
//!
//! async fn example() {
//!     let start = Instant::now();
//!     sleep(Duration::from_millis(10)).await;
//!     println!("Took {:?}", start.elapsed());
//! }
//! ```

pub use std::time::{Duration, SystemTime, UNIX_EPOCH};
pub use tokio::time::{sleep, sleep_until, timeout, Instant, Sleep, Timeout};

use tokio_util::sync::CancellationToken;

// ============================================================================
// Cancellable waits
// ============================================================================

/// How a cancellable wait finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full duration elapsed.
    Elapsed,
    /// The token was cancelled first.
    Cancelled,
}

impl WaitOutcome {
    pub fn is_elapsed(self) -> bool {
        matches!(self, WaitOutcome::Elapsed)
    }
}

/// Sleeps for `duration` unless `token` is cancelled first.
///
/// A token that is already cancelled returns immediately, even for a zero
/// duration.
pub async fn sleep_or_cancel(duration: Duration, token: &CancellationToken) -> WaitOutcome {
    tokio::select! {
        biased;
        _ = token.cancelled() => WaitOutcome::Cancelled,
        _ = sleep(duration) => WaitOutcome::Elapsed,
    }
}
