//! Async abstraction layer for the playlist core.
//!
//! Every core-* crate depends on this crate instead of reaching for Tokio
//! directly, so the executor-facing surface (spawning, timers, notification
//! primitives, cancellation) lives in one place.
//!
//! # Modules
//!
//! - `task`: Task spawning and execution
//! - `time`: Sleep, instants and cancellable waits
//! - `sync`: Notification primitives, channels and cancellation tokens
//! - `runtime`: Access to the ambient runtime handle and `block_on`
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::CancellationToken;
//! use core_async::time::{sleep_or_cancel, Duration, WaitOutcome};
//!
//! async fn example() {
//!     let token = CancellationToken::new();
//!     token.cancel();
//!
//!     let outcome = sleep_or_cancel(Duration::from_secs(5), &token).await;
//!     assert_eq!(outcome, WaitOutcome::Cancelled);
//! }
//! ```

pub mod runtime;
pub mod sync;
pub mod task;
pub mod time;

pub use task::spawn;
pub use time::{sleep, Duration, Instant};
pub use tokio::select;
