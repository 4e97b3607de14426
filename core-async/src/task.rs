//! Task spawning and execution.
//!
//! Thin wrappers over `tokio::task`. Spawned futures must be `Send` because
//! the multi-threaded scheduler may move them between worker threads.
//!
//! # Examples
//!
//! ```rust
//! use core_async::task;
//!
//! async fn example() {
//!     let handle = task::spawn(async { 42 });
//!     let result = handle.await.unwrap();
//!     assert_eq!(result, 42);
//! }
//! ```

pub use tokio::task::{yield_now, JoinError, JoinHandle};

use crate::runtime::Handle;

/// Spawns a new asynchronous task on the current Tokio runtime.
///
/// # Panics
///
/// Panics when called outside a runtime context. Use [`spawn_on`] with a
/// handle obtained from [`crate::runtime::current_handle`] when the caller
/// cannot guarantee one.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    tokio::task::spawn(future)
}

/// Spawns a task on an explicit runtime handle.
pub fn spawn_on<F>(handle: &Handle, future: F) -> JoinHandle<F::Output>
where
    F: std::future::Future + Send + 'static,
    F::Output: Send + 'static,
{
    handle.spawn(future)
}

/// Result type for task operations.
pub type Result<T> = std::result::Result<T, JoinError>;
