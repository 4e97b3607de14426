//! Synchronization primitives.
//!
//! Async-aware primitives from `tokio::sync` plus the cancellation token
//! from `tokio-util`. All of them are `Send + Sync`.
//!
//! # Examples
//!
//! ```rust
//! use core_async::sync::Notify;
//! use std::sync::Arc;
//!
//! async fn example() {
//!     let notify = Arc::new(Notify::new());
//!     let waiter = notify.clone();
//!
//!     core_async::spawn(async move { waiter.notified().await });
//!     notify.notify_waiters();
//! }
//! ```

pub use tokio::sync::{
    broadcast, mpsc, oneshot, watch, Mutex, MutexGuard, Notify, RwLock, RwLockReadGuard,
    RwLockWriteGuard,
};
pub use tokio::sync::futures::Notified;
pub use tokio_util::sync::{CancellationToken, DropGuard, WaitForCancellationFuture};
