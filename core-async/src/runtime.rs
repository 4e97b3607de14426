//! Runtime utilities that wrap Tokio's runtime primitives so downstream
//! crates never need to depend on Tokio directly.

pub use tokio::runtime::{Builder, Handle, Runtime};

/// Returns a handle to the runtime driving the current thread, if any.
///
/// Synchronous APIs that need to start background work use this to fail
/// cleanly instead of panicking when called outside a runtime.
pub fn current_handle() -> Option<Handle> {
    Handle::try_current().ok()
}

/// Runs the provided future to completion on a fresh current-thread runtime.
pub fn block_on<F>(future: F) -> std::io::Result<F::Output>
where
    F: std::future::Future,
{
    let runtime = Builder::new_current_thread().enable_all().build()?;
    Ok(runtime.block_on(future))
}
