//! Workspace umbrella crate.
//!
//! Re-exports the workspace crates behind feature flags so host applications
//! can depend on `playlist-workspace` alone. `service` (default) exposes the
//! full catalog-backed façade; `playback` exposes the standalone engine.

#[cfg(feature = "service")]
pub use core_service;

#[cfg(feature = "playback")]
pub use core_playback;
