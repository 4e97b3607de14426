//! # Playback Engine
//!
//! Drives an ordered playlist: tracks which track is current, advances
//! automatically when a track's duration elapses, and exposes
//! play/pause/next/previous/stop controls that are safe to call from any
//! number of threads while the timer runs in the background.
//!
//! ## Overview
//!
//! All mutable state (track list, cursor, playback state, the live session)
//! sits behind one `parking_lot::Mutex`. Control operations are synchronous:
//! they take the lock, validate, mutate, and return. Timing is owned by a
//! *playback session*, a Tokio task spawned when playback starts:
//!
//! ```text
//!             ┌──────────── lock ────────────┐
//!  play()  ─> │ status = Playing, spawn      │ ──> session task
//!  pause() ─> │ status = Paused, interrupt   │       │  wait(track duration)
//!  next()  ─> │ move cursor, replace session │       │  or park until resumed
//!  stop()  ─> │ cancel session               │       │  or exit on cancel
//!             └──────────────────────────────┘ <─────┘  advance on elapse
//! ```
//!
//! A session waits on three things at once: the current track's remaining
//! budget, a pause interruption, and its own [`CancellationToken`]. Next,
//! Prev and Stop cancel the token under the lock; a completion that loses
//! that race re-checks under the lock that its session is still the live
//! one and does nothing otherwise, so the cursor is never advanced twice.
//!
//! Notification futures are registered (`Notified::enable`) while the lock
//! is held, so a pause or resume issued right after the session released
//! the lock is never missed.
//!
//! ## Usage
//!
//! ```rust
//! use core_playback::{PlaybackEngine, PlaybackState};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> core_playback::Result<()> {
//! let engine = PlaybackEngine::default();
//! engine.add_track("Song 1", Duration::from_secs(150))?;
//! engine.add_track("Song 2", Duration::from_secs(150))?;
//!
//! engine.play()?;
//! engine.next()?;
//!
//! assert_eq!(engine.state(), PlaybackState::Playing);
//! assert_eq!(engine.current_track().unwrap().title(), "Song 2");
//! # Ok(())
//! # }
//! ```

use crate::config::PlaybackConfig;
use crate::error::{PlaybackError, Result};
use crate::playlist::Playlist;
use crate::track::Track;
use core_async::runtime::{self, Handle};
use core_async::sync::{CancellationToken, Notify};
use core_async::task;
use core_async::time::{sleep_or_cancel, Duration, Instant, WaitOutcome};
use core_runtime::events::{CoreEvent, EventBus, PlaybackEvent, TrackChangeReason};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::pin::pin;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

// ============================================================================
// Public State Types
// ============================================================================

/// Playback state of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No session is running. The cursor, if set, is kept.
    #[default]
    Stopped,
    /// A session is waiting out the current track.
    Playing,
    /// A session is parked until resumed or stopped.
    Paused,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, Self::Paused)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Stopped => "stopped",
            Self::Playing => "playing",
            Self::Paused => "paused",
        };
        f.write_str(name)
    }
}

/// Consistent view of the engine taken under a single lock acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub current: Option<Track>,
    pub position: Option<usize>,
    pub track_count: usize,
}

// ============================================================================
// Internal State
// ============================================================================

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

struct Session {
    id: u64,
    token: CancellationToken,
}

struct EngineState {
    playlist: Playlist,
    status: PlaybackState,
    session: Option<Session>,
    next_session_id: u64,
    /// Runtime the most recent session was spawned on.
    runtime: Option<Handle>,
    /// When the in-flight wait ends.
    deadline: Option<Instant>,
    /// Unelapsed budget recorded by a pause under the preserve policy.
    remaining: Option<Duration>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            playlist: Playlist::new(),
            status: PlaybackState::Stopped,
            session: None,
            next_session_id: 1,
            runtime: None,
            deadline: None,
            remaining: None,
        }
    }

    fn is_live(&self, session_id: u64) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.id == session_id && !session.token.is_cancelled())
    }

    fn clear_budget(&mut self) {
        self.deadline = None;
        self.remaining = None;
    }

    fn end_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.token.cancel();
        }
        self.clear_budget();
    }

    fn current_title(&self) -> Option<String> {
        self.playlist.current().map(|track| track.title().to_string())
    }
}

struct Shared {
    state: Mutex<EngineState>,
    /// Wakes a parked session after Play resumes.
    resumed: Notify,
    /// Interrupts an in-flight wait after Pause.
    interrupted: Notify,
    config: PlaybackConfig,
    events: Option<EventBus>,
}

impl Shared {
    fn emit(&self, event: PlaybackEvent) {
        if let Some(bus) = &self.events {
            // No subscribers is not an error for the publisher.
            let _ = bus.emit(CoreEvent::Playback(event));
        }
    }

    /// Advances the cursor after the live session's track ran to completion.
    fn complete_track(&self, session_id: u64) {
        let mut state = self.state.lock();
        if !state.is_live(session_id) || !state.status.is_playing() {
            debug!(session_id, "Discarding completion from superseded wait");
            return;
        }

        state.clear_budget();
        let finished = state.current_title();
        let Ok(position) = state.playlist.advance() else {
            return;
        };
        let Some(title) = state.current_title() else {
            return;
        };

        debug!(session_id, position, title = %title, "Track completed, advancing");
        if let Some(finished) = finished {
            self.emit(PlaybackEvent::Completed { title: finished });
        }
        self.emit(PlaybackEvent::TrackChanged {
            title,
            position,
            reason: TrackChangeReason::Completed,
        });
    }
}

enum Step {
    Wait(Duration),
    Park,
    Exit,
}

// ============================================================================
// Playback Engine
// ============================================================================

/// Concurrent playlist playback engine.
///
/// The engine is not `Clone`; share it behind an `Arc`. Dropping it cancels
/// any running session.
pub struct PlaybackEngine {
    shared: Arc<Shared>,
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}

impl PlaybackEngine {
    /// Creates an empty, stopped engine.
    pub fn new(config: PlaybackConfig) -> Self {
        Self::build(config, None)
    }

    /// Creates an empty engine that publishes [`PlaybackEvent`]s on `events`.
    pub fn with_event_bus(config: PlaybackConfig, events: EventBus) -> Self {
        Self::build(config, Some(events))
    }

    fn build(config: PlaybackConfig, events: Option<EventBus>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(EngineState::new()),
                resumed: Notify::new(),
                interrupted: Notify::new(),
                config,
                events,
            }),
        }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.shared.config
    }

    // ------------------------------------------------------------------------
    // Playlist mutation
    // ------------------------------------------------------------------------

    /// Appends a track. The cursor and playback state are untouched.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::InvalidTitle`] if `title` is empty
    /// - [`PlaybackError::InvalidDuration`] if `duration` is zero
    #[instrument(skip(self, title), fields(title = tracing::field::Empty))]
    pub fn add_track(&self, title: impl Into<String>, duration: Duration) -> Result<()> {
        let track = Track::new(title, duration)?;
        tracing::Span::current().record("title", track.title());

        let mut state = self.shared.state.lock();
        state.playlist.push(track);
        debug!(len = state.playlist.len(), "Track added");
        Ok(())
    }

    /// Removes the first track titled `title`, returning the index it held
    /// together with the track.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::EmptyPlaylist`] if there are no tracks
    /// - [`PlaybackError::TrackNotFound`] if no track has this title
    /// - [`PlaybackError::TrackIsPlaying`] if it is the current track, in any state
    #[instrument(skip(self))]
    pub fn remove_track(&self, title: &str) -> Result<(usize, Track)> {
        let mut state = self.shared.state.lock();
        match state.playlist.remove(title) {
            Ok((position, track)) => {
                debug!(position, len = state.playlist.len(), "Track removed");
                Ok((position, track))
            }
            Err(err @ PlaybackError::TrackIsPlaying(_)) => {
                warn!(status = %state.status, "Refusing to remove the current track");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Puts a previously removed track back at `position`.
    ///
    /// Positions past the end append. The current track stays current and
    /// playback state is untouched. Returns the position actually used.
    #[instrument(skip(self, track), fields(title = track.title()))]
    pub fn restore_track(&self, position: usize, track: Track) -> usize {
        let mut state = self.shared.state.lock();
        let position = state.playlist.insert_at(position, track);
        debug!(position, len = state.playlist.len(), "Track restored");
        position
    }

    /// Renames and re-times a track in place.
    ///
    /// The track keeps its position and, if current, stays current. A wait
    /// already in flight keeps its deadline; the new duration applies from
    /// the next wait on this track.
    ///
    /// # Errors
    ///
    /// Checked in order: [`PlaybackError::EmptyPlaylist`],
    /// [`PlaybackError::InvalidTitle`], [`PlaybackError::InvalidDuration`],
    /// [`PlaybackError::TrackNotFound`].
    #[instrument(skip(self))]
    pub fn rename_track(&self, old_title: &str, new_title: &str, duration: Duration) -> Result<()> {
        let mut state = self.shared.state.lock();
        let position = state.playlist.rename(old_title, new_title, duration)?;
        debug!(position, "Track renamed");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Playback control
    // ------------------------------------------------------------------------

    /// Starts or resumes playback.
    ///
    /// From `Stopped` this selects the first track if none is current yet
    /// and spawns a new session. From `Paused` it wakes the parked session.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::EmptyPlaylist`] if there are no tracks
    /// - [`PlaybackError::AlreadyPlaying`] if already playing
    /// - [`PlaybackError::RuntimeUnavailable`] if a session must be spawned
    ///   and no Tokio runtime is reachable
    #[instrument(skip(self))]
    pub fn play(&self) -> Result<()> {
        let mut state = self.shared.state.lock();
        if state.playlist.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }

        match state.status {
            PlaybackState::Playing => Err(PlaybackError::AlreadyPlaying),
            PlaybackState::Paused => {
                state.status = PlaybackState::Playing;
                self.shared.resumed.notify_waiters();

                let position = state.playlist.cursor().unwrap_or_default();
                let title = state.current_title().unwrap_or_default();
                info!(position, title = %title, "Playback resumed");
                self.shared.emit(PlaybackEvent::Resumed { title, position });
                Ok(())
            }
            PlaybackState::Stopped => {
                let handle = runtime::current_handle()
                    .or_else(|| state.runtime.clone())
                    .ok_or(PlaybackError::RuntimeUnavailable)?;

                let position = state
                    .playlist
                    .ensure_cursor()
                    .ok_or(PlaybackError::EmptyPlaylist)?;
                state.status = PlaybackState::Playing;
                self.start_session(&mut state, handle);

                let title = state.current_title().unwrap_or_default();
                info!(position, title = %title, "Playback started");
                self.shared.emit(PlaybackEvent::Started { title, position });
                Ok(())
            }
        }
    }

    /// Pauses playback. The current track will not complete while paused.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::NotPlaying`] if stopped
    /// - [`PlaybackError::AlreadyPaused`] if already paused
    #[instrument(skip(self))]
    pub fn pause(&self) -> Result<()> {
        let mut state = self.shared.state.lock();
        match state.status {
            PlaybackState::Stopped => Err(PlaybackError::NotPlaying),
            PlaybackState::Paused => Err(PlaybackError::AlreadyPaused),
            PlaybackState::Playing => {
                state.status = PlaybackState::Paused;
                if let Some(deadline) = state.deadline.take() {
                    if self.shared.config.preserves_elapsed() {
                        state.remaining = Some(deadline.saturating_duration_since(Instant::now()));
                    }
                }
                self.shared.interrupted.notify_waiters();

                let position = state.playlist.cursor().unwrap_or_default();
                let title = state.current_title().unwrap_or_default();
                info!(position, title = %title, remaining = ?state.remaining, "Playback paused");
                self.shared.emit(PlaybackEvent::Paused { title, position });
                Ok(())
            }
        }
    }

    /// Moves to the next track, wrapping to the first.
    ///
    /// While playing, the timer restarts for the new track. While paused or
    /// stopped only the cursor moves.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::EmptyPlaylist`] if no track is current yet
    #[instrument(skip(self))]
    pub fn next(&self) -> Result<()> {
        self.step(Direction::Forward)
    }

    /// Moves to the previous track, wrapping to the last.
    ///
    /// Same timer and error behaviour as [`next`](Self::next).
    #[instrument(skip(self))]
    pub fn prev(&self) -> Result<()> {
        self.step(Direction::Backward)
    }

    /// Stops playback, keeping the cursor. A later [`play`](Self::play)
    /// starts from the same track with a fresh timer.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::NotPlaying`] if already stopped
    #[instrument(skip(self))]
    pub fn stop(&self) -> Result<()> {
        let mut state = self.shared.state.lock();
        if state.status.is_stopped() {
            return Err(PlaybackError::NotPlaying);
        }

        state.end_session();
        state.status = PlaybackState::Stopped;

        let title = state.current_title();
        info!(title = ?title, "Playback stopped");
        self.shared.emit(PlaybackEvent::Stopped { title });
        Ok(())
    }

    fn step(&self, direction: Direction) -> Result<()> {
        let mut state = self.shared.state.lock();
        if state.playlist.cursor().is_none() {
            return Err(PlaybackError::EmptyPlaylist);
        }

        let restart_on = if state.status.is_playing() {
            let handle = runtime::current_handle()
                .or_else(|| state.runtime.clone())
                .ok_or(PlaybackError::RuntimeUnavailable)?;
            Some(handle)
        } else {
            None
        };

        let position = match direction {
            Direction::Forward => state.playlist.advance()?,
            Direction::Backward => state.playlist.retreat()?,
        };
        state.clear_budget();
        if let Some(handle) = restart_on {
            self.start_session(&mut state, handle);
        }

        let title = state.current_title().unwrap_or_default();
        debug!(position, title = %title, status = %state.status, "Cursor moved");
        self.shared.emit(PlaybackEvent::TrackChanged {
            title,
            position,
            reason: TrackChangeReason::Manual,
        });
        Ok(())
    }

    /// Replaces the live session with a fresh one. Caller holds the lock.
    fn start_session(&self, state: &mut EngineState, handle: Handle) {
        state.end_session();

        let id = state.next_session_id;
        state.next_session_id += 1;
        let token = CancellationToken::new();
        state.session = Some(Session {
            id,
            token: token.clone(),
        });
        state.runtime = Some(handle.clone());

        let shared = Arc::clone(&self.shared);
        task::spawn_on(&handle, run_session(shared, id, token));
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn state(&self) -> PlaybackState {
        self.shared.state.lock().status
    }

    /// The current track, if one has been selected.
    pub fn current_track(&self) -> Option<Track> {
        self.shared.state.lock().playlist.current().cloned()
    }

    /// Index of the current track, if one has been selected.
    pub fn current_position(&self) -> Option<usize> {
        self.shared.state.lock().playlist.cursor()
    }

    /// All tracks in playback order.
    pub fn tracks(&self) -> Vec<Track> {
        self.shared.state.lock().playlist.tracks().to_vec()
    }

    pub fn len(&self) -> usize {
        self.shared.state.lock().playlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.state.lock().playlist.is_empty()
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        let state = self.shared.state.lock();
        PlaybackSnapshot {
            state: state.status,
            current: state.playlist.current().cloned(),
            position: state.playlist.cursor(),
            track_count: state.playlist.len(),
        }
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        let mut state = self.shared.state.lock();
        state.end_session();
        state.status = PlaybackState::Stopped;
    }
}

impl fmt::Debug for PlaybackEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot();
        f.debug_struct("PlaybackEngine")
            .field("state", &snapshot.state)
            .field("position", &snapshot.position)
            .field("track_count", &snapshot.track_count)
            .field("config", &self.shared.config)
            .finish()
    }
}

// ============================================================================
// Session Loop
// ============================================================================

#[instrument(name = "playback_session", skip(shared, token))]
async fn run_session(shared: Arc<Shared>, session_id: u64, token: CancellationToken) {
    debug!("Session started");

    loop {
        let mut resumed = pin!(shared.resumed.notified());
        let mut interrupted = pin!(shared.interrupted.notified());

        let step = {
            let mut state = shared.state.lock();
            if !state.is_live(session_id) {
                Step::Exit
            } else {
                match state.status {
                    PlaybackState::Stopped => Step::Exit,
                    PlaybackState::Paused => {
                        resumed.as_mut().enable();
                        Step::Park
                    }
                    PlaybackState::Playing => match state.playlist.current().map(Track::duration) {
                        None => Step::Exit,
                        Some(full) => {
                            let budget = state.remaining.take().map_or(full, |left| left.min(full));
                            state.deadline = Some(Instant::now() + budget);
                            interrupted.as_mut().enable();
                            Step::Wait(budget)
                        }
                    },
                }
            }
        };

        match step {
            Step::Exit => break,
            Step::Park => {
                core_async::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = resumed => {}
                }
            }
            Step::Wait(budget) => {
                core_async::select! {
                    biased;
                    _ = interrupted => {}
                    outcome = sleep_or_cancel(budget, &token) => match outcome {
                        WaitOutcome::Elapsed => shared.complete_track(session_id),
                        WaitOutcome::Cancelled => break,
                    },
                }
            }
        }
    }

    debug!("Session ended");
}
