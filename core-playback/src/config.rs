//! # Playback Configuration
//!
//! Configuration types for the playback engine.

use serde::{Deserialize, Serialize};

/// What a resumed track waits for after a pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResumePolicy {
    /// Wait the track's full duration again from the moment of resume.
    #[default]
    Restart,
    /// Wait only the time that was left when the track was paused.
    Preserve,
}

/// Playback engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// How a paused track resumes.
    ///
    /// Default: [`ResumePolicy::Restart`].
    #[serde(default)]
    pub resume_policy: ResumePolicy,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            resume_policy: ResumePolicy::default(),
        }
    }
}

impl PlaybackConfig {
    /// Configuration that resumes paused tracks with their remaining time.
    pub fn preserving_elapsed() -> Self {
        Self {
            resume_policy: ResumePolicy::Preserve,
        }
    }

    pub fn with_resume_policy(mut self, policy: ResumePolicy) -> Self {
        self.resume_policy = policy;
        self
    }

    /// Returns `true` if a paused track keeps its elapsed time.
    pub fn preserves_elapsed(&self) -> bool {
        self.resume_policy == ResumePolicy::Preserve
    }
}
