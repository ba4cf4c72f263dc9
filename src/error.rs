use thiserror::Error;

/// Failures surfaced to the host player.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Credentials rejected at login.
    #[error("authentication failed: {reason}")]
    Authentication { reason: String },

    /// Anything that went wrong while resolving a browse path. No partial tree is returned.
    #[error("browse of '{path}' failed: {reason}")]
    Browse { path: String, reason: String },

    #[error("could not resolve stream for track '{track_id}': {reason}")]
    StreamResolution { track_id: String, reason: String },

    #[error("playback command '{command}' failed: {reason}")]
    Playback { command: String, reason: String },

    #[error("not logged in")]
    NotLoggedIn,
}

impl AdapterError {
    pub fn browse(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        AdapterError::Browse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn stream(track_id: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        AdapterError::StreamResolution {
            track_id: track_id.into(),
            reason: reason.to_string(),
        }
    }

    pub fn playback(command: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        AdapterError::Playback {
            command: command.into(),
            reason: reason.to_string(),
        }
    }
}

pub type AdapterResult<T> = Result<T, AdapterError>;
