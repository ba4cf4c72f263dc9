pub mod mpd;

use crate::error::{AdapterError, AdapterResult};
use crate::models::PlayableTrack;
use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    Play,
    Pause,
    Stop,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerState {
    pub status: PlayerStatus,
    /// Milliseconds into the current song.
    pub seek: u64,
    /// Seconds, when a song is loaded.
    pub duration: Option<u64>,
    pub volume: Option<u8>,
}

/// Command sink of the local audio daemon.
#[async_trait::async_trait]
pub trait PlaybackBackend: Send + Sync {
    async fn stop(&self) -> Result<()>;
    async fn clear(&self) -> Result<()>;
    /// Load a playlist-like source. Remote streams are expected to fail here.
    async fn load(&self, uri: &str) -> Result<()>;
    async fn add(&self, uri: &str) -> Result<()>;
    async fn play(&self) -> Result<()>;
    async fn pause(&self) -> Result<()>;
    async fn seek(&self, position_ms: u64) -> Result<()>;
    async fn get_state(&self) -> Result<PlayerState>;
}

/// Ordered playback commands against a backend. Holds no state of its own.
pub struct Playback<B> {
    backend: B,
}

impl<B: PlaybackBackend> Playback<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// stop, clear, load (falling back to add), play.
    pub async fn clear_add_play_track(&self, track: &PlayableTrack) -> AdapterResult<()> {
        info!(name = %track.name, artist = %track.artist, "clear_add_play_track");
        self.backend
            .stop()
            .await
            .map_err(|e| AdapterError::playback("stop", e))?;
        self.backend
            .clear()
            .await
            .map_err(|e| AdapterError::playback("clear", e))?;
        if let Err(e) = self.backend.load(&track.uri).await {
            // a stream url is not a stored playlist; add it to the queue instead
            debug!("load rejected ({}), adding instead", e);
            self.backend
                .add(&track.uri)
                .await
                .map_err(|e| AdapterError::playback("add", e))?;
        }
        self.backend
            .play()
            .await
            .map_err(|e| AdapterError::playback("play", e))
    }

    pub async fn seek(&self, position_ms: u64) -> AdapterResult<()> {
        info!(position_ms, "seek");
        self.backend
            .seek(position_ms)
            .await
            .map_err(|e| AdapterError::playback("seek", e))
    }

    pub async fn stop(&self) -> AdapterResult<()> {
        info!("stop");
        self.backend
            .stop()
            .await
            .map_err(|e| AdapterError::playback("stop", e))
    }

    pub async fn pause(&self) -> AdapterResult<()> {
        info!("pause");
        self.backend
            .pause()
            .await
            .map_err(|e| AdapterError::playback("pause", e))
    }

    pub async fn resume(&self) -> AdapterResult<()> {
        info!("resume");
        self.backend
            .play()
            .await
            .map_err(|e| AdapterError::playback("play", e))
    }

    pub async fn get_state(&self) -> AdapterResult<PlayerState> {
        self.backend
            .get_state()
            .await
            .map_err(|e| AdapterError::playback("status", e))
    }
}
