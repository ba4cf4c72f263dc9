use super::schema::{
    AlbumSummary, ArtistSummary, FavoritePage, FeaturedPage, Page, PlaylistPage, SearchResults,
    StreamInfo, TrackDetails, TrackSummary,
};
use super::{Catalog, Session};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::info;

/// Operation names used as fixture keys.
pub mod ops {
    pub const OWNED_PLAYLISTS: &str = "list_owned_playlists";
    pub const FAVORITE_PLAYLISTS: &str = "list_favorite_playlists";
    pub const FAVORITE_ALBUMS: &str = "list_favorite_albums";
    pub const FEATURED_ALBUMS: &str = "list_featured_albums";
    pub const FAVORITE_ARTISTS: &str = "list_favorite_artists";
    pub const FAVORITE_TRACKS: &str = "list_favorite_tracks";
    pub const PLAYLIST_TRACKS: &str = "list_playlist_tracks";
    pub const ALBUM_TRACKS: &str = "list_album_tracks";
    pub const ARTIST_TOP_TRACKS: &str = "list_artist_top_tracks";
    pub const RESOLVE_STREAM: &str = "resolve_stream";
    pub const TRACK_METADATA: &str = "fetch_track_metadata";
    pub const SEARCH: &str = "search";
}

/// A catalog that serves JSON fixtures per operation and records every call.
///
/// Fixtures go through the same schema validation as real responses. An operation without a
/// fixture fails, which is how tests exercise error paths.
pub struct MockCatalog {
    fixtures: HashMap<&'static str, serde_json::Value>,
    credentials: Option<(String, String)>,
    calls: Mutex<Vec<(String, Option<String>)>>,
    call_count: AtomicUsize,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self {
            fixtures: HashMap::new(),
            credentials: None,
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    pub fn with_fixture(mut self, op: &'static str, body: serde_json::Value) -> Self {
        self.fixtures.insert(op, body);
        self
    }

    /// Accept exactly these credentials at login.
    pub fn with_account(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some((username.to_string(), password.to_string()));
        self
    }

    /// Number of catalog calls made so far (login excluded).
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Calls made so far as (operation, entity id).
    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn serve<T: DeserializeOwned>(&self, op: &'static str, id: Option<&str>) -> Result<T> {
        info!("MockCatalog: {} {:?}", op, id);
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((op.to_string(), id.map(str::to_string)));
        }
        let body = self
            .fixtures
            .get(op)
            .cloned()
            .ok_or_else(|| anyhow!("no fixture for {}", op))?;
        serde_json::from_value(body).with_context(|| format!("unexpected response shape from {}", op))
    }
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    fn name(&self) -> &str {
        "mock"
    }

    async fn login(&self, username: &str, password: &str) -> Result<Session> {
        match &self.credentials {
            Some((u, p)) if u == username && p == password => Ok(Session {
                user_id: "1".into(),
                session_id: format!("mock-session-{}", username),
                country_code: "US".into(),
            }),
            _ => Err(anyhow!("mock login rejected for {}", username)),
        }
    }

    async fn list_owned_playlists(&self, _session: &Session) -> Result<PlaylistPage> {
        self.serve(ops::OWNED_PLAYLISTS, None)
    }

    async fn list_favorite_playlists(&self, _session: &Session) -> Result<PlaylistPage> {
        self.serve(ops::FAVORITE_PLAYLISTS, None)
    }

    async fn list_favorite_albums(&self, _session: &Session) -> Result<FavoritePage<AlbumSummary>> {
        self.serve(ops::FAVORITE_ALBUMS, None)
    }

    async fn list_featured_albums(&self, _session: &Session) -> Result<FeaturedPage> {
        self.serve(ops::FEATURED_ALBUMS, None)
    }

    async fn list_favorite_artists(&self, _session: &Session) -> Result<FavoritePage<ArtistSummary>> {
        self.serve(ops::FAVORITE_ARTISTS, None)
    }

    async fn list_favorite_tracks(&self, _session: &Session) -> Result<FavoritePage<TrackSummary>> {
        self.serve(ops::FAVORITE_TRACKS, None)
    }

    async fn list_playlist_tracks(&self, _session: &Session, playlist_id: &str) -> Result<Page<TrackSummary>> {
        self.serve(ops::PLAYLIST_TRACKS, Some(playlist_id))
    }

    async fn list_album_tracks(&self, _session: &Session, album_id: &str) -> Result<Page<TrackSummary>> {
        self.serve(ops::ALBUM_TRACKS, Some(album_id))
    }

    async fn list_artist_top_tracks(&self, _session: &Session, artist_id: &str) -> Result<Page<TrackSummary>> {
        self.serve(ops::ARTIST_TOP_TRACKS, Some(artist_id))
    }

    async fn resolve_stream(&self, _session: &Session, track_id: &str) -> Result<StreamInfo> {
        self.serve(ops::RESOLVE_STREAM, Some(track_id))
    }

    async fn fetch_track_metadata(&self, _session: &Session, track_id: &str) -> Result<TrackDetails> {
        self.serve(ops::TRACK_METADATA, Some(track_id))
    }

    async fn search(&self, _session: &Session, query: &str, _types: &str, _limit: u32) -> Result<SearchResults> {
        self.serve(ops::SEARCH, Some(query))
    }

    fn art_url(&self, cover: &str, width: u32, height: u32) -> String {
        format!("mock://art/{}/{}x{}", cover, width, height)
    }
}
