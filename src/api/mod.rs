pub mod mock;
pub mod schema;
pub mod tidal;

use anyhow::Result;
use schema::{
    AlbumSummary, ArtistSummary, FavoritePage, FeaturedPage, Page, PlaylistPage, SearchResults,
    StreamInfo, TrackDetails, TrackSummary,
};

/// A logged-in catalog account. Replacing it is how login/logout take effect;
/// every catalog call receives it explicitly.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub session_id: String,
    pub country_code: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("session_id", &"<redacted>")
            .field("country_code", &self.country_code)
            .finish()
    }
}

/// Catalog operations the browser needs. Implementations: tidal::TidalCatalog, mock::MockCatalog.
///
/// Each call is a single request; responses are validated against the schema types and a
/// missing required field is an error.
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    /// Exchange credentials for a session.
    async fn login(&self, username: &str, password: &str) -> Result<Session>;

    async fn list_owned_playlists(&self, session: &Session) -> Result<PlaylistPage>;
    async fn list_favorite_playlists(&self, session: &Session) -> Result<PlaylistPage>;
    async fn list_favorite_albums(&self, session: &Session) -> Result<FavoritePage<AlbumSummary>>;
    /// One payload carrying the new / staff-pick / top tabs for the session's region.
    async fn list_featured_albums(&self, session: &Session) -> Result<FeaturedPage>;
    async fn list_favorite_artists(&self, session: &Session) -> Result<FavoritePage<ArtistSummary>>;
    async fn list_favorite_tracks(&self, session: &Session) -> Result<FavoritePage<TrackSummary>>;

    async fn list_playlist_tracks(&self, session: &Session, playlist_id: &str) -> Result<Page<TrackSummary>>;
    async fn list_album_tracks(&self, session: &Session, album_id: &str) -> Result<Page<TrackSummary>>;
    async fn list_artist_top_tracks(&self, session: &Session, artist_id: &str) -> Result<Page<TrackSummary>>;

    async fn resolve_stream(&self, session: &Session, track_id: &str) -> Result<StreamInfo>;
    async fn fetch_track_metadata(&self, session: &Session, track_id: &str) -> Result<TrackDetails>;

    /// Search; `types` is a comma separated list such as "tracks,albums,artists".
    async fn search(&self, session: &Session, query: &str, types: &str, limit: u32) -> Result<SearchResults>;

    /// Image URL for an art reference at the given size.
    fn art_url(&self, cover: &str, width: u32, height: u32) -> String;

    /// Return the catalog's name (for logging)
    fn name(&self) -> &str;
}
