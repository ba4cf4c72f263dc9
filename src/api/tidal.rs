use super::schema::{
    AlbumSummary, ArtistSummary, FavoritePage, FeaturedPage, LoginResponse, Page, PlaylistPage,
    SearchResults, StreamInfo, TrackDetails, TrackSummary,
};
use super::{Catalog, Session};
use crate::config::Config;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

const TOKEN_HEADER: &str = "X-Tidal-Token";
const SESSION_HEADER: &str = "X-Tidal-SessionId";
/// The v1 API pages collections at 10 by default; ask for everything in one go.
const COLLECTION_LIMIT: &str = "999";

/// TIDAL v1 catalog client. The base URL comes from the config and can be overridden with
/// `TIDAL_API_BASE` (mockito in tests).
pub struct TidalCatalog {
    client: Client,
    api_base: String,
    api_token: String,
    image_base: String,
    sound_quality: String,
    default_country_code: String,
}

impl TidalCatalog {
    pub fn new(cfg: &Config) -> Self {
        Self {
            client: Client::new(),
            api_base: cfg.effective_api_base().trim_end_matches('/').to_string(),
            api_token: cfg.api_token.clone(),
            image_base: cfg.image_base.trim_end_matches('/').to_string(),
            sound_quality: cfg.sound_quality.clone(),
            default_country_code: cfg.country_code.clone(),
        }
    }

    fn endpoint(&self, session: &Session, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/{}", self.api_base, path))
            .with_context(|| format!("invalid api url for '{}'", path))?;
        {
            let mut q = url.query_pairs_mut();
            q.append_pair("countryCode", &session.country_code);
            for (k, v) in params {
                q.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// GET an endpoint and validate the body against `T`.
    async fn get_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.endpoint(session, path, params)?;
        log::debug!("tidal GET {}", url.path());
        let resp = self
            .client
            .get(url)
            .header(TOKEN_HEADER, &self.api_token)
            .header(SESSION_HEADER, &session.session_id)
            .send()
            .await
            .with_context(|| format!("request to {} failed", path))?;
        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(anyhow!("{} failed: {} => {}", path, status, txt));
        }
        let j: serde_json::Value = resp.json().await?;
        serde_json::from_value(j).with_context(|| format!("unexpected response shape from {}", path))
    }
}

#[async_trait]
impl Catalog for TidalCatalog {
    fn name(&self) -> &str {
        "tidal"
    }

    async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let url = format!("{}/login/username", self.api_base);
        let resp = self
            .client
            .post(&url)
            .header(TOKEN_HEADER, &self.api_token)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            return Err(anyhow!("tidal login failed: {} => {}", status, txt));
        }
        let login: LoginResponse = resp.json().await.context("unexpected login response")?;
        let country_code = if login.country_code.is_empty() {
            self.default_country_code.clone()
        } else {
            login.country_code
        };
        log::info!("tidal login ok for user {}", login.user_id);
        Ok(Session {
            user_id: login.user_id.0,
            session_id: login.session_id,
            country_code,
        })
    }

    async fn list_owned_playlists(&self, session: &Session) -> Result<PlaylistPage> {
        let path = format!("users/{}/playlists", session.user_id);
        self.get_json(session, &path, &[("limit", COLLECTION_LIMIT)]).await
    }

    async fn list_favorite_playlists(&self, session: &Session) -> Result<PlaylistPage> {
        let path = format!("users/{}/favorites/playlists", session.user_id);
        self.get_json(session, &path, &[("limit", COLLECTION_LIMIT)]).await
    }

    async fn list_favorite_albums(&self, session: &Session) -> Result<FavoritePage<AlbumSummary>> {
        let path = format!("users/{}/favorites/albums", session.user_id);
        self.get_json(session, &path, &[("limit", COLLECTION_LIMIT)]).await
    }

    async fn list_featured_albums(&self, session: &Session) -> Result<FeaturedPage> {
        self.get_json(session, "pages/show_more_featured_albums", &[("deviceType", "BROWSER")])
            .await
    }

    async fn list_favorite_artists(&self, session: &Session) -> Result<FavoritePage<ArtistSummary>> {
        let path = format!("users/{}/favorites/artists", session.user_id);
        self.get_json(session, &path, &[("limit", COLLECTION_LIMIT)]).await
    }

    async fn list_favorite_tracks(&self, session: &Session) -> Result<FavoritePage<TrackSummary>> {
        let path = format!("users/{}/favorites/tracks", session.user_id);
        self.get_json(session, &path, &[("limit", COLLECTION_LIMIT)]).await
    }

    async fn list_playlist_tracks(&self, session: &Session, playlist_id: &str) -> Result<Page<TrackSummary>> {
        let path = format!("playlists/{}/tracks", playlist_id);
        self.get_json(session, &path, &[("limit", COLLECTION_LIMIT)]).await
    }

    async fn list_album_tracks(&self, session: &Session, album_id: &str) -> Result<Page<TrackSummary>> {
        let path = format!("albums/{}/tracks", album_id);
        self.get_json(session, &path, &[]).await
    }

    async fn list_artist_top_tracks(&self, session: &Session, artist_id: &str) -> Result<Page<TrackSummary>> {
        let path = format!("artists/{}/toptracks", artist_id);
        self.get_json(session, &path, &[]).await
    }

    async fn resolve_stream(&self, session: &Session, track_id: &str) -> Result<StreamInfo> {
        let path = format!("tracks/{}/streamUrl", track_id);
        self.get_json(session, &path, &[("soundQuality", self.sound_quality.as_str())])
            .await
    }

    async fn fetch_track_metadata(&self, session: &Session, track_id: &str) -> Result<TrackDetails> {
        let path = format!("tracks/{}", track_id);
        self.get_json(session, &path, &[]).await
    }

    async fn search(&self, session: &Session, query: &str, types: &str, limit: u32) -> Result<SearchResults> {
        let limit = limit.to_string();
        self.get_json(
            session,
            "search",
            &[("query", query), ("types", types), ("limit", limit.as_str())],
        )
        .await
    }

    fn art_url(&self, cover: &str, width: u32, height: u32) -> String {
        // cover refs are uuids; the image host nests them by dash-separated group
        format!(
            "{}/{}/{}x{}.jpg",
            self.image_base,
            cover.replace('-', "/"),
            width,
            height
        )
    }
}
