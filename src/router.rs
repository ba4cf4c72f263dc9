//! Turns browse paths into catalog queries and catalog responses into tree nodes.
use crate::api::schema::{AlbumSummary, PlaylistEntry, TrackSummary};
use crate::api::{Catalog, Session};
use crate::error::{AdapterError, AdapterResult};
use crate::models::{Item, ItemKind, PlayableTrack, SearchSection, TreeNode};
use crate::navigation::{NavigationBuilder, ICON_ARTIST, ICON_FOLDER, ICON_SONG};
use crate::uri::{self, BrowsePath, Category};
use anyhow::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const ART_SIZE: (u32, u32) = (640, 640);
const ARTIST_ART_SIZE: (u32, u32) = (640, 428);
const SEARCH_TYPES: &str = "tracks,albums,artists";

pub struct Router {
    catalog: Arc<dyn Catalog>,
    nav: NavigationBuilder,
    service_name: String,
    search_limit: u32,
}

impl Router {
    pub fn new(catalog: Arc<dyn Catalog>, prefix: &str, service_name: &str) -> Self {
        Self {
            catalog,
            nav: NavigationBuilder::new(prefix),
            service_name: service_name.to_string(),
            search_limit: 999,
        }
    }

    pub fn with_search_limit(mut self, limit: u32) -> Self {
        self.search_limit = limit;
        self
    }

    pub fn prefix(&self) -> &str {
        self.nav.prefix()
    }

    /// Resolve one browse path. The root is answered without touching the catalog; every other
    /// path costs exactly one catalog call. Nothing is cached between calls.
    pub async fn resolve(&self, session: &Session, path: &str) -> AdapterResult<TreeNode> {
        info!(path, catalog = self.catalog.name(), "resolve");
        let parsed = BrowsePath::parse(self.prefix(), path).map_err(|e| {
            warn!(path, "rejecting browse path: {}", e);
            AdapterError::browse(path, e)
        })?;

        let category = match parsed.category {
            None => return Ok(self.nav.build_root()),
            Some(c) => c,
        };

        let items = self
            .fetch_items(session, &parsed, category)
            .await
            .map_err(|e| {
                warn!(path, "browse failed: {:#}", e);
                AdapterError::browse(path, format!("{:#}", e))
            })?;
        debug!(path, count = items.len(), "resolved");

        let section = self.nav.build_section("", items, ICON_FOLDER);
        Ok(self.nav.build_tree(vec![section], &parsed.parent_uri()))
    }

    /// Like [`Router::resolve`] but gives up when `cancel` fires.
    pub async fn resolve_cancellable(
        &self,
        session: &Session,
        path: &str,
        cancel: &CancellationToken,
    ) -> AdapterResult<TreeNode> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!(path, "resolve cancelled");
                Err(AdapterError::browse(path, "cancelled"))
            }
            res = self.resolve(session, path) => res,
        }
    }

    async fn fetch_items(
        &self,
        session: &Session,
        path: &BrowsePath,
        category: Category,
    ) -> Result<Vec<Item>> {
        let entity_id = path.entity_id.as_deref().filter(|_| category.has_children());
        let c = self.catalog.as_ref();

        match (category, entity_id) {
            (Category::MyTracks, _) => {
                let page = c.list_favorite_tracks(session).await?;
                page.into_items().map(|t| self.song_item(&t)).collect()
            }
            (Category::MyPlaylists, None) => {
                let page = c.list_owned_playlists(session).await?;
                page.into_items().map(|p| self.playlist_folder(path, &p)).collect()
            }
            (Category::FavoritePlaylists, None) => {
                let page = c.list_favorite_playlists(session).await?;
                page.into_items().map(|p| self.playlist_folder(path, &p)).collect()
            }
            (Category::MyPlaylists | Category::FavoritePlaylists, Some(id)) => {
                let page = c.list_playlist_tracks(session, id).await?;
                page.items.iter().map(|t| self.song_item(t)).collect()
            }
            (Category::MyAlbums, None) => {
                let page = c.list_favorite_albums(session).await?;
                page.into_items()
                    .map(|a| self.album_folder(&path.child_uri(&a.id.0), &a))
                    .collect()
            }
            (Category::TopAlbums | Category::NewAlbums | Category::StaffPickAlbums, None) => {
                let tab = category.featured_tab().unwrap_or_default();
                let albums = c.list_featured_albums(session).await?.into_tab(tab)?;
                albums
                    .iter()
                    .map(|a| self.album_folder(&path.child_uri(&a.id.0), a))
                    .collect()
            }
            (
                Category::MyAlbums
                | Category::TopAlbums
                | Category::NewAlbums
                | Category::StaffPickAlbums,
                Some(id),
            ) => {
                let page = c.list_album_tracks(session, id).await?;
                page.items.iter().map(|t| self.song_item(t)).collect()
            }
            (Category::MyArtists, None) => {
                let page = c.list_favorite_artists(session).await?;
                Ok(page
                    .into_items()
                    .map(|a| {
                        let art = self.art(a.picture(), ARTIST_ART_SIZE);
                        self.nav.build_folder_item(
                            &a.name,
                            &a.name,
                            "",
                            &art,
                            ICON_ARTIST,
                            &path.child_uri(&a.id.0),
                        )
                    })
                    .collect())
            }
            (Category::MyArtists, Some(id)) => {
                let page = c.list_artist_top_tracks(session, id).await?;
                page.items.iter().map(|t| self.song_item(t)).collect()
            }
        }
    }

    fn art(&self, cover: Option<&str>, (w, h): (u32, u32)) -> String {
        cover
            .map(|c| self.catalog.art_url(c, w, h))
            .unwrap_or_default()
    }

    fn playlist_folder(&self, path: &BrowsePath, p: &PlaylistEntry) -> Result<Item> {
        let art = self.art(p.square_image(), ART_SIZE);
        Ok(self.nav.build_folder_item(
            &p.title,
            &p.promoted_artist_names(),
            p.description.as_deref().unwrap_or(""),
            &art,
            ICON_FOLDER,
            &path.child_uri(&p.entity_id()?),
        ))
    }

    fn album_folder(&self, uri: &str, a: &AlbumSummary) -> Result<Item> {
        let art = self.art(a.cover(), ART_SIZE);
        Ok(self
            .nav
            .build_folder_item(&a.title, a.primary_artist()?, "", &art, ICON_FOLDER, uri))
    }

    fn song_item(&self, t: &TrackSummary) -> Result<Item> {
        let art = self.art(t.album.cover(), ART_SIZE);
        Ok(self.nav.build_song_item(
            &t.title,
            t.primary_artist()?,
            &t.album.title,
            &art,
            ICON_SONG,
            &uri::track_uri(self.prefix(), &t.id.0),
        ))
    }

    /// One catalog search, grouped into artist, track and album sections.
    pub async fn search(&self, session: &Session, query: &str) -> AdapterResult<Vec<SearchSection>> {
        info!(query, "search");
        let failure_path = format!("{}/search", self.prefix());
        let results = self
            .catalog
            .search(session, query, SEARCH_TYPES, self.search_limit)
            .await
            .map_err(|e| AdapterError::browse(&failure_path, format!("{:#}", e)))?;

        let build = || -> Result<Vec<SearchSection>> {
            let artists = results
                .artists
                .items
                .iter()
                .map(|a| {
                    self.nav.build_folder_item(
                        &a.name,
                        &a.name,
                        "",
                        &self.art(a.picture(), ARTIST_ART_SIZE),
                        ICON_ARTIST,
                        &format!("{}/{}/{}", self.prefix(), Category::MyArtists, a.id),
                    )
                })
                .collect();
            let tracks = results
                .tracks
                .items
                .iter()
                .map(|t| self.song_item(t))
                .collect::<Result<Vec<_>>>()?;
            let albums = results
                .albums
                .items
                .iter()
                .map(|a| {
                    let uri = format!("{}/{}/{}", self.prefix(), Category::MyAlbums, a.id);
                    self.album_folder(&uri, a)
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(vec![
                self.nav
                    .build_search_section(&format!("{} Artists", self.service_name), artists),
                self.nav
                    .build_search_section(&format!("{} Tracks", self.service_name), tracks),
                self.nav
                    .build_search_section(&format!("{} Albums", self.service_name), albums),
            ])
        };
        build().map_err(|e| AdapterError::browse(&failure_path, format!("{:#}", e)))
    }

    /// Resolve `<prefix>/tracks/<id>` into a stream the playback daemon can open.
    pub async fn explode_uri(&self, session: &Session, track: &str) -> AdapterResult<PlayableTrack> {
        info!(uri = track, "explode");
        let id = uri::parse_track_uri(self.prefix(), track)
            .ok_or_else(|| AdapterError::stream(track, "not a track uri"))?;

        let stream = self
            .catalog
            .resolve_stream(session, id)
            .await
            .map_err(|e| AdapterError::stream(id, format!("{:#}", e)))?;
        if stream.url.is_empty() {
            return Err(AdapterError::stream(id, "catalog returned an empty stream url"));
        }
        let meta = self
            .catalog
            .fetch_track_metadata(session, id)
            .await
            .map_err(|e| AdapterError::stream(id, format!("{:#}", e)))?;
        let artist = meta
            .primary_artist()
            .map_err(|e| AdapterError::stream(id, e))?
            .to_string();
        debug!(track = id, codec = %stream.codec, quality = %stream.sound_quality, "stream resolved");

        let hi_res = stream.is_hi_res();
        Ok(PlayableTrack {
            uri: stream.url.clone(),
            service: self.prefix().to_string(),
            name: meta.title.clone(),
            artist,
            album: meta.album.title.clone(),
            kind: ItemKind::Song,
            duration: meta.duration,
            tracknumber: meta.track_number,
            albumart: self.art(meta.album.cover(), ART_SIZE),
            samplerate: if hi_res { "96 kHz" } else { "44.1 kHz" }.to_string(),
            bitdepth: if hi_res { "24 bit" } else { "16 bit" }.to_string(),
            track_type: stream.codec.clone(),
        })
    }
}
