//! Response schemas, one per catalog operation.
//!
//! Required fields are plain (non-`Option`) so a payload missing them fails to deserialize
//! instead of yielding half-filled items. Art references are always optional.
use anyhow::{anyhow, Result};
use serde::{Deserialize, Deserializer};

/// Catalog ids arrive as numbers for albums/artists/tracks and strings for playlists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id(pub String);

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Str(String),
            Num(u64),
        }
        match Raw::deserialize(d)? {
            Raw::Str(s) if s.is_empty() => Err(serde::de::Error::custom("empty id")),
            Raw::Str(s) => Ok(Id(s)),
            Raw::Num(n) => Ok(Id(n.to_string())),
        }
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRef {
    pub title: String,
    #[serde(default)]
    pub cover: Option<String>,
}

impl AlbumRef {
    pub fn cover(&self) -> Option<&str> {
        non_empty(&self.cover)
    }
}

/// A plain `{items: [...]}` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
}

/// Favorites wrap each entry as `{item: {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct FavoritePage<T> {
    pub items: Vec<Favorite<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Favorite<T> {
    pub item: T,
}

impl<T> FavoritePage<T> {
    pub fn into_items(self) -> impl Iterator<Item = T> {
        self.items.into_iter().map(|f| f.item)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistEntry {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub id: Option<Id>,
    pub title: String,
    #[serde(default)]
    pub promoted_artists: Vec<ArtistRef>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub square_image: Option<String>,
}

impl PlaylistEntry {
    /// `id` if present, otherwise `uuid`.
    pub fn entity_id(&self) -> Result<String> {
        self.id
            .as_ref()
            .map(|i| i.0.clone())
            .or_else(|| non_empty(&self.uuid).map(str::to_string))
            .ok_or_else(|| anyhow!("playlist '{}' has neither id nor uuid", self.title))
    }

    pub fn promoted_artist_names(&self) -> String {
        self.promoted_artists
            .iter()
            .map(|a| a.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn square_image(&self) -> Option<&str> {
        non_empty(&self.square_image)
    }
}

/// Owned playlists come flat, favorite playlists come wrapped in `{item: ..}`; accept both.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlaylistSlot {
    Wrapped { item: PlaylistEntry },
    Flat(PlaylistEntry),
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistPage {
    pub items: Vec<PlaylistSlot>,
}

impl PlaylistPage {
    pub fn into_items(self) -> impl Iterator<Item = PlaylistEntry> {
        self.items.into_iter().map(|s| match s {
            PlaylistSlot::Wrapped { item } => item,
            PlaylistSlot::Flat(p) => p,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumSummary {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub artist: Option<ArtistRef>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    #[serde(default)]
    pub cover: Option<String>,
}

impl AlbumSummary {
    /// `artist.name`, falling back to the first of `artists`.
    pub fn primary_artist(&self) -> Result<&str> {
        primary_artist(&self.artist, &self.artists)
            .ok_or_else(|| anyhow!("album {} has no artist", self.id))
    }

    pub fn cover(&self) -> Option<&str> {
        non_empty(&self.cover)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistSummary {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
}

impl ArtistSummary {
    pub fn picture(&self) -> Option<&str> {
        non_empty(&self.picture)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackSummary {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub artist: Option<ArtistRef>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub album: AlbumRef,
}

impl TrackSummary {
    pub fn primary_artist(&self) -> Result<&str> {
        primary_artist(&self.artist, &self.artists)
            .ok_or_else(|| anyhow!("track {} has no artist", self.id))
    }
}

fn primary_artist<'a>(artist: &'a Option<ArtistRef>, artists: &'a [ArtistRef]) -> Option<&'a str> {
    artist
        .as_ref()
        .or_else(|| artists.first())
        .map(|a| a.name.as_str())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackDetails {
    pub title: String,
    #[serde(default)]
    pub artist: Option<ArtistRef>,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
    pub album: AlbumRef,
    pub duration: u64,
    #[serde(default)]
    pub track_number: u32,
}

impl TrackDetails {
    pub fn primary_artist(&self) -> Result<&str> {
        primary_artist(&self.artist, &self.artists)
            .ok_or_else(|| anyhow!("track '{}' has no artist", self.title))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInfo {
    pub url: String,
    #[serde(default)]
    pub codec: String,
    #[serde(default)]
    pub sound_quality: String,
}

impl StreamInfo {
    pub fn is_hi_res(&self) -> bool {
        self.sound_quality == "HI_RES"
    }
}

/// `rows[0].modules[0].tabs[n].pagedList.items`
#[derive(Debug, Clone, Deserialize)]
pub struct FeaturedPage {
    pub rows: Vec<FeaturedRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeaturedRow {
    pub modules: Vec<FeaturedModule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeaturedModule {
    pub tabs: Vec<FeaturedTab>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedTab {
    pub paged_list: Page<AlbumSummary>,
}

impl FeaturedPage {
    /// Albums of one tab; a missing row, module or tab is an error.
    pub fn into_tab(self, index: usize) -> Result<Vec<AlbumSummary>> {
        let module = self
            .rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("featured page has no rows"))?
            .modules
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("featured page has no modules"))?;
        module
            .tabs
            .into_iter()
            .nth(index)
            .map(|t| t.paged_list.items)
            .ok_or_else(|| anyhow!("featured page has no tab {}", index))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResults {
    pub artists: Page<ArtistSummary>,
    pub tracks: Page<TrackSummary>,
    pub albums: Page<AlbumSummary>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: Id,
    pub session_id: String,
    pub country_code: String,
}
