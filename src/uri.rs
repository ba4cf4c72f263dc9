//! Structured form of the browse URIs handed to the host.
//!
//! A browse path is `<prefix>[/<category>[/<id>]]`; a playable track is `<prefix>/tracks/<id>`.
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    MyPlaylists,
    FavoritePlaylists,
    MyAlbums,
    TopAlbums,
    NewAlbums,
    StaffPickAlbums,
    MyArtists,
    MyTracks,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::MyPlaylists,
        Category::FavoritePlaylists,
        Category::MyAlbums,
        Category::TopAlbums,
        Category::NewAlbums,
        Category::StaffPickAlbums,
        Category::MyArtists,
        Category::MyTracks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::MyPlaylists => "myplaylists",
            Category::FavoritePlaylists => "favoriteplaylists",
            Category::MyAlbums => "myalbums",
            Category::TopAlbums => "topalbums",
            Category::NewAlbums => "newalbums",
            Category::StaffPickAlbums => "staffpickalbums",
            Category::MyArtists => "myartists",
            Category::MyTracks => "mytracks",
        }
    }

    /// Index of this category's tab in the shared featured-albums payload.
    pub fn featured_tab(&self) -> Option<usize> {
        match self {
            Category::NewAlbums => Some(0),
            Category::StaffPickAlbums => Some(1),
            Category::TopAlbums => Some(2),
            _ => None,
        }
    }

    /// Whether a trailing id opens the entity's contents. `mytracks` is terminal.
    pub fn has_children(&self) -> bool {
        !matches!(self, Category::MyTracks)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UriError {
    #[error("uri is not under the '{0}' namespace")]
    WrongPrefix(String),
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("empty path segment")]
    EmptySegment,
    #[error("too many path segments")]
    TooManySegments,
}

impl FromStr for Category {
    type Err = UriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UriError::UnknownCategory(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowsePath {
    pub prefix: String,
    pub category: Option<Category>,
    /// Only present together with `category`.
    pub entity_id: Option<String>,
}

impl BrowsePath {
    pub fn parse(prefix: &str, path: &str) -> Result<Self, UriError> {
        let path = path.trim_end_matches('/');
        let rest = match path.strip_prefix(prefix) {
            Some("") => {
                return Ok(BrowsePath {
                    prefix: prefix.to_string(),
                    category: None,
                    entity_id: None,
                })
            }
            Some(r) => r
                .strip_prefix('/')
                .ok_or_else(|| UriError::WrongPrefix(prefix.to_string()))?,
            None => return Err(UriError::WrongPrefix(prefix.to_string())),
        };

        let mut segments = rest.split('/');
        let category: Category = match segments.next() {
            Some("") | None => return Err(UriError::EmptySegment),
            Some(c) => c.parse()?,
        };
        let entity_id = match segments.next() {
            Some("") => return Err(UriError::EmptySegment),
            Some(id) => Some(id.to_string()),
            None => None,
        };
        if segments.next().is_some() {
            return Err(UriError::TooManySegments);
        }

        Ok(BrowsePath {
            prefix: prefix.to_string(),
            category: Some(category),
            entity_id,
        })
    }

    pub fn is_root(&self) -> bool {
        self.category.is_none()
    }

    /// The path one level up; empty at the root.
    pub fn parent_uri(&self) -> String {
        match (&self.category, &self.entity_id) {
            (None, _) => String::new(),
            (Some(_), None) => self.prefix.clone(),
            (Some(c), Some(_)) => format!("{}/{}", self.prefix, c),
        }
    }

    pub fn child_uri(&self, id: &str) -> String {
        format!("{}/{}", self, id)
    }
}

impl fmt::Display for BrowsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix)?;
        if let Some(c) = &self.category {
            write!(f, "/{}", c)?;
            if let Some(id) = &self.entity_id {
                write!(f, "/{}", id)?;
            }
        }
        Ok(())
    }
}

/// URI of a playable track.
pub fn track_uri(prefix: &str, track_id: &str) -> String {
    format!("{}/tracks/{}", prefix, track_id)
}

/// Extract the track id from `<prefix>/tracks/<id>`.
pub fn parse_track_uri<'a>(prefix: &str, uri: &'a str) -> Option<&'a str> {
    let id = uri.strip_prefix(prefix)?.strip_prefix("/tracks/")?;
    if id.is_empty() || id.contains('/') {
        None
    } else {
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_three_levels() {
        let root = BrowsePath::parse("tidal", "tidal").unwrap();
        assert!(root.is_root());
        assert_eq!(root.parent_uri(), "");

        let listing = BrowsePath::parse("tidal", "tidal/myalbums").unwrap();
        assert_eq!(listing.category, Some(Category::MyAlbums));
        assert_eq!(listing.entity_id, None);
        assert_eq!(listing.parent_uri(), "tidal");

        let entity = BrowsePath::parse("tidal", "tidal/myalbums/123").unwrap();
        assert_eq!(entity.entity_id.as_deref(), Some("123"));
        assert_eq!(entity.parent_uri(), "tidal/myalbums");
        assert_eq!(entity.to_string(), "tidal/myalbums/123");
    }

    #[test]
    fn every_category_round_trips() {
        for c in Category::ALL {
            let p = BrowsePath::parse("svc", &format!("svc/{}", c)).unwrap();
            assert_eq!(p.category, Some(c));
            assert_eq!(p.to_string(), format!("svc/{}", c));
        }
    }

    #[test]
    fn rejects_malformed_paths() {
        assert_eq!(
            BrowsePath::parse("tidal", "tidal/nope"),
            Err(UriError::UnknownCategory("nope".into()))
        );
        assert_eq!(
            BrowsePath::parse("tidal", "spotify/myalbums"),
            Err(UriError::WrongPrefix("tidal".into()))
        );
        assert_eq!(
            BrowsePath::parse("tidal", "tidalx/myalbums"),
            Err(UriError::WrongPrefix("tidal".into()))
        );
        assert_eq!(
            BrowsePath::parse("tidal", "tidal/myalbums/1/2"),
            Err(UriError::TooManySegments)
        );
        assert_eq!(
            BrowsePath::parse("tidal", "tidal//1"),
            Err(UriError::EmptySegment)
        );
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let p = BrowsePath::parse("tidal", "tidal/mytracks/").unwrap();
        assert_eq!(p.category, Some(Category::MyTracks));
        assert!(BrowsePath::parse("tidal", "tidal/").unwrap().is_root());
    }

    #[test]
    fn featured_tabs_are_distinct() {
        assert_eq!(Category::NewAlbums.featured_tab(), Some(0));
        assert_eq!(Category::StaffPickAlbums.featured_tab(), Some(1));
        assert_eq!(Category::TopAlbums.featured_tab(), Some(2));
        assert_eq!(Category::MyAlbums.featured_tab(), None);
    }

    #[test]
    fn track_uri_round_trip() {
        let uri = track_uri("tidal", "77");
        assert_eq!(uri, "tidal/tracks/77");
        assert_eq!(parse_track_uri("tidal", &uri), Some("77"));
        assert_eq!(parse_track_uri("tidal", "tidal/tracks/"), None);
        assert_eq!(parse_track_uri("tidal", "tidal/myalbums/77"), None);
    }
}
