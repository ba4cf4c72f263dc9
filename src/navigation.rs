//! Pure constructors for browse tree nodes.
use crate::models::{Item, ItemKind, SearchSection, Section, TreeNode, ALL_VIEW_MODES};
use crate::uri::Category;

pub const ICON_FOLDER: &str = "fa fa-folder-open-o";
pub const ICON_SONG: &str = "fa fa-music";
pub const ICON_ARTIST: &str = "fa fa-user";

#[derive(Debug, Clone)]
pub struct NavigationBuilder {
    prefix: String,
}

impl NavigationBuilder {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The static two-section landing page. Never touches the catalog.
    pub fn build_root(&self) -> TreeNode {
        let collection = [
            ("Favorite Playlists", Category::FavoritePlaylists),
            ("My Playlists", Category::MyPlaylists),
            ("My Albums", Category::MyAlbums),
            ("My Tracks", Category::MyTracks),
            ("My Artists", Category::MyArtists),
        ];
        let editorial = [
            ("Top Albums", Category::TopAlbums),
            ("New Albums", Category::NewAlbums),
            ("Staff Pick Albums", Category::StaffPickAlbums),
        ];

        let sections = vec![
            self.build_section("My Collection", self.category_folders(&collection), ""),
            self.build_section("Editorial", self.category_folders(&editorial), ""),
        ];
        self.build_tree(sections, "")
    }

    fn category_folders(&self, entries: &[(&str, Category)]) -> Vec<Item> {
        entries
            .iter()
            .map(|(title, c)| {
                self.build_folder_item(title, "", "", "", ICON_FOLDER, &format!("{}/{}", self.prefix, c))
            })
            .collect()
    }

    pub fn build_folder_item(
        &self,
        title: &str,
        subtitle: &str,
        album: &str,
        art_url: &str,
        fallback_icon: &str,
        uri: &str,
    ) -> Item {
        self.item(ItemKind::Folder, title, subtitle, album, art_url, fallback_icon, uri)
    }

    pub fn build_song_item(
        &self,
        title: &str,
        subtitle: &str,
        album: &str,
        art_url: &str,
        fallback_icon: &str,
        uri: &str,
    ) -> Item {
        self.item(ItemKind::Song, title, subtitle, album, art_url, fallback_icon, uri)
    }

    #[allow(clippy::too_many_arguments)]
    fn item(
        &self,
        kind: ItemKind,
        title: &str,
        subtitle: &str,
        album: &str,
        art_url: &str,
        fallback_icon: &str,
        uri: &str,
    ) -> Item {
        // art wins over the glyph
        let icon = if art_url.is_empty() { fallback_icon } else { "" };
        Item {
            service: self.prefix.clone(),
            kind,
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            album: album.to_string(),
            art_url: art_url.to_string(),
            icon: icon.to_string(),
            uri: uri.to_string(),
        }
    }

    pub fn build_section(&self, title: &str, items: Vec<Item>, icon: &str) -> Section {
        Section {
            title: title.to_string(),
            icon: icon.to_string(),
            view_modes: ALL_VIEW_MODES.to_vec(),
            items,
        }
    }

    pub fn build_tree(&self, sections: Vec<Section>, parent_uri: &str) -> TreeNode {
        TreeNode {
            lists: sections,
            parent_uri: parent_uri.to_string(),
        }
    }

    pub fn build_search_section(&self, title: &str, items: Vec<Item>) -> SearchSection {
        SearchSection {
            kind: "title".into(),
            title: title.to_string(),
            view_modes: ALL_VIEW_MODES.to_vec(),
            items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ViewMode;

    #[test]
    fn root_is_static_two_sections() {
        let nav = NavigationBuilder::new("tidal");
        let root = nav.build_root();
        assert_eq!(root.parent_uri, "");
        assert_eq!(root.lists.len(), 2);
        assert_eq!(root.lists[0].title, "My Collection");
        assert_eq!(root.lists[1].title, "Editorial");

        let uris: Vec<&str> = root.lists[0].items.iter().map(|i| i.uri.as_str()).collect();
        assert_eq!(
            uris,
            vec![
                "tidal/favoriteplaylists",
                "tidal/myplaylists",
                "tidal/myalbums",
                "tidal/mytracks",
                "tidal/myartists"
            ]
        );
        let uris: Vec<&str> = root.lists[1].items.iter().map(|i| i.uri.as_str()).collect();
        assert_eq!(uris, vec!["tidal/topalbums", "tidal/newalbums", "tidal/staffpickalbums"]);
        assert!(root
            .lists
            .iter()
            .flat_map(|s| s.items.iter())
            .all(|i| i.kind == ItemKind::Folder && i.icon == ICON_FOLDER));
        assert_eq!(nav.build_root(), root);
    }

    #[test]
    fn art_suppresses_icon() {
        let nav = NavigationBuilder::new("tidal");
        let with_art = nav.build_song_item("t", "a", "al", "http://img", ICON_SONG, "tidal/tracks/1");
        assert_eq!(with_art.icon, "");
        assert_eq!(with_art.art_url, "http://img");

        let without = nav.build_folder_item("t", "a", "", "", ICON_FOLDER, "tidal/myalbums/1");
        assert_eq!(without.icon, ICON_FOLDER);
        assert_eq!(without.art_url, "");
        assert_eq!(without.service, "tidal");
    }

    #[test]
    fn sections_offer_list_then_grid() {
        let nav = NavigationBuilder::new("svc");
        let s = nav.build_section("", Vec::new(), ICON_FOLDER);
        assert_eq!(s.view_modes, vec![ViewMode::List, ViewMode::Grid]);
        assert!(s.items.is_empty());
    }
}
