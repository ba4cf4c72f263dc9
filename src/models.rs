//! Shapes exchanged with the host player. Field names on the wire are fixed by the host.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    List,
    Grid,
}

/// Every listing offers both views, list first.
pub const ALL_VIEW_MODES: [ViewMode; 2] = [ViewMode::List, ViewMode::Grid];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Folder,
    Song,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub service: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub title: String,
    #[serde(rename = "artist")]
    pub subtitle: String,
    pub album: String,
    #[serde(rename = "albumart")]
    pub art_url: String,
    pub icon: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(rename = "availableListViews")]
    pub view_modes: Vec<ViewMode>,
    pub items: Vec<Item>,
}

/// One level of the browse tree.
///
/// Serialized as `{"navigation": {"lists": [...], "prev": {"uri": "..."}}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireTree", from = "WireTree")]
pub struct TreeNode {
    pub lists: Vec<Section>,
    pub parent_uri: String,
}

#[derive(Serialize, Deserialize)]
struct WireTree {
    navigation: WireNavigation,
}

#[derive(Serialize, Deserialize)]
struct WireNavigation {
    lists: Vec<Section>,
    prev: WirePrev,
}

#[derive(Serialize, Deserialize)]
struct WirePrev {
    uri: String,
}

impl From<TreeNode> for WireTree {
    fn from(t: TreeNode) -> Self {
        WireTree {
            navigation: WireNavigation {
                lists: t.lists,
                prev: WirePrev { uri: t.parent_uri },
            },
        }
    }
}

impl From<WireTree> for TreeNode {
    fn from(w: WireTree) -> Self {
        TreeNode {
            lists: w.navigation.lists,
            parent_uri: w.navigation.prev.uri,
        }
    }
}

/// A titled group of search hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSection {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    #[serde(rename = "availableListViews")]
    pub view_modes: Vec<ViewMode>,
    pub items: Vec<Item>,
}

/// A track resolved to something the playback daemon can open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayableTrack {
    /// Stream URL, not a browse URI.
    pub uri: String,
    pub service: String,
    pub name: String,
    pub artist: String,
    pub album: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Seconds.
    pub duration: u64,
    pub tracknumber: u32,
    pub albumart: String,
    pub samplerate: String,
    pub bitdepth: String,
    #[serde(rename = "trackType")]
    pub track_type: String,
}

/// Entry the host shows in its list of browse roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseSource {
    pub name: String,
    pub uri: String,
    pub plugin_type: String,
    pub plugin_name: String,
    pub albumart: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tree_node_uses_host_field_names() {
        let tree = TreeNode {
            lists: vec![Section {
                title: "".into(),
                icon: "fa fa-folder-open-o".into(),
                view_modes: ALL_VIEW_MODES.to_vec(),
                items: vec![Item {
                    service: "tidal".into(),
                    kind: ItemKind::Song,
                    title: "Song".into(),
                    subtitle: "Artist".into(),
                    album: "Album".into(),
                    art_url: "".into(),
                    icon: "fa fa-music".into(),
                    uri: "tidal/tracks/1".into(),
                }],
            }],
            parent_uri: "tidal/mytracks".into(),
        };

        let v = serde_json::to_value(&tree).unwrap();
        assert_eq!(
            v,
            json!({
                "navigation": {
                    "lists": [{
                        "title": "",
                        "icon": "fa fa-folder-open-o",
                        "availableListViews": ["list", "grid"],
                        "items": [{
                            "service": "tidal",
                            "type": "song",
                            "title": "Song",
                            "artist": "Artist",
                            "album": "Album",
                            "albumart": "",
                            "icon": "fa fa-music",
                            "uri": "tidal/tracks/1"
                        }]
                    }],
                    "prev": { "uri": "tidal/mytracks" }
                }
            })
        );

        let back: TreeNode = serde_json::from_value(v).unwrap();
        assert_eq!(back, tree);
    }
}
