//! Spotify domain: item kinds, URIs and the response shapes the tools read.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Build a `spotify:<kind>:<id>` URI.
pub fn spotify_uri(kind: &str, id: &str) -> String {
    format!("spotify:{kind}:{id}")
}

/// An explicit URI wins; otherwise one is synthesized only when both the kind
/// and the id are present.
pub fn resolve_uri(uri: Option<&str>, kind: Option<&str>, id: Option<&str>) -> Option<String> {
    match (uri, kind, id) {
        (Some(uri), _, _) if !uri.trim().is_empty() => Some(uri.to_owned()),
        (_, Some(kind), Some(id)) if !id.trim().is_empty() => Some(spotify_uri(kind, id)),
        _ => None,
    }
}

/// The kind segment of a `spotify:<kind>:<id>` URI.
pub fn uri_kind(uri: &str) -> Option<&str> {
    let mut parts = uri.split(':');
    match (parts.next(), parts.next()) {
        (Some("spotify"), Some(kind)) => Some(kind),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    Track,
    Album,
    Artist,
    Playlist,
}

impl SearchType {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchType::Track => "track",
            SearchType::Album => "album",
            SearchType::Artist => "artist",
            SearchType::Playlist => "playlist",
        }
    }
}

/// What `playMusic` may start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PlayType {
    Track,
    Album,
    Artist,
    Playlist,
}

impl PlayType {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayType::Track => "track",
            PlayType::Album => "album",
            PlayType::Artist => "artist",
            PlayType::Playlist => "playlist",
        }
    }
}

/// What `addToQueue` may enqueue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum QueueType {
    Track,
    Episode,
}

impl QueueType {
    pub fn as_str(self) -> &'static str {
        match self {
            QueueType::Track => "track",
            QueueType::Episode => "episode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TopType {
    Artists,
    Tracks,
}

impl TopType {
    pub fn as_str(self) -> &'static str {
        match self {
            TopType::Artists => "artists",
            TopType::Tracks => "tracks",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    ShortTerm,
    #[default]
    MediumTerm,
    LongTerm,
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::ShortTerm => "short_term",
            TimeRange::MediumTerm => "medium_term",
            TimeRange::LongTerm => "long_term",
        }
    }
}

// --- Web API response shapes (only the fields the tools render) ---

#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u32>,
}

impl<T> Default for Paging<T> {
    fn default() -> Self {
        Self { items: Vec::new(), total: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimplifiedArtist {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Track {
    /// Local files have no id.
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
    #[serde(default)]
    pub album: Option<AlbumRef>,
    #[serde(default)]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Episode {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// `item` of the player endpoints and `track` of playlist entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlayableItem {
    Track(Track),
    Episode(Episode),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimplifiedArtist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Owner {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TracksRef {
    #[serde(default)]
    pub total: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Playlist {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner: Option<Owner>,
    #[serde(default)]
    pub tracks: Option<TracksRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistEntry {
    #[serde(default)]
    pub track: Option<PlayableItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayHistory {
    #[serde(default)]
    pub track: Option<Track>,
    #[serde(default)]
    pub played_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SavedTrack {
    #[serde(default)]
    pub track: Option<Track>,
    #[serde(default)]
    pub added_at: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentlyPlaying {
    #[serde(default)]
    pub is_playing: bool,
    #[serde(default)]
    pub progress_ms: Option<u64>,
    #[serde(default)]
    pub item: Option<PlayableItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub tracks: Option<Paging<Option<Track>>>,
    #[serde(default)]
    pub albums: Option<Paging<Option<Album>>>,
    #[serde(default)]
    pub artists: Option<Paging<Option<Artist>>>,
    #[serde(default)]
    pub playlists: Option<Paging<Option<Playlist>>>,
}

/// `GET /v1/me/following` nests its page under `artists`.
#[derive(Debug, Clone, Deserialize)]
pub struct FollowedArtists {
    pub artists: Paging<Option<Artist>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPlaylist {
    pub id: String,
    pub name: String,
}
