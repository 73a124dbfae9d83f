//! Tool argument schemas. `serde` rejects wrongly-typed arguments and
//! [`Validate`] rejects out-of-range ones, both before anything is dispatched.

use rmcp::ErrorData as McpError;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::domain::{PlayType, QueueType, SearchType, TimeRange, TopType};

pub const MAX_LIMIT: u32 = 50;
pub const MAX_OFFSET: u32 = 1000;
pub const SEARCH_DEFAULT_LIMIT: u32 = 20;
pub const LIST_DEFAULT_LIMIT: u32 = 50;

pub trait Validate {
    fn validate(&self) -> Result<(), McpError>;
}

fn check_range(field: &str, value: Option<u32>, min: u32, max: u32) -> Result<(), McpError> {
    match value {
        Some(v) if v < min || v > max => Err(McpError::invalid_params(
            format!("{field} must be between {min} and {max}, got {v}"),
            None,
        )),
        _ => Ok(()),
    }
}

fn check_limit(limit: Option<u32>) -> Result<(), McpError> {
    check_range("limit", limit, 1, MAX_LIMIT)
}

fn check_offset(offset: Option<u32>) -> Result<(), McpError> {
    check_range("offset", offset, 0, MAX_OFFSET)
}

fn check_non_empty(field: &str, value: &str) -> Result<(), McpError> {
    if value.trim().is_empty() {
        return Err(McpError::invalid_params(format!("{field} must not be empty"), None));
    }
    Ok(())
}

/// Spotify ids are base62; anything else would end up as part of a URL path.
fn check_spotify_id(field: &str, value: &str) -> Result<(), McpError> {
    check_non_empty(field, value)?;
    if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(McpError::invalid_params(
            format!("{field} must be a Spotify ID (letters and digits only), got {value:?}"),
            None,
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchArgs {
    /// Free-text query. Field filters are passed through as-is, e.g.
    /// `artist:Radiohead`, `album:"OK Computer"`, `year:1997`, `year:1990-1999`,
    /// `genre:jazz`, `tag:new`, `tag:hipster`.
    pub query: String,
    /// What to search for.
    #[serde(rename = "type")]
    pub kind: SearchType,
    /// Maximum number of results (1-50, default 20).
    #[serde(default)]
    #[schemars(range(min = 1, max = 50))]
    pub limit: Option<u32>,
    /// Index of the first result (0-1000, default 0).
    #[serde(default)]
    #[schemars(range(min = 0, max = 1000))]
    pub offset: Option<u32>,
}

impl Validate for SearchArgs {
    fn validate(&self) -> Result<(), McpError> {
        check_non_empty("query", &self.query)?;
        check_limit(self.limit)?;
        check_offset(self.offset)
    }
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct LimitArgs {
    /// Maximum number of items (1-50, default 50).
    #[serde(default)]
    #[schemars(range(min = 1, max = 50))]
    pub limit: Option<u32>,
}

impl Validate for LimitArgs {
    fn validate(&self) -> Result<(), McpError> {
        check_limit(self.limit)
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistTracksArgs {
    /// Spotify playlist id.
    pub playlist_id: String,
    /// Maximum number of tracks (1-50, default 50).
    #[serde(default)]
    #[schemars(range(min = 1, max = 50))]
    pub limit: Option<u32>,
}

impl Validate for PlaylistTracksArgs {
    fn validate(&self) -> Result<(), McpError> {
        check_spotify_id("playlistId", &self.playlist_id)?;
        check_limit(self.limit)
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopItemsArgs {
    /// Top `artists` or top `tracks`.
    #[serde(rename = "type")]
    pub kind: TopType,
    /// `short_term` (~4 weeks), `medium_term` (~6 months, default) or `long_term` (~1 year).
    #[serde(default)]
    pub time_range: Option<TimeRange>,
    /// Maximum number of items (1-50, default 50).
    #[serde(default)]
    #[schemars(range(min = 1, max = 50))]
    pub limit: Option<u32>,
}

impl Validate for TopItemsArgs {
    fn validate(&self) -> Result<(), McpError> {
        check_limit(self.limit)
    }
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SavedTracksArgs {
    /// Maximum number of tracks (1-50, default 50).
    #[serde(default)]
    #[schemars(range(min = 1, max = 50))]
    pub limit: Option<u32>,
    /// Index of the first track (0-1000, default 0).
    #[serde(default)]
    #[schemars(range(min = 0, max = 1000))]
    pub offset: Option<u32>,
}

impl Validate for SavedTracksArgs {
    fn validate(&self) -> Result<(), McpError> {
        check_limit(self.limit)?;
        check_offset(self.offset)
    }
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlayMusicArgs {
    /// Spotify URI to play, e.g. `spotify:album:...`. Overrides type and id.
    #[serde(default)]
    pub uri: Option<String>,
    /// Kind of item to play; needs `id`.
    #[serde(default, rename = "type")]
    pub kind: Option<PlayType>,
    /// Spotify id of the item; needs `type`.
    #[serde(default)]
    pub id: Option<String>,
    /// Device to play on; defaults to the active device.
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceArgs {
    /// Device to control; defaults to the active device.
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QueueArgs {
    /// Spotify URI to enqueue. Overrides type and id.
    #[serde(default)]
    pub uri: Option<String>,
    /// Kind of item to enqueue; needs `id`.
    #[serde(default, rename = "type")]
    pub kind: Option<QueueType>,
    /// Spotify id of the item; needs `type`.
    #[serde(default)]
    pub id: Option<String>,
    /// Device whose queue to add to; defaults to the active device.
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CreatePlaylistArgs {
    /// Name of the new playlist.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Whether the playlist is public (default false).
    #[serde(default)]
    pub public: bool,
}

impl Validate for CreatePlaylistArgs {
    fn validate(&self) -> Result<(), McpError> {
        check_non_empty("name", &self.name)
    }
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistEditArgs {
    /// Spotify playlist id.
    pub playlist_id: String,
    /// Spotify track ids (not URIs), in the order to apply.
    pub track_ids: Vec<String>,
}

impl Validate for PlaylistEditArgs {
    fn validate(&self) -> Result<(), McpError> {
        check_spotify_id("playlistId", &self.playlist_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn search(limit: Option<u32>, offset: Option<u32>) -> SearchArgs {
        SearchArgs { query: "q".into(), kind: SearchType::Track, limit, offset }
    }

    #[test]
    fn search_bounds_are_inclusive() {
        assert!(search(Some(1), Some(0)).validate().is_ok());
        assert!(search(Some(50), Some(1000)).validate().is_ok());
        assert!(search(None, None).validate().is_ok());
    }

    #[test]
    fn search_rejects_out_of_range_as_invalid_params() {
        for args in [search(Some(0), None), search(Some(51), None), search(None, Some(1001))] {
            let err = args.validate().unwrap_err();
            assert_eq!(err.code.0, -32602);
        }
    }

    #[test]
    fn search_rejects_unknown_type() {
        let res = serde_json::from_value::<SearchArgs>(json!({"query": "x", "type": "podcast"}));
        assert!(res.is_err());
    }

    #[test]
    fn playlist_edit_uses_camel_case_keys() {
        let args: PlaylistEditArgs =
            serde_json::from_value(json!({"playlistId": "P1", "trackIds": ["t1", "t2"]})).unwrap();
        assert_eq!(args.playlist_id, "P1");
        assert_eq!(args.track_ids, vec!["t1", "t2"]);
    }

    #[test]
    fn playlist_ids_must_be_base62() {
        for bad in ["../me", "..", "P1/tracks", "p%2F1", " "] {
            let edit = PlaylistEditArgs { playlist_id: bad.into(), track_ids: vec!["t1".into()] };
            assert_eq!(edit.validate().unwrap_err().code.0, -32602, "accepted {bad:?}");
            let read = PlaylistTracksArgs { playlist_id: bad.into(), limit: None };
            assert_eq!(read.validate().unwrap_err().code.0, -32602, "accepted {bad:?}");
        }
        let ok = PlaylistEditArgs { playlist_id: "37i9dQZF1DXcBWIGoYBM5M".into(), track_ids: vec![] };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn play_args_read_type_field() {
        let args: PlayMusicArgs =
            serde_json::from_value(json!({"type": "album", "id": "a1", "deviceId": "d"})).unwrap();
        assert_eq!(args.kind, Some(PlayType::Album));
        assert_eq!(args.device_id.as_deref(), Some("d"));
    }

    #[test]
    fn create_playlist_defaults_to_private() {
        let args: CreatePlaylistArgs = serde_json::from_value(json!({"name": "Mix"})).unwrap();
        assert!(!args.public);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn schema_exposes_camel_case_properties() {
        let schema = serde_json::to_value(schemars::schema_for!(PlaylistTracksArgs)).unwrap();
        assert!(schema["properties"]["playlistId"].is_object());
        assert!(schema["properties"]["limit"].is_object());
    }
}
