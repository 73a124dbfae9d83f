//! Playlist mutation tools.

use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;

use super::format::tracks_word;
use super::params::{CreatePlaylistArgs, PlaylistEditArgs, Validate};
use crate::clients::dispatcher::Dispatcher;
use crate::core::content::text_result;
use crate::domain::spotify_uri;

pub const NO_TRACK_IDS: &str = "No track IDs provided";

fn track_uris(ids: &[String]) -> Vec<String> {
    ids.iter().map(|id| spotify_uri("track", id)).collect()
}

pub async fn create_playlist(d: &Dispatcher, args: CreatePlaylistArgs) -> Result<CallToolResult, McpError> {
    args.validate()?;
    let CreatePlaylistArgs { name, description, public } = args;
    Ok(d.run("creating playlist", |api| async move {
        let me = api.current_user().await?;
        let created = api
            .create_playlist(&me.id, &name, description.as_deref(), public)
            .await?;
        Ok(format!(
            "Successfully created playlist \"{}\"\nPlaylist ID: {}",
            created.name, created.id
        ))
    })
    .await)
}

pub async fn add_tracks(d: &Dispatcher, args: PlaylistEditArgs) -> Result<CallToolResult, McpError> {
    args.validate()?;
    if args.track_ids.is_empty() {
        return Ok(text_result(NO_TRACK_IDS));
    }
    let PlaylistEditArgs { playlist_id, track_ids } = args;
    let uris = track_uris(&track_ids);
    Ok(d.run("adding tracks to playlist", |api| async move {
        api.add_playlist_items(&playlist_id, &uris).await?;
        Ok(format!(
            "Successfully added {} {} to playlist (ID: {playlist_id})",
            uris.len(),
            tracks_word(uris.len())
        ))
    })
    .await)
}

pub async fn remove_tracks(d: &Dispatcher, args: PlaylistEditArgs) -> Result<CallToolResult, McpError> {
    args.validate()?;
    if args.track_ids.is_empty() {
        return Ok(text_result(NO_TRACK_IDS));
    }
    let PlaylistEditArgs { playlist_id, track_ids } = args;
    let uris = track_uris(&track_ids);
    Ok(d.run("removing tracks from playlist", |api| async move {
        api.remove_playlist_items(&playlist_id, &uris).await?;
        Ok(format!(
            "Successfully removed {} {} from playlist (ID: {playlist_id})",
            uris.len(),
            tracks_word(uris.len())
        ))
    })
    .await)
}
