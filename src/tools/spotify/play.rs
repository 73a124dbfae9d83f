//! Playback control tools.

use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;

use super::params::{DeviceArgs, PlayMusicArgs, QueueArgs};
use crate::clients::dispatcher::Dispatcher;
use crate::clients::spotify::PlaybackTarget;
use crate::core::content::error_result;
use crate::domain::{resolve_uri, uri_kind, PlayType};

pub const MISSING_TARGET: &str = "Error: Must provide either a URI or both a type and ID";

/// Track URIs are played as a one-element list, everything else as a context.
fn playback_target(uri: String, kind: Option<PlayType>) -> PlaybackTarget {
    let is_track = match kind {
        Some(kind) => kind == PlayType::Track,
        None => uri_kind(&uri) == Some("track"),
    };
    if is_track {
        PlaybackTarget::Tracks(vec![uri])
    } else {
        PlaybackTarget::Context(uri)
    }
}

pub async fn play_music(d: &Dispatcher, args: PlayMusicArgs) -> Result<CallToolResult, McpError> {
    let PlayMusicArgs { uri, kind, id, device_id } = args;
    let Some(resolved) = resolve_uri(uri.as_deref(), kind.map(PlayType::as_str), id.as_deref()) else {
        return Ok(error_result(MISSING_TARGET));
    };
    let target = playback_target(resolved.clone(), kind);
    let message = match (kind, id.as_deref()) {
        (Some(kind), Some(id)) if uri.is_none() => format!("Started playing {} (ID: {id})", kind.as_str()),
        _ => format!("Started playing {resolved}"),
    };
    tracing::debug!(?target, "play_music");

    Ok(d.run("starting playback", |api| async move {
        api.start_playback(&target, device_id.as_deref()).await?;
        Ok(message)
    })
    .await)
}

pub async fn pause_playback(d: &Dispatcher, args: DeviceArgs) -> Result<CallToolResult, McpError> {
    Ok(d.run("pausing playback", |api| async move {
        api.pause_playback(args.device_id.as_deref()).await?;
        Ok("Playback paused".to_string())
    })
    .await)
}

pub async fn resume_playback(d: &Dispatcher, args: DeviceArgs) -> Result<CallToolResult, McpError> {
    Ok(d.run("resuming playback", |api| async move {
        api.start_playback(&PlaybackTarget::Resume, args.device_id.as_deref())
            .await?;
        Ok("Playback resumed".to_string())
    })
    .await)
}

pub async fn skip_to_next(d: &Dispatcher, args: DeviceArgs) -> Result<CallToolResult, McpError> {
    Ok(d.run("skipping to next track", |api| async move {
        api.skip_to_next(args.device_id.as_deref()).await?;
        Ok("Skipped to next track".to_string())
    })
    .await)
}

pub async fn skip_to_previous(d: &Dispatcher, args: DeviceArgs) -> Result<CallToolResult, McpError> {
    Ok(d.run("skipping to previous track", |api| async move {
        api.skip_to_previous(args.device_id.as_deref()).await?;
        Ok("Skipped to previous track".to_string())
    })
    .await)
}

pub async fn add_to_queue(d: &Dispatcher, args: QueueArgs) -> Result<CallToolResult, McpError> {
    let QueueArgs { uri, kind, id, device_id } = args;
    let Some(resolved) = resolve_uri(uri.as_deref(), kind.map(|k| k.as_str()), id.as_deref()) else {
        return Ok(error_result(MISSING_TARGET));
    };

    Ok(d.run("adding item to queue", |api| async move {
        api.add_to_queue(&resolved, device_id.as_deref()).await?;
        Ok(format!("Added item {resolved} to queue"))
    })
    .await)
}
