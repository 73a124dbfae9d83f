//! Read-only tools: search, now playing and the list-style library reads.

use rmcp::model::CallToolResult;
use rmcp::ErrorData as McpError;

use super::format::{
    album_line, artist_line, my_playlist_line, now_playing, numbered, playable_line,
    search_playlist_line, track_line,
};
use super::params::{
    LimitArgs, PlaylistTracksArgs, SavedTracksArgs, SearchArgs, TopItemsArgs, Validate,
    LIST_DEFAULT_LIMIT, SEARCH_DEFAULT_LIMIT,
};
use crate::clients::dispatcher::Dispatcher;
use crate::core::SpotifyError;
use crate::domain::{Artist, PlayableItem, SearchType, TopType, Track};

fn section(heading: &str, body: String) -> String {
    format!("# {heading}\n\n{body}")
}

pub async fn search(d: &Dispatcher, args: SearchArgs) -> Result<CallToolResult, McpError> {
    args.validate()?;
    let SearchArgs { query, kind, limit, offset } = args;
    let limit = limit.unwrap_or(SEARCH_DEFAULT_LIMIT);
    let offset = offset.unwrap_or(0);
    let doing = match kind {
        SearchType::Track => "searching for tracks",
        SearchType::Album => "searching for albums",
        SearchType::Artist => "searching for artists",
        SearchType::Playlist => "searching for playlists",
    };

    Ok(d.run(doing, |api| async move {
        let res = api.search(&query, kind, limit, offset).await?;
        let (count, listing) = match kind {
            SearchType::Track => {
                let items = res.tracks.unwrap_or_default().items;
                (items.len(), numbered(&items, "[Unavailable track]", track_line))
            }
            SearchType::Album => {
                let items = res.albums.unwrap_or_default().items;
                (items.len(), numbered(&items, "[Unavailable album]", album_line))
            }
            SearchType::Artist => {
                let items = res.artists.unwrap_or_default().items;
                (items.len(), numbered(&items, "[Unavailable artist]", artist_line))
            }
            SearchType::Playlist => {
                let items = res.playlists.unwrap_or_default().items;
                (items.len(), numbered(&items, "[Unavailable playlist]", search_playlist_line))
            }
        };
        if count == 0 {
            return Ok(format!("No {} results found for \"{query}\"", kind.as_str()));
        }
        Ok(format!(
            "# Search results for \"{query}\" (type: {})\n\n{listing}",
            kind.as_str()
        ))
    })
    .await)
}

pub async fn get_now_playing(d: &Dispatcher) -> Result<CallToolResult, McpError> {
    Ok(d.run("getting current track", |api| async move {
        let current = api.currently_playing().await?;
        Ok(now_playing(current.as_ref()))
    })
    .await)
}

pub async fn get_my_playlists(d: &Dispatcher, args: LimitArgs) -> Result<CallToolResult, McpError> {
    args.validate()?;
    let limit = args.limit.unwrap_or(LIST_DEFAULT_LIMIT);
    Ok(d.run("getting playlists", |api| async move {
        let page = api.my_playlists(limit).await?;
        if page.items.is_empty() {
            return Ok("You don't have any playlists on Spotify".to_string());
        }
        Ok(section(
            "Your Spotify Playlists",
            numbered(&page.items, "[Unavailable playlist]", my_playlist_line),
        ))
    })
    .await)
}

pub async fn get_playlist_tracks(
    d: &Dispatcher,
    args: PlaylistTracksArgs,
) -> Result<CallToolResult, McpError> {
    args.validate()?;
    let limit = args.limit.unwrap_or(LIST_DEFAULT_LIMIT);
    let playlist_id = args.playlist_id;
    Ok(d.run("getting playlist tracks", |api| async move {
        let page = api.playlist_items(&playlist_id, limit).await?;
        if page.items.is_empty() {
            return Ok("Playlist doesn't have any tracks".to_string());
        }
        let items: Vec<Option<PlayableItem>> = page.items.into_iter().map(|entry| entry.track).collect();
        Ok(section(
            "Tracks in Playlist",
            numbered(&items, "[Removed track]", playable_line),
        ))
    })
    .await)
}

pub async fn get_recently_played(d: &Dispatcher, args: LimitArgs) -> Result<CallToolResult, McpError> {
    args.validate()?;
    let limit = args.limit.unwrap_or(LIST_DEFAULT_LIMIT);
    Ok(d.run("getting recently played tracks", |api| async move {
        let page = api.recently_played(limit).await?;
        if page.items.is_empty() {
            return Ok("You don't have any recently played tracks on Spotify".to_string());
        }
        let tracks: Vec<Option<Track>> = page.items.into_iter().map(|h| h.track).collect();
        Ok(section(
            "Recently Played Tracks",
            numbered(&tracks, "[Removed track]", track_line),
        ))
    })
    .await)
}

pub async fn get_followed_artists(d: &Dispatcher, args: LimitArgs) -> Result<CallToolResult, McpError> {
    args.validate()?;
    let limit = args.limit.unwrap_or(LIST_DEFAULT_LIMIT);
    Ok(d.run("getting followed artists", |api| async move {
        let page = api.followed_artists(limit).await?.artists;
        if page.items.is_empty() {
            return Ok("You don't follow any artists on Spotify".to_string());
        }
        Ok(section(
            "Followed Artists",
            numbered(&page.items, "[Unavailable artist]", artist_line),
        ))
    })
    .await)
}

pub async fn get_top_items(d: &Dispatcher, args: TopItemsArgs) -> Result<CallToolResult, McpError> {
    args.validate()?;
    let limit = args.limit.unwrap_or(LIST_DEFAULT_LIMIT);
    let time_range = args.time_range.unwrap_or_default();
    let kind = args.kind;
    Ok(d.run("getting top items", |api| async move {
        let page = api.top_items(kind, time_range, limit).await?;
        if page.items.is_empty() {
            return Ok(format!("You don't have any top {} on Spotify yet", kind.as_str()));
        }
        let body = match kind {
            TopType::Tracks => {
                let tracks = decode_all::<Track>(page.items)?;
                numbered(&tracks, "[Removed track]", track_line)
            }
            TopType::Artists => {
                let artists = decode_all::<Artist>(page.items)?;
                numbered(&artists, "[Unavailable artist]", artist_line)
            }
        };
        let heading = match kind {
            TopType::Tracks => "Your Top Tracks",
            TopType::Artists => "Your Top Artists",
        };
        Ok(section(&format!("{heading} ({})", time_range.as_str()), body))
    })
    .await)
}

/// Null entries stay `None` so they can be rendered as placeholders.
fn decode_all<T: serde::de::DeserializeOwned>(
    items: Vec<serde_json::Value>,
) -> Result<Vec<Option<T>>, SpotifyError> {
    items
        .into_iter()
        .map(|v| {
            if v.is_null() {
                Ok(None)
            } else {
                serde_json::from_value(v).map(Some).map_err(SpotifyError::from)
            }
        })
        .collect()
}

pub async fn get_saved_tracks(d: &Dispatcher, args: SavedTracksArgs) -> Result<CallToolResult, McpError> {
    args.validate()?;
    let limit = args.limit.unwrap_or(LIST_DEFAULT_LIMIT);
    let offset = args.offset.unwrap_or(0);
    Ok(d.run("getting saved tracks", |api| async move {
        let page = api.saved_tracks(limit, offset).await?;
        if page.items.is_empty() {
            return Ok("You don't have any saved tracks on Spotify".to_string());
        }
        let tracks: Vec<Option<Track>> = page.items.into_iter().map(|s| s.track).collect();
        let heading = match page.total {
            Some(total) => format!("Your Liked Songs ({total} total)"),
            None => "Your Liked Songs".to_string(),
        };
        Ok(section(&heading, numbered(&tracks, "[Removed track]", track_line)))
    })
    .await)
}
