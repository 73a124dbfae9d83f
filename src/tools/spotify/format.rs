//! Pure response-to-text formatting.

use crate::domain::{
    Album, Artist, CurrentlyPlaying, Episode, PlayableItem, Playlist, SimplifiedArtist, Track,
};

/// `M:SS`, seconds zero-padded. 125000 -> "2:05".
pub fn format_duration(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

pub fn join_artists(artists: &[SimplifiedArtist]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn id_or_local(id: &Option<String>) -> &str {
    id.as_deref().unwrap_or("local")
}

/// Render `items` as a 1-based list, one line each. Entries that are `None`
/// get the `missing` placeholder instead of being dropped.
pub fn numbered<T>(
    items: &[Option<T>],
    missing: &str,
    line: impl Fn(&T) -> String,
) -> String {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| match item {
            Some(item) => format!("{}. {}", i + 1, line(item)),
            None => format!("{}. {}", i + 1, missing),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn track_line(track: &Track) -> String {
    format!(
        "\"{}\" by {} ({}) - ID: {}",
        track.name,
        join_artists(&track.artists),
        format_duration(track.duration_ms),
        id_or_local(&track.id)
    )
}

pub fn episode_line(episode: &Episode) -> String {
    format!(
        "\"{}\" (podcast episode) - ID: {}",
        episode.name,
        id_or_local(&episode.id)
    )
}

/// Playlists can hold episodes next to tracks.
pub fn playable_line(item: &PlayableItem) -> String {
    match item {
        PlayableItem::Track(track) => track_line(track),
        PlayableItem::Episode(episode) => episode_line(episode),
    }
}

pub fn album_line(album: &Album) -> String {
    format!(
        "\"{}\" by {} - ID: {}",
        album.name,
        join_artists(&album.artists),
        album.id
    )
}

pub fn artist_line(artist: &Artist) -> String {
    if artist.genres.is_empty() {
        format!("{} - ID: {}", artist.name, artist.id)
    } else {
        format!(
            "{} ({}) - ID: {}",
            artist.name,
            artist.genres.join(", "),
            artist.id
        )
    }
}

pub fn search_playlist_line(playlist: &Playlist) -> String {
    let owner = playlist
        .owner
        .as_ref()
        .and_then(|o| o.display_name.as_deref())
        .unwrap_or("Unknown owner");
    let description = playlist
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or("No description");
    format!(
        "\"{}\" ({}) by {} - ID: {}",
        playlist.name.as_deref().unwrap_or("Unknown Playlist"),
        description,
        owner,
        playlist.id
    )
}

pub fn my_playlist_line(playlist: &Playlist) -> String {
    let total = playlist.tracks.as_ref().map(|t| t.total).unwrap_or(0);
    format!(
        "\"{}\" ({} {}) - ID: {}",
        playlist.name.as_deref().unwrap_or("Unknown Playlist"),
        total,
        tracks_word(total as usize),
        playlist.id
    )
}

pub fn now_playing(current: Option<&CurrentlyPlaying>) -> String {
    let Some(current) = current else {
        return "Nothing is currently playing on Spotify".to_string();
    };
    let track = match &current.item {
        None => return "Nothing is currently playing on Spotify".to_string(),
        Some(PlayableItem::Episode(_)) => {
            return "Currently playing item is not a track (might be a podcast episode)".to_string()
        }
        Some(PlayableItem::Track(track)) => track,
    };
    let album = track
        .album
        .as_ref()
        .map(|a| a.name.as_str())
        .unwrap_or("Unknown album");
    format!(
        "# Currently Playing\n\n\
         **Track**: \"{}\"\n\
         **Artist**: {}\n\
         **Album**: {}\n\
         **Progress**: {} / {}\n\
         **Status**: {}\n\
         **ID**: {}",
        track.name,
        join_artists(&track.artists),
        album,
        format_duration(current.progress_ms.unwrap_or(0)),
        format_duration(track.duration_ms),
        if current.is_playing { "Playing" } else { "Paused" },
        id_or_local(&track.id)
    )
}

/// "track" for one, "tracks" otherwise.
pub fn tracks_word(count: usize) -> &'static str {
    if count == 1 {
        "track"
    } else {
        "tracks"
    }
}
