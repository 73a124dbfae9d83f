use std::future::Future;
use std::sync::Arc;

use rmcp::handler::server::tool::{Parameters, ToolRouter};
use rmcp::model::{CallToolResult, ServerCapabilities, ServerInfo};
use rmcp::ErrorData as McpError;

use super::params::{
    CreatePlaylistArgs, DeviceArgs, LimitArgs, PlayMusicArgs, PlaylistEditArgs,
    PlaylistTracksArgs, QueueArgs, SavedTracksArgs, SearchArgs, TopItemsArgs,
};
use super::{play, playlist, read};
use crate::clients::dispatcher::Dispatcher;
use crate::infra::runtime::mcp_transport::ServerHandler;

/// MCP handler exposing the Spotify tools. Every tool goes through the shared
/// [`Dispatcher`].
#[derive(Clone)]
pub struct SpotifySvc {
    pub dispatcher: Arc<Dispatcher>,
}

impl SpotifySvc {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

impl ServerHandler for SpotifySvc {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Control Spotify: search the catalogue, inspect and control playback, \
                 and read or edit the user's playlists and library."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[rmcp::tool_router]
impl SpotifySvc {
    #[rmcp::tool(
        name = "searchSpotify",
        description = "Search Spotify for tracks, albums, artists or playlists. The query accepts field filters such as artist:, album:, track:, year: (e.g. year:1990-1999), genre: and tag:new"
    )]
    async fn search_spotify(&self, params: Parameters<SearchArgs>) -> Result<CallToolResult, McpError> {
        read::search(&self.dispatcher, params.0).await
    }

    #[rmcp::tool(
        name = "getNowPlaying",
        description = "Get information about the currently playing track on Spotify"
    )]
    async fn get_now_playing(&self) -> Result<CallToolResult, McpError> {
        read::get_now_playing(&self.dispatcher).await
    }

    #[rmcp::tool(
        name = "getMyPlaylists",
        description = "Get a list of the current user's playlists on Spotify"
    )]
    async fn get_my_playlists(&self, params: Parameters<LimitArgs>) -> Result<CallToolResult, McpError> {
        read::get_my_playlists(&self.dispatcher, params.0).await
    }

    #[rmcp::tool(
        name = "getPlaylistTracks",
        description = "Get a list of tracks in a Spotify playlist"
    )]
    async fn get_playlist_tracks(
        &self,
        params: Parameters<PlaylistTracksArgs>,
    ) -> Result<CallToolResult, McpError> {
        read::get_playlist_tracks(&self.dispatcher, params.0).await
    }

    #[rmcp::tool(
        name = "getRecentlyPlayed",
        description = "Get a list of recently played tracks on Spotify"
    )]
    async fn get_recently_played(&self, params: Parameters<LimitArgs>) -> Result<CallToolResult, McpError> {
        read::get_recently_played(&self.dispatcher, params.0).await
    }

    #[rmcp::tool(
        name = "getFollowedArtists",
        description = "Get the artists the current user follows on Spotify"
    )]
    async fn get_followed_artists(&self, params: Parameters<LimitArgs>) -> Result<CallToolResult, McpError> {
        read::get_followed_artists(&self.dispatcher, params.0).await
    }

    #[rmcp::tool(
        name = "getTopItems",
        description = "Get the current user's top artists or tracks over a time range"
    )]
    async fn get_top_items(&self, params: Parameters<TopItemsArgs>) -> Result<CallToolResult, McpError> {
        read::get_top_items(&self.dispatcher, params.0).await
    }

    #[rmcp::tool(
        name = "getUsersSavedTracks",
        description = "Get the tracks saved in the current user's Liked Songs library"
    )]
    async fn get_users_saved_tracks(
        &self,
        params: Parameters<SavedTracksArgs>,
    ) -> Result<CallToolResult, McpError> {
        read::get_saved_tracks(&self.dispatcher, params.0).await
    }

    #[rmcp::tool(
        name = "playMusic",
        description = "Start playing a Spotify track, album, artist or playlist, given a URI or a type and ID"
    )]
    async fn play_music(&self, params: Parameters<PlayMusicArgs>) -> Result<CallToolResult, McpError> {
        play::play_music(&self.dispatcher, params.0).await
    }

    #[rmcp::tool(name = "pausePlayback", description = "Pause Spotify playback on the active device")]
    async fn pause_playback(&self, params: Parameters<DeviceArgs>) -> Result<CallToolResult, McpError> {
        play::pause_playback(&self.dispatcher, params.0).await
    }

    #[rmcp::tool(name = "resumePlayback", description = "Resume Spotify playback on the active device")]
    async fn resume_playback(&self, params: Parameters<DeviceArgs>) -> Result<CallToolResult, McpError> {
        play::resume_playback(&self.dispatcher, params.0).await
    }

    #[rmcp::tool(name = "skipToNext", description = "Skip to the next track in the current Spotify playback queue")]
    async fn skip_to_next(&self, params: Parameters<DeviceArgs>) -> Result<CallToolResult, McpError> {
        play::skip_to_next(&self.dispatcher, params.0).await
    }

    #[rmcp::tool(name = "skipToPrevious", description = "Skip to the previous track in the current Spotify playback queue")]
    async fn skip_to_previous(&self, params: Parameters<DeviceArgs>) -> Result<CallToolResult, McpError> {
        play::skip_to_previous(&self.dispatcher, params.0).await
    }

    #[rmcp::tool(
        name = "addToQueue",
        description = "Add a track or episode to the playback queue, given a URI or a type and ID"
    )]
    async fn add_to_queue(&self, params: Parameters<QueueArgs>) -> Result<CallToolResult, McpError> {
        play::add_to_queue(&self.dispatcher, params.0).await
    }

    #[rmcp::tool(name = "createPlaylist", description = "Create a new playlist on Spotify")]
    async fn create_playlist(&self, params: Parameters<CreatePlaylistArgs>) -> Result<CallToolResult, McpError> {
        playlist::create_playlist(&self.dispatcher, params.0).await
    }

    #[rmcp::tool(name = "addTracksToPlaylist", description = "Add tracks to a Spotify playlist")]
    async fn add_tracks_to_playlist(
        &self,
        params: Parameters<PlaylistEditArgs>,
    ) -> Result<CallToolResult, McpError> {
        playlist::add_tracks(&self.dispatcher, params.0).await
    }

    #[rmcp::tool(name = "removeTracksFromPlaylist", description = "Remove tracks from a Spotify playlist")]
    async fn remove_tracks_from_playlist(
        &self,
        params: Parameters<PlaylistEditArgs>,
    ) -> Result<CallToolResult, McpError> {
        playlist::remove_tracks(&self.dispatcher, params.0).await
    }
}

pub type SpotifyRouter = ToolRouter<SpotifySvc>;

impl SpotifySvc {
    pub fn router() -> SpotifyRouter {
        // Expose the macro-generated private tool_router
        Self::tool_router()
    }
}
