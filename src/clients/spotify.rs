use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::SpotifyError;
use crate::domain::{
    CreatedPlaylist, CurrentlyPlaying, FollowedArtists, Paging, PlayHistory, Playlist,
    PlaylistEntry, SavedTrack, SearchResults, SearchType, TimeRange, TopType, UserProfile,
};
use crate::infra::http::headers::add_standard_headers;

/// Authenticated handle on the Web API. Built per call by the dispatcher.
#[derive(Clone)]
pub struct SpotifyClient {
    base: String,
    http: Client,
    access_token: String,
}

#[derive(Serialize)]
struct PlayBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    context_uri: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uris: Option<Vec<&'a str>>,
}

#[derive(Serialize)]
struct UrisBody<'a> {
    uris: &'a [String],
}

#[derive(Serialize)]
struct TrackRef<'a> {
    uri: &'a str,
}

#[derive(Serialize)]
struct RemoveBody<'a> {
    tracks: Vec<TrackRef<'a>>,
}

#[derive(Serialize)]
struct CreatePlaylistBody<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    public: bool,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// What to start playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackTarget {
    /// Resume whatever was playing.
    Resume,
    /// Play exactly these track URIs.
    Tracks(Vec<String>),
    /// Play an album/artist/playlist context.
    Context(String),
}

impl SpotifyClient {
    pub fn new(http: Client, base: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            http,
            access_token: access_token.into(),
        }
    }

    /// `{base}/v1/<segments>`, each segment percent-encoded on its own so an
    /// id can never add or climb path levels.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SpotifyError> {
        let mut url = Url::parse(&self.base)
            .map_err(|e| SpotifyError::config(format!("invalid API base URL {}: {e}", self.base)))?;
        url.path_segments_mut()
            .map_err(|_| SpotifyError::config(format!("API base URL {} cannot carry a path", self.base)))?
            .pop_if_empty()
            .push("v1")
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, SpotifyError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(%method, endpoint = %url, "spotify request");
        let (builder, _rid) = add_standard_headers(self.http.request(method, url), None);
        Ok(builder.bearer_auth(&self.access_token))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, SpotifyError> {
        let resp = builder.send().await?;
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(api_error(resp).await)
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<T, SpotifyError> {
        let resp = self.send(self.request(Method::GET, segments)?.query(query)).await?;
        decode(resp).await
    }

    /// Player and mutation endpoints answer 200/202/204 with bodies nobody reads.
    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), SpotifyError> {
        self.send(builder).await.map(|_| ())
    }

    fn bodiless(
        &self,
        method: Method,
        segments: &[&str],
        device_id: Option<&str>,
    ) -> Result<RequestBuilder, SpotifyError> {
        Ok(self
            .request(method, segments)?
            .query(&device_query(device_id))
            .header(reqwest::header::CONTENT_LENGTH, 0))
    }

    pub async fn current_user(&self) -> Result<UserProfile, SpotifyError> {
        self.get_json(&["me"], &[]).await
    }

    pub async fn search(
        &self,
        query: &str,
        kind: SearchType,
        limit: u32,
        offset: u32,
    ) -> Result<SearchResults, SpotifyError> {
        self.get_json(
            &["search"],
            &[
                ("q", query.to_owned()),
                ("type", kind.as_str().to_owned()),
                ("limit", limit.to_string()),
                ("offset", offset.to_string()),
            ],
        )
        .await
    }

    /// `None` when nothing is playing (the API answers 204).
    pub async fn currently_playing(&self) -> Result<Option<CurrentlyPlaying>, SpotifyError> {
        let resp = self
            .send(self.request(Method::GET, &["me", "player", "currently-playing"])?)
            .await?;
        if resp.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let bytes = resp.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    pub async fn recently_played(&self, limit: u32) -> Result<Paging<PlayHistory>, SpotifyError> {
        self.get_json(&["me", "player", "recently-played"], &[("limit", limit.to_string())])
            .await
    }

    pub async fn followed_artists(&self, limit: u32) -> Result<FollowedArtists, SpotifyError> {
        self.get_json(
            &["me", "following"],
            &[("type", "artist".to_owned()), ("limit", limit.to_string())],
        )
        .await
    }

    /// Top artists or tracks, returned untyped so one endpoint serves both kinds.
    pub async fn top_items(
        &self,
        kind: TopType,
        time_range: TimeRange,
        limit: u32,
    ) -> Result<Paging<serde_json::Value>, SpotifyError> {
        self.get_json(
            &["me", "top", kind.as_str()],
            &[
                ("time_range", time_range.as_str().to_owned()),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    pub async fn saved_tracks(&self, limit: u32, offset: u32) -> Result<Paging<SavedTrack>, SpotifyError> {
        self.get_json(
            &["me", "tracks"],
            &[("limit", limit.to_string()), ("offset", offset.to_string())],
        )
        .await
    }

    /// Entries Spotify can no longer resolve come back as `None`.
    pub async fn my_playlists(&self, limit: u32) -> Result<Paging<Option<Playlist>>, SpotifyError> {
        self.get_json(&["me", "playlists"], &[("limit", limit.to_string())])
            .await
    }

    pub async fn playlist_items(
        &self,
        playlist_id: &str,
        limit: u32,
    ) -> Result<Paging<PlaylistEntry>, SpotifyError> {
        self.get_json(
            &["playlists", playlist_id, "tracks"],
            &[("limit", limit.to_string())],
        )
        .await
    }

    pub async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: Option<&str>,
        public: bool,
    ) -> Result<CreatedPlaylist, SpotifyError> {
        let body = CreatePlaylistBody { name, description, public };
        let resp = self
            .send(
                self.request(Method::POST, &["users", user_id, "playlists"])?
                    .json(&body),
            )
            .await?;
        decode(resp).await
    }

    pub async fn add_playlist_items(&self, playlist_id: &str, uris: &[String]) -> Result<(), SpotifyError> {
        self.send_empty(
            self.request(Method::POST, &["playlists", playlist_id, "tracks"])?
                .json(&UrisBody { uris }),
        )
        .await
    }

    pub async fn remove_playlist_items(&self, playlist_id: &str, uris: &[String]) -> Result<(), SpotifyError> {
        let body = RemoveBody {
            tracks: uris.iter().map(|uri| TrackRef { uri }).collect(),
        };
        self.send_empty(
            self.request(Method::DELETE, &["playlists", playlist_id, "tracks"])?
                .json(&body),
        )
        .await
    }

    pub async fn start_playback(
        &self,
        target: &PlaybackTarget,
        device_id: Option<&str>,
    ) -> Result<(), SpotifyError> {
        const PLAY: &[&str] = &["me", "player", "play"];
        let builder = match target {
            PlaybackTarget::Resume => self.bodiless(Method::PUT, PLAY, device_id)?,
            PlaybackTarget::Tracks(uris) => self
                .request(Method::PUT, PLAY)?
                .query(&device_query(device_id))
                .json(&PlayBody {
                    context_uri: None,
                    uris: Some(uris.iter().map(String::as_str).collect()),
                }),
            PlaybackTarget::Context(uri) => self
                .request(Method::PUT, PLAY)?
                .query(&device_query(device_id))
                .json(&PlayBody { context_uri: Some(uri.as_str()), uris: None }),
        };
        self.send_empty(builder).await
    }

    pub async fn pause_playback(&self, device_id: Option<&str>) -> Result<(), SpotifyError> {
        self.send_empty(self.bodiless(Method::PUT, &["me", "player", "pause"], device_id)?)
            .await
    }

    pub async fn skip_to_next(&self, device_id: Option<&str>) -> Result<(), SpotifyError> {
        self.send_empty(self.bodiless(Method::POST, &["me", "player", "next"], device_id)?)
            .await
    }

    pub async fn skip_to_previous(&self, device_id: Option<&str>) -> Result<(), SpotifyError> {
        self.send_empty(self.bodiless(Method::POST, &["me", "player", "previous"], device_id)?)
            .await
    }

    pub async fn add_to_queue(&self, uri: &str, device_id: Option<&str>) -> Result<(), SpotifyError> {
        let mut query = vec![("uri", uri.to_owned())];
        query.extend(device_query(device_id));
        self.send_empty(
            self.request(Method::POST, &["me", "player", "queue"])?
                .query(&query)
                .header(reqwest::header::CONTENT_LENGTH, 0),
        )
        .await
    }
}

fn device_query(device_id: Option<&str>) -> Vec<(&'static str, String)> {
    device_id
        .filter(|d| !d.trim().is_empty())
        .map(|d| vec![("device_id", d.to_owned())])
        .unwrap_or_default()
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, SpotifyError> {
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Turn a non-2xx response into `SpotifyError::Api`, preferring Spotify's own message.
pub(crate) async fn api_error(resp: Response) -> SpotifyError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        });
    SpotifyError::Api { status: status.as_u16(), message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> SpotifyClient {
        SpotifyClient::new(Client::new(), server.base_url(), "token-1")
    }

    #[tokio::test]
    async fn it_sends_bearer_and_standard_headers() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/me")
                .header("authorization", "Bearer token-1")
                .header_exists("x-request-id")
                .header_exists("user-agent");
            then.status(200).json_body(json!({"id": "u1", "display_name": "Ada"}));
        });
        let me = client(&server).current_user().await.unwrap();
        m.assert();
        assert_eq!(me.id, "u1");
        assert_eq!(me.display_name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn search_passes_query_through_verbatim() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(GET)
                .path("/v1/search")
                .query_param("q", "artist:Radiohead year:1997")
                .query_param("type", "album")
                .query_param("limit", "5")
                .query_param("offset", "10");
            then.status(200).json_body(json!({"albums": {"items": []}}));
        });
        let res = client(&server)
            .search("artist:Radiohead year:1997", SearchType::Album, 5, 10)
            .await
            .unwrap();
        m.assert();
        assert!(res.albums.unwrap().items.is_empty());
    }

    #[test]
    fn endpoint_encodes_each_segment() {
        let c = SpotifyClient::new(Client::new(), "http://localhost:1234/", "t");
        let url = c.endpoint(&["playlists", "../me", "tracks"]).unwrap();
        assert_eq!(url.path(), "/v1/playlists/..%2Fme/tracks");
        let url = c.endpoint(&["users", "a b", "playlists"]).unwrap();
        assert_eq!(url.path(), "/v1/users/a%20b/playlists");
    }

    #[tokio::test]
    async fn playlist_id_cannot_climb_to_other_endpoints() {
        let server = MockServer::start();
        let elsewhere = server.mock(|when, then| {
            when.method(DELETE).path("/v1/me/tracks");
            then.status(200);
        });
        let encoded = server.mock(|when, then| {
            when.method(DELETE)
                .path_contains("/v1/playlists/")
                .path_contains("me/tracks");
            then.status(200).json_body(json!({"snapshot_id": "s"}));
        });
        client(&server)
            .remove_playlist_items("../me", &["spotify:track:t1".to_string()])
            .await
            .unwrap();
        elsewhere.assert_hits(0);
        encoded.assert();
    }

    #[tokio::test]
    async fn currently_playing_maps_204_to_none() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/me/player/currently-playing");
            then.status(204);
        });
        assert!(client(&server).currently_playing().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn playback_tracks_use_uris_body_and_device_query() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(PUT)
                .path("/v1/me/player/play")
                .query_param("device_id", "dev1")
                .json_body(json!({"uris": ["spotify:track:t1"]}));
            then.status(204);
        });
        client(&server)
            .start_playback(&PlaybackTarget::Tracks(vec!["spotify:track:t1".into()]), Some("dev1"))
            .await
            .unwrap();
        m.assert();
    }

    #[tokio::test]
    async fn playback_context_uses_context_uri() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(PUT)
                .path("/v1/me/player/play")
                .json_body(json!({"context_uri": "spotify:album:a1"}));
            then.status(204);
        });
        client(&server)
            .start_playback(&PlaybackTarget::Context("spotify:album:a1".into()), None)
            .await
            .unwrap();
        m.assert();
    }

    #[tokio::test]
    async fn remove_items_wraps_uris_in_track_objects() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(DELETE)
                .path("/v1/playlists/P1/tracks")
                .json_body(json!({"tracks": [{"uri": "spotify:track:a"}, {"uri": "spotify:track:b"}]}));
            then.status(200).json_body(json!({"snapshot_id": "s"}));
        });
        client(&server)
            .remove_playlist_items("P1", &["spotify:track:a".into(), "spotify:track:b".into()])
            .await
            .unwrap();
        m.assert();
    }

    #[tokio::test]
    async fn queue_sends_uri_as_query() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/me/player/queue")
                .query_param("uri", "spotify:episode:e1");
            then.status(204);
        });
        client(&server).add_to_queue("spotify:episode:e1", None).await.unwrap();
        m.assert();
    }

    #[tokio::test]
    async fn api_error_prefers_spotify_message() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PUT).path("/v1/me/player/pause");
            then.status(404)
                .json_body(json!({"error": {"status": 404, "message": "Player command failed: No active device found"}}));
        });
        let err = client(&server).pause_playback(None).await.unwrap_err();
        match err {
            SpotifyError::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Player command failed: No active device found");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn api_error_falls_back_to_status_reason() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v1/me/playlists");
            then.status(503).body("upstream down");
        });
        let err = client(&server).my_playlists(10).await.unwrap_err();
        assert_eq!(err.to_string(), "Spotify API returned 503: Service Unavailable");
    }
}
