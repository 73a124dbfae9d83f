use httpmock::prelude::*;
use rmcp::model::CallToolResult;
use serde_json::{json, Value};

use spotify_mcp_server::clients::dispatcher::Dispatcher;
use spotify_mcp_server::domain::{SearchType, TopType};
use spotify_mcp_server::infra::config::Config;
use spotify_mcp_server::infra::credentials::{load_from, save_to, SpotifyCredentials};
use spotify_mcp_server::tools::spotify::params::{
    LimitArgs, PlaylistEditArgs, SearchArgs, TopItemsArgs,
};
use spotify_mcp_server::tools::spotify::{playlist, read};

fn text(out: &CallToolResult) -> String {
    let v: Value = serde_json::to_value(out).unwrap();
    v["content"][0]["text"].as_str().unwrap_or_default().to_string()
}

fn temp_creds_file(name: &str, creds: &SpotifyCredentials) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!(
        "smcp-it-{}-{name}.json",
        std::process::id()
    ));
    save_to(&path, creds).unwrap();
    path
}

fn file_dispatcher(base: String, path: std::path::PathBuf) -> Dispatcher {
    let mut cfg = Config::with_base_url(base);
    cfg.credentials_path = path;
    Dispatcher::from_config(&cfg).unwrap()
}

#[tokio::test]
async fn expired_token_is_refreshed_persisted_and_used() {
    let server = MockServer::start();
    let token = server.mock(|when, then| {
        when.method(POST)
            .path("/api/token")
            .x_www_form_urlencoded_tuple("grant_type", "refresh_token");
        then.status(200).json_body(json!({
            "access_token": "fresh", "token_type": "Bearer", "expires_in": 3600
        }));
    });
    let search = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/search")
            .query_param("q", "daft punk")
            .query_param("type", "artist")
            .header("authorization", "Bearer fresh");
        then.status(200).json_body(json!({
            "artists": {"items": [{"id": "a1", "name": "Daft Punk", "genres": ["french house"]}], "total": 1}
        }));
    });

    let path = temp_creds_file(
        "refresh",
        &SpotifyCredentials {
            client_id: "cid".into(),
            client_secret: "secret".into(),
            redirect_uri: "http://127.0.0.1:8888/callback".into(),
            access_token: Some("stale".into()),
            refresh_token: Some("rt".into()),
            expires_at: Some(0),
        },
    );
    let d = file_dispatcher(server.base_url(), path.clone());

    let out = read::search(
        &d,
        SearchArgs { query: "daft punk".into(), kind: SearchType::Artist, limit: None, offset: None },
    )
    .await
    .unwrap();

    token.assert();
    search.assert();
    assert!(text(&out).contains("1. Daft Punk (french house) - ID: a1"));

    let saved = load_from(&path).unwrap();
    assert_eq!(saved.access_token.as_deref(), Some("fresh"));
    assert_eq!(saved.refresh_token.as_deref(), Some("rt"));
    assert!(saved.expires_at.unwrap() > 0);
    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn missing_credentials_surface_as_tool_error() {
    let missing = std::env::temp_dir().join("smcp-it-no-such-config.json");
    let _ = std::fs::remove_file(&missing);
    let d = file_dispatcher("http://127.0.0.1:9".into(), missing);

    let out = read::get_my_playlists(&d, LimitArgs::default()).await.unwrap();
    assert_eq!(out.is_error, Some(true));
    assert!(text(&out).starts_with("Error getting playlists: "));
}

#[tokio::test]
async fn top_tracks_default_to_medium_term() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/me/top/tracks")
            .query_param("time_range", "medium_term");
        then.status(200).json_body(json!({"items": [], "total": 0}));
    });
    let d = Dispatcher::with_credentials(
        &Config::with_base_url(server.base_url()),
        SpotifyCredentials {
            client_id: "cid".into(),
            client_secret: "secret".into(),
            redirect_uri: "http://127.0.0.1:8888/callback".into(),
            access_token: Some("at".into()),
            refresh_token: None,
            expires_at: Some(i64::MAX / 2),
        },
    )
    .unwrap();

    let out = read::get_top_items(
        &d,
        TopItemsArgs { kind: TopType::Tracks, time_range: None, limit: None },
    )
    .await
    .unwrap();
    m.assert();
    assert_eq!(text(&out), "You don't have any top tracks on Spotify yet");
}

#[tokio::test]
async fn remove_then_add_round_trip_on_one_playlist() {
    let server = MockServer::start();
    let remove = server.mock(|when, then| {
        when.method(DELETE)
            .path("/v1/playlists/P9/tracks")
            .json_body(json!({"tracks": [{"uri": "spotify:track:t1"}]}));
        then.status(200).json_body(json!({"snapshot_id": "s1"}));
    });
    let add = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/playlists/P9/tracks")
            .json_body(json!({"uris": ["spotify:track:t1"]}));
        then.status(201).json_body(json!({"snapshot_id": "s2"}));
    });
    let d = Dispatcher::with_credentials(
        &Config::with_base_url(server.base_url()),
        SpotifyCredentials {
            client_id: "cid".into(),
            client_secret: "secret".into(),
            redirect_uri: "http://127.0.0.1:8888/callback".into(),
            access_token: Some("at".into()),
            refresh_token: None,
            expires_at: Some(i64::MAX / 2),
        },
    )
    .unwrap();
    let args = || PlaylistEditArgs { playlist_id: "P9".into(), track_ids: vec!["t1".into()] };

    let out = playlist::remove_tracks(&d, args()).await.unwrap();
    assert_eq!(text(&out), "Successfully removed 1 track from playlist (ID: P9)");
    let out = playlist::add_tracks(&d, args()).await.unwrap();
    assert_eq!(text(&out), "Successfully added 1 track to playlist (ID: P9)");
    remove.assert();
    add.assert();
}
