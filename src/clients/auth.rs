//! Spotify Accounts service: authorize URL, code exchange and token refresh.

use reqwest::Client;
use serde::Deserialize;

use crate::clients::spotify::api_error;
use crate::core::SpotifyError;
use crate::infra::credentials::SpotifyCredentials;
use crate::infra::http::headers::add_standard_headers;

/// Scopes covering every tool this server exposes.
pub const SCOPES: &[&str] = &[
    "user-read-private",
    "user-read-email",
    "user-read-playback-state",
    "user-modify-playback-state",
    "user-read-currently-playing",
    "user-read-recently-played",
    "user-top-read",
    "user-follow-read",
    "user-library-read",
    "playlist-read-private",
    "playlist-modify-private",
    "playlist-modify-public",
];

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub expires_in: i64,
    /// Only present when Spotify rotates the refresh token.
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

pub fn authorize_url(
    accounts_base: &str,
    creds: &SpotifyCredentials,
    state: &str,
) -> Result<String, SpotifyError> {
    let base = format!("{}/authorize", accounts_base.trim_end_matches('/'));
    let scope = SCOPES.join(" ");
    let url = reqwest::Url::parse_with_params(
        &base,
        &[
            ("client_id", creds.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", creds.redirect_uri.as_str()),
            ("scope", scope.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| SpotifyError::config(format!("invalid accounts URL {base}: {e}")))?;
    Ok(url.into())
}

async fn request_token(
    http: &Client,
    accounts_base: &str,
    creds: &SpotifyCredentials,
    form: &[(&str, &str)],
) -> Result<TokenResponse, SpotifyError> {
    let url = format!("{}/api/token", accounts_base.trim_end_matches('/'));
    tracing::debug!(endpoint = %url, grant_type = form[0].1, "token request");
    let (builder, _rid) = add_standard_headers(http.post(url), None);
    let resp = builder
        .basic_auth(&creds.client_id, Some(&creds.client_secret))
        .form(form)
        .send()
        .await
        .map_err(|e| SpotifyError::Auth(e.to_string()))?;
    if !resp.status().is_success() {
        let err = api_error(resp).await;
        return Err(SpotifyError::Auth(err.to_string()));
    }
    resp.json::<TokenResponse>()
        .await
        .map_err(|e| SpotifyError::Auth(format!("malformed token response: {e}")))
}

pub async fn refresh_access_token(
    http: &Client,
    accounts_base: &str,
    creds: &SpotifyCredentials,
) -> Result<TokenResponse, SpotifyError> {
    let refresh_token = creds
        .refresh_token
        .as_deref()
        .ok_or_else(|| SpotifyError::Auth("no refresh token available".into()))?;
    request_token(
        http,
        accounts_base,
        creds,
        &[("grant_type", "refresh_token"), ("refresh_token", refresh_token)],
    )
    .await
}

pub async fn exchange_code(
    http: &Client,
    accounts_base: &str,
    creds: &SpotifyCredentials,
    code: &str,
) -> Result<TokenResponse, SpotifyError> {
    request_token(
        http,
        accounts_base,
        creds,
        &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", creds.redirect_uri.as_str()),
        ],
    )
    .await
}

/// Store a fresh token, keeping the old refresh token unless a new one was issued.
pub fn apply_token(creds: &mut SpotifyCredentials, token: TokenResponse, now_ms: i64) {
    creds.access_token = Some(token.access_token);
    creds.expires_at = Some(now_ms + token.expires_in * 1000);
    if let Some(rt) = token.refresh_token {
        creds.refresh_token = Some(rt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn creds() -> SpotifyCredentials {
        SpotifyCredentials {
            client_id: "cid".into(),
            client_secret: "secret".into(),
            redirect_uri: "http://127.0.0.1:8888/callback".into(),
            access_token: Some("old".into()),
            refresh_token: Some("rt-1".into()),
            expires_at: Some(0),
        }
    }

    #[test]
    fn authorize_url_carries_client_and_scopes() {
        let url = authorize_url("https://accounts.spotify.com", &creds(), "st4te").unwrap();
        let parsed = reqwest::Url::parse(&url).unwrap();
        assert_eq!(parsed.path(), "/authorize");
        let pairs: std::collections::HashMap<_, _> = parsed.query_pairs().into_owned().collect();
        assert_eq!(pairs["client_id"], "cid");
        assert_eq!(pairs["response_type"], "code");
        assert_eq!(pairs["redirect_uri"], "http://127.0.0.1:8888/callback");
        assert_eq!(pairs["state"], "st4te");
        assert!(pairs["scope"].contains("user-modify-playback-state"));
    }

    #[tokio::test]
    async fn refresh_posts_form_with_basic_auth() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST)
                .path("/api/token")
                // base64("cid:secret")
                .header("authorization", "Basic Y2lkOnNlY3JldA==")
                .x_www_form_urlencoded_tuple("grant_type", "refresh_token")
                .x_www_form_urlencoded_tuple("refresh_token", "rt-1");
            then.status(200).json_body(json!({
                "access_token": "new", "token_type": "Bearer", "expires_in": 3600
            }));
        });
        let token = refresh_access_token(&Client::new(), &server.base_url(), &creds())
            .await
            .unwrap();
        m.assert();
        assert_eq!(token.access_token, "new");
        assert!(token.refresh_token.is_none());
    }

    #[tokio::test]
    async fn refresh_without_refresh_token_fails_fast() {
        let mut c = creds();
        c.refresh_token = None;
        let err = refresh_access_token(&Client::new(), "http://localhost:0", &c)
            .await
            .unwrap_err();
        assert!(matches!(err, SpotifyError::Auth(_)));
    }

    #[tokio::test]
    async fn rejected_refresh_is_auth_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/api/token");
            then.status(400).json_body(json!({"error": "invalid_grant"}));
        });
        let err = refresh_access_token(&Client::new(), &server.base_url(), &creds())
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("authentication failed"));
    }

    #[tokio::test]
    async fn exchange_code_sends_redirect_uri() {
        let server = MockServer::start();
        let m = server.mock(|when, then| {
            when.method(POST)
                .path("/api/token")
                .x_www_form_urlencoded_tuple("grant_type", "authorization_code")
                .x_www_form_urlencoded_tuple("code", "abc")
                .x_www_form_urlencoded_tuple("redirect_uri", "http://127.0.0.1:8888/callback");
            then.status(200).json_body(json!({
                "access_token": "at", "expires_in": 3600, "refresh_token": "rt-2"
            }));
        });
        let token = exchange_code(&Client::new(), &server.base_url(), &creds(), "abc")
            .await
            .unwrap();
        m.assert();
        assert_eq!(token.refresh_token.as_deref(), Some("rt-2"));
    }

    #[test]
    fn apply_token_keeps_refresh_token_unless_rotated() {
        let mut c = creds();
        let token = TokenResponse {
            access_token: "at".into(),
            token_type: None,
            expires_in: 60,
            refresh_token: None,
            scope: None,
        };
        apply_token(&mut c, token, 1_000);
        assert_eq!(c.access_token.as_deref(), Some("at"));
        assert_eq!(c.expires_at, Some(61_000));
        assert_eq!(c.refresh_token.as_deref(), Some("rt-1"));
    }
}
