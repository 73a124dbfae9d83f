//! The single choke-point every tool goes through to reach Spotify.
//!
//! `dispatch` makes sure a usable access token exists (refreshing and
//! persisting it when needed), hands a ready [`SpotifyClient`] to the
//! operation and runs it exactly once. `run` adds the uniform error boundary
//! that turns any failure into an `Error <doing>: <message>` content block.

use std::future::Future;
use std::time::Instant;

use reqwest::Client;
use rmcp::model::CallToolResult;
use tokio::sync::Mutex;

use crate::clients::auth::{apply_token, refresh_access_token};
use crate::clients::spotify::SpotifyClient;
use crate::core::content::{error_result, text_result};
use crate::core::SpotifyError;
use crate::infra::config::Config;
use crate::infra::credentials::{CredentialStore, SpotifyCredentials};
use crate::infra::runtime::limits::make_http_client;

/// Refresh this long before Spotify would reject the token.
const EXPIRY_SKEW_MS: i64 = 60_000;

pub struct Dispatcher {
    http: Client,
    api_base: String,
    accounts_base: String,
    store: CredentialStore,
    creds: Mutex<Option<SpotifyCredentials>>,
}

impl Dispatcher {
    /// Credentials are read lazily from the configured file on first use.
    pub fn from_config(cfg: &Config) -> Result<Self, SpotifyError> {
        let http = make_http_client(cfg)?;
        Ok(Self {
            http,
            api_base: cfg.api_base_url.clone(),
            accounts_base: cfg.accounts_base_url.clone(),
            store: CredentialStore::File(cfg.credentials_path.clone()),
            creds: Mutex::new(None),
        })
    }

    /// Dispatcher over credentials held only in memory.
    pub fn with_credentials(cfg: &Config, creds: SpotifyCredentials) -> Result<Self, SpotifyError> {
        let http = make_http_client(cfg)?;
        Ok(Self {
            http,
            api_base: cfg.api_base_url.clone(),
            accounts_base: cfg.accounts_base_url.clone(),
            store: CredentialStore::Memory,
            creds: Mutex::new(Some(creds)),
        })
    }

    /// Return a usable access token, refreshing it first if it is stale.
    async fn ensure_token(&self) -> Result<String, SpotifyError> {
        let mut guard = self.creds.lock().await;
        if guard.is_none() {
            *guard = self.store.load()?;
        }
        let creds = guard.as_mut().ok_or_else(|| {
            SpotifyError::config("Spotify credentials are not configured")
        })?;

        let now = chrono::Utc::now().timestamp_millis();
        if creds.is_expired(now, EXPIRY_SKEW_MS) {
            if creds.refresh_token.is_some() {
                tracing::info!("refreshing Spotify access token");
                let token = refresh_access_token(&self.http, &self.accounts_base, creds).await?;
                apply_token(creds, token, now);
                if let Err(e) = self.store.save(creds) {
                    tracing::warn!(error = %e, "could not persist refreshed token");
                }
            } else if creds.access_token.is_none() {
                return Err(SpotifyError::Auth(
                    "no access token; run `spotify-mcp-server auth` first".into(),
                ));
            }
        }

        creds
            .access_token
            .clone()
            .ok_or_else(|| SpotifyError::Auth("no access token after refresh".into()))
    }

    /// Run one operation against an authenticated client.
    pub async fn dispatch<T, F, Fut>(&self, op: F) -> Result<T, SpotifyError>
    where
        F: FnOnce(SpotifyClient) -> Fut,
        Fut: Future<Output = Result<T, SpotifyError>>,
    {
        let token = self.ensure_token().await?;
        let client = SpotifyClient::new(self.http.clone(), self.api_base.clone(), token);
        op(client).await
    }

    /// `dispatch` plus the error boundary: `Ok` text becomes a text block,
    /// any failure becomes `Error <doing>: <message>` flagged as an error.
    pub async fn run<F, Fut>(&self, doing: &'static str, op: F) -> CallToolResult
    where
        F: FnOnce(SpotifyClient) -> Fut,
        Fut: Future<Output = Result<String, SpotifyError>>,
    {
        let start = Instant::now();
        let res = self.dispatch(op).await;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        crate::infra::logging::record_call(doing, res.is_ok(), elapsed_ms);
        match res {
            Ok(text) => text_result(text),
            Err(e) => {
                tracing::warn!(doing, error = %e, "spotify call failed");
                error_result(format!("Error {doing}: {e}"))
            }
        }
    }
}
