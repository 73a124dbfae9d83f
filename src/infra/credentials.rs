//! On-disk Spotify credentials (`spotify-config.json`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::SpotifyError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Epoch milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl SpotifyCredentials {
    /// True when the access token is unusable `skew_ms` from `now_ms`.
    /// An unknown expiry counts as expired.
    pub fn is_expired(&self, now_ms: i64, skew_ms: i64) -> bool {
        match (&self.access_token, self.expires_at) {
            (None, _) => true,
            (Some(_), Some(at)) => now_ms + skew_ms >= at,
            (Some(_), None) => true,
        }
    }
}

/// Where credentials live. `Memory` never touches disk.
#[derive(Debug, Clone)]
pub enum CredentialStore {
    File(PathBuf),
    Memory,
}

impl CredentialStore {
    pub fn load(&self) -> Result<Option<SpotifyCredentials>, SpotifyError> {
        match self {
            CredentialStore::File(path) => load_from(path).map(Some),
            CredentialStore::Memory => Ok(None),
        }
    }

    pub fn save(&self, creds: &SpotifyCredentials) -> Result<(), SpotifyError> {
        match self {
            CredentialStore::File(path) => save_to(path, creds),
            CredentialStore::Memory => Ok(()),
        }
    }
}

pub fn load_from(path: &Path) -> Result<SpotifyCredentials, SpotifyError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        SpotifyError::config(format!(
            "Spotify configuration not readable at {}: {e}. Create it with clientId, clientSecret and redirectUri",
            path.display()
        ))
    })?;
    let creds: SpotifyCredentials = serde_json::from_str(&raw).map_err(|e| {
        SpotifyError::config(format!("invalid Spotify configuration in {}: {e}", path.display()))
    })?;
    if creds.client_id.trim().is_empty() || creds.client_secret.trim().is_empty() {
        return Err(SpotifyError::config(format!(
            "clientId and clientSecret must be set in {}",
            path.display()
        )));
    }
    Ok(creds)
}

pub fn save_to(path: &Path, creds: &SpotifyCredentials) -> Result<(), SpotifyError> {
    let body = serde_json::to_string_pretty(creds)?;
    std::fs::write(path, body).map_err(|e| {
        SpotifyError::config(format!("failed to write {}: {e}", path.display()))
    })?;
    tracing::debug!(path = %path.display(), "saved Spotify credentials");
    Ok(())
}
