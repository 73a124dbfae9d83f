use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com";
pub const DEFAULT_ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";
pub const DEFAULT_CREDENTIALS_PATH: &str = "spotify-config.json";

#[derive(Debug, Clone)]
pub struct Config {
    /// JSON file holding client credentials and tokens.
    pub credentials_path: PathBuf,
    pub api_base_url: String,
    pub accounts_base_url: String,
    pub http_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let credentials_path = std::env::var("SPOTIFY_CONFIG_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CREDENTIALS_PATH.into())
            .into();
        let api_base_url = non_empty_var("SPOTIFY_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.into());
        let accounts_base_url = non_empty_var("SPOTIFY_ACCOUNTS_BASE_URL")
            .unwrap_or_else(|| DEFAULT_ACCOUNTS_BASE_URL.into());
        let http_timeout_secs = std::env::var("SPOTIFY_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(10);
        let connect_timeout_secs = std::env::var("SPOTIFY_CONNECT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(3);

        Self {
            credentials_path,
            api_base_url,
            accounts_base_url,
            http_timeout_secs,
            connect_timeout_secs,
        }
    }

    /// Point both Spotify hosts at one base; used against a local fake.
    pub fn with_base_url(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            credentials_path: DEFAULT_CREDENTIALS_PATH.into(),
            api_base_url: base.clone(),
            accounts_base_url: base,
            http_timeout_secs: 10,
            connect_timeout_secs: 3,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}
