use thiserror::Error;

/// Every failure a dispatched Spotify call can produce. Tools never match on
/// the variant; they render the message through the dispatcher's boundary.
#[derive(Debug, Error)]
pub enum SpotifyError {
    #[error("{0}")]
    Config(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Spotify API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("unexpected response from Spotify: {0}")]
    Decode(String),
}

impl SpotifyError {
    pub fn config(msg: impl Into<String>) -> Self {
        SpotifyError::Config(msg.into())
    }
}

impl From<serde_json::Error> for SpotifyError {
    fn from(e: serde_json::Error) -> Self {
        SpotifyError::Decode(e.to_string())
    }
}
