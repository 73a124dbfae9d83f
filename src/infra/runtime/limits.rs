use std::time::Duration;

use crate::infra::config::Config;

/// Build the shared reqwest client with the configured transport timeouts.
pub fn make_http_client(cfg: &Config) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .timeout(Duration::from_secs(cfg.http_timeout_secs))
        .build()
}
