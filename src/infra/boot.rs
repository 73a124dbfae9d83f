use std::sync::Arc;

use crate::clients::dispatcher::Dispatcher;
use crate::infra::config::Config;
use crate::tools::spotify::tool_router::SpotifySvc;

pub async fn run_server(cfg: &Config) -> anyhow::Result<()> {
    tracing::info!(
        credentials = %cfg.credentials_path.display(),
        api_base = %cfg.api_base_url,
        "BOOT spotify-mcp-server"
    );

    let dispatcher = Arc::new(Dispatcher::from_config(cfg)?);
    let factory = move || {
        let handler = SpotifySvc::new(dispatcher);
        (handler, SpotifySvc::router())
    };
    crate::infra::runtime::mcp_transport::serve_stdio(factory)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn boot_config_defaults_to_local_credentials_file() {
        std::env::remove_var("SPOTIFY_CONFIG_PATH");
        let cfg = Config::from_env();
        assert_eq!(cfg.credentials_path, std::path::PathBuf::from("spotify-config.json"));
        assert!(Dispatcher::from_config(&cfg).is_ok());
    }
}
