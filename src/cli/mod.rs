use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tokio::sync::oneshot;

use crate::clients::auth::{apply_token, authorize_url, exchange_code};
use crate::clients::dispatcher::Dispatcher;
use crate::infra::config::Config;
use crate::infra::credentials::{load_from, save_to};
use crate::infra::http_app::build_callback_app;
use crate::infra::runtime::limits::make_http_client;

#[derive(Parser)]
#[command(name = "spotify-mcp-server")]
#[command(about = "Spotify MCP server - exposes Spotify as MCP tools over stdio")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the MCP server over stdio (default)
    Serve,
    /// Authorize with Spotify and store the resulting tokens
    Auth,
    /// Check the stored credentials against the Spotify API
    Status,
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    run_commands(cli.command.unwrap_or(Commands::Serve)).await
}

pub async fn run_commands(command: Commands) -> ExitCode {
    let cfg = Config::from_env();
    match command {
        Commands::Serve => match crate::infra::boot::run_server(&cfg).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "server failed");
                ExitCode::FAILURE
            }
        },
        Commands::Auth => match authorize(&cfg).await {
            Ok(()) => {
                println!("✅ Spotify authorization saved to {}", cfg.credentials_path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Authorization failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Status => match show_status(&cfg).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ Status check failed: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

/// Host, port and path the local callback server must listen on.
fn callback_target(redirect_uri: &str) -> anyhow::Result<(String, u16, String)> {
    let url = reqwest::Url::parse(redirect_uri)
        .map_err(|e| anyhow::anyhow!("invalid redirectUri {redirect_uri}: {e}"))?;
    let host = url
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("redirectUri {redirect_uri} has no host"))?
        .to_string();
    let port = url.port_or_known_default().unwrap_or(80);
    let path = match url.path() {
        "" => "/".to_string(),
        p => p.to_string(),
    };
    Ok((host, port, path))
}

async fn authorize(cfg: &Config) -> anyhow::Result<()> {
    let mut creds = load_from(&cfg.credentials_path)?;
    let (host, port, path) = callback_target(&creds.redirect_uri)?;
    let state = nanoid::nanoid!(16);
    let url = authorize_url(&cfg.accounts_base_url, &creds, &state)?;

    let (tx, rx) = oneshot::channel();
    let app = build_callback_app(&path, state, tx);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    tracing::info!(%host, port, %path, "waiting for OAuth redirect");
    let mut server = tokio::spawn(async move { axum::serve(listener, app).await });

    println!("Open this URL in your browser to authorize Spotify access:\n\n{url}\n");

    let outcome = tokio::select! {
        outcome = rx => outcome,
        served = &mut server => {
            return Err(anyhow::anyhow!("callback server stopped early: {served:?}"));
        }
    };
    server.abort();
    let code = outcome?.map_err(anyhow::Error::msg)?;

    let http = make_http_client(cfg)?;
    let token = exchange_code(&http, &cfg.accounts_base_url, &creds, &code).await?;
    apply_token(&mut creds, token, chrono::Utc::now().timestamp_millis());
    save_to(&cfg.credentials_path, &creds)?;
    Ok(())
}

async fn show_status(cfg: &Config) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::from_config(cfg)?;
    let me = dispatcher
        .dispatch(|api| async move { api.current_user().await })
        .await?;

    println!(
        "✅ Authenticated as {} (ID: {})",
        me.display_name.as_deref().unwrap_or(&me.id),
        me.id
    );
    println!("\n📋 Configuration:");
    println!("  Credentials: {}", cfg.credentials_path.display());
    println!("  API: {}", cfg.api_base_url);
    println!(
        "  Log Level: {}",
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    );
    Ok(())
}
