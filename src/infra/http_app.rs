//! One-shot local HTTP app that receives the OAuth redirect during `auth`.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;
use tokio::sync::{oneshot, Mutex};

/// Outcome delivered to the waiting `auth` command: the authorization code,
/// or the reason the redirect was rejected.
pub type CallbackOutcome = Result<String, String>;

#[derive(Clone)]
struct CallbackState {
    expected_state: Arc<str>,
    tx: Arc<Mutex<Option<oneshot::Sender<CallbackOutcome>>>>,
}

#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Router serving `path`; the first valid redirect is forwarded on `tx`.
pub fn build_callback_app(
    path: &str,
    expected_state: impl Into<Arc<str>>,
    tx: oneshot::Sender<CallbackOutcome>,
) -> Router {
    let state = CallbackState {
        expected_state: expected_state.into(),
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    Router::new()
        .route(path, get(callback))
        .with_state(state)
}

async fn callback(
    State(st): State<CallbackState>,
    Query(params): Query<CallbackParams>,
) -> impl IntoResponse {
    if params.state.as_deref() != Some(&*st.expected_state) {
        tracing::warn!("OAuth callback with mismatched state ignored");
        return (StatusCode::BAD_REQUEST, "State mismatch".to_string());
    }

    let outcome = match (params.code, params.error) {
        (_, Some(err)) => Err(format!("Spotify denied authorization: {err}")),
        (Some(code), None) if !code.is_empty() => Ok(code),
        _ => Err("redirect carried no authorization code".to_string()),
    };
    let reply = match &outcome {
        Ok(_) => (
            StatusCode::OK,
            "Authorization complete. You can close this window.".to_string(),
        ),
        Err(msg) => (StatusCode::BAD_REQUEST, format!("Authorization failed: {msg}")),
    };

    match st.tx.lock().await.take() {
        Some(tx) => {
            let _ = tx.send(outcome);
            reply
        }
        None => (StatusCode::GONE, "Authorization already handled".to_string()),
    }
}
