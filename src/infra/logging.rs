pub fn init() {
    // Honour RUST_LOG, default to info. Logs go to stderr: stdout is the MCP stream.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Record one remote call against the metrics facade (no-op without a recorder).
pub fn record_call(operation: &'static str, ok: bool, latency_ms: f64) {
    let outcome = if ok { "ok" } else { "error" };
    metrics::counter!("spotify_api_calls_total", "operation" => operation, "outcome" => outcome)
        .increment(1);
    metrics::histogram!("spotify_api_latency_ms", "operation" => operation).record(latency_ms);
    tracing::debug!(operation, outcome, latency_ms, "spotify call finished");
}
