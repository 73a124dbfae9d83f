//! Result envelope helpers: every tool answers with a single text block.

use rmcp::model::{CallToolResult, Content};

pub fn text_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text.into())])
}

/// A text block flagged with `isError`, rendered back to the agent instead of
/// a JSON-RPC error.
pub fn error_result(text: impl Into<String>) -> CallToolResult {
    CallToolResult::error(vec![Content::text(text.into())])
}

/// Extract the first text payload of a result.
pub fn first_text(result: &CallToolResult) -> Option<String> {
    let v = serde_json::to_value(result).ok()?;
    v["content"][0]["text"].as_str().map(str::to_owned)
}

pub fn is_error(result: &CallToolResult) -> bool {
    result.is_error.unwrap_or(false)
}
