//! Per-line handling for the stdio transport
//!
//! Splits the transport-tier parse boundary (bytes that are not JSON) from the
//! protocol tier handled by the MCP engine.

use serde_json::Value;
use tracing::{debug, error};

use crate::logging::with_request_logging;
use crate::mcp::rpc::{internal_error, parse_error, JsonRpcResponse};
use crate::mcp::server::handle_json_rpc_value;
use crate::AppState;

/// Produces the reply frame for one non-empty input line.
pub fn handle_line(state: &AppState, line: &str) -> String {
    let response = with_request_logging(line, |line| dispatch_line(state, line));

    match response.to_line() {
        Ok(frame) => {
            debug!(response = %frame, "sent response");
            frame
        }
        Err(err) => {
            error!(error = %err, "failed to serialize response");
            fallback_frame(&err.to_string())
        }
    }
}

fn dispatch_line(state: &AppState, line: &str) -> JsonRpcResponse {
    match serde_json::from_str::<Value>(line) {
        Ok(payload) => handle_json_rpc_value(state, payload),
        Err(err) => {
            error!(error = %err, input = %line, "json decode error");
            parse_error()
        }
    }
}

fn fallback_frame(message: &str) -> String {
    internal_error(message).to_line().unwrap_or_else(|_| {
        r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#
            .to_string()
    })
}
