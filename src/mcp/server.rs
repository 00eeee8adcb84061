//! The central Model Context Protocol engine
//!
//! Validates the JSON-RPC envelope, routes `initialize`, `tools/list` and
//! `tools/call` to their handlers, and converts every outcome into a
//! `JsonRpcResponse`. Nothing escapes as a panic or an `Err`.

use std::panic::{self, AssertUnwindSafe};

use rust_mcp_sdk::schema::{
    Implementation, InitializeResult, ListToolsResult, ServerCapabilities,
    ServerCapabilitiesPrompts, ServerCapabilitiesResources, ServerCapabilitiesTools,
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::domain::tools::handle_tools_call;
use crate::errors::AppError;
use crate::mcp::rpc::{
    app_error_to_json_rpc, is_empty_value, json_rpc_result, response_id, value_text,
    JsonRpcResponse, JSONRPC_VERSION,
};
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Initialize,
    ToolsList,
    ToolsCall,
}

impl Method {
    pub fn parse(method: &str) -> Option<Self> {
        match method {
            "initialize" => Some(Self::Initialize),
            "tools/list" => Some(Self::ToolsList),
            "tools/call" => Some(Self::ToolsCall),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::ToolsList => "tools/list",
            Self::ToolsCall => "tools/call",
        }
    }
}

pub fn handle_json_rpc_value(state: &AppState, payload: Value) -> JsonRpcResponse {
    let Value::Object(request) = payload else {
        return app_error_to_json_rpc(Value::Null, AppError::not_an_object());
    };

    let id = response_id(request.get("id"));

    if request.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
        return app_error_to_json_rpc(
            id,
            AppError::invalid_request("Invalid Request: jsonrpc must be '2.0'"),
        );
    }

    let method = match request.get("method") {
        Some(method) if !is_empty_value(method) => value_text(method),
        _ => {
            return app_error_to_json_rpc(
                id,
                AppError::invalid_request("Invalid Request: 'method' is required"),
            )
        }
    };

    info!(method = %method, id = %id, "processing mcp request");

    let params = request.get("params");
    let outcome = guard_handler(|| handle_json_rpc_request(state, &method, params));

    info!(
        method = %method,
        outcome = if outcome.is_ok() { "success" } else { "failure" },
        "mcp action audited"
    );

    match outcome {
        Ok(result) => json_rpc_result(id, result),
        Err(err) => app_error_to_json_rpc(id, err),
    }
}

pub fn handle_json_rpc_request(
    state: &AppState,
    method: &str,
    params: Option<&Value>,
) -> Result<Value, AppError> {
    let Some(method) = Method::parse(method) else {
        warn!(method = %method, "unknown method");
        return Err(AppError::method_not_found(format!(
            "Method not found: {method}"
        )));
    };
    info!(method = method.as_str(), "routing request");

    match method {
        Method::Initialize => handle_initialize(state, params),
        Method::ToolsList => handle_tools_list(state),
        Method::ToolsCall => handle_tools_call(params),
    }
}

/// Runs a handler, turning a panic into an internal error so a single bad
/// request cannot take the server down.
pub fn guard_handler<F>(handler: F) -> Result<Value, AppError>
where
    F: FnOnce() -> Result<Value, AppError>,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(handler)).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|message| message.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "handler panicked".to_string());
        Err(AppError::internal(message))
    });

    if let Err(AppError::Internal { message }) = &outcome {
        error!(error = %message, "request failed with internal error");
    }

    outcome
}

pub fn handle_initialize(state: &AppState, params: Option<&Value>) -> Result<Value, AppError> {
    let protocol_version = params
        .and_then(Value::as_object)
        .and_then(|object| object.get("protocolVersion"))
        .and_then(Value::as_str)
        .filter(|version| !version.is_empty())
        .ok_or_else(|| AppError::invalid_params("Invalid params: protocolVersion is required"))?;

    let initialize_result = InitializeResult {
        server_info: Implementation {
            name: state.server_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            title: None,
            description: Some(state.server_description.to_string()),
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools { list_changed: None }),
            resources: Some(ServerCapabilitiesResources {
                subscribe: None,
                list_changed: None,
            }),
            prompts: Some(ServerCapabilitiesPrompts { list_changed: None }),
            ..Default::default()
        },
        protocol_version: protocol_version.to_string(),
        instructions: None,
        meta: None,
    };

    serde_json::to_value(initialize_result).map_err(|err| AppError::internal(err.to_string()))
}

pub fn handle_tools_list(state: &AppState) -> Result<Value, AppError> {
    serde_json::to_value(ListToolsResult {
        meta: None,
        next_cursor: None,
        tools: state.tools.to_vec(),
    })
    .map_err(|err| AppError::internal(err.to_string()))
}
