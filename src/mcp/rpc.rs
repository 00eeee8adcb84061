//! JSON-RPC response envelope and formatting utilities
//!
//! A response carries exactly one `Outcome`, so "result XOR error" holds by
//! construction. Also maps `AppError` onto JSON-RPC error objects.

use rust_mcp_sdk::schema::RpcError;
use serde::Serialize;
use serde_json::Value;

use crate::errors::{AppError, INTERNAL_ERROR, PARSE_ERROR};

pub const JSONRPC_VERSION: &str = "2.0";
pub const UNKNOWN_REQUEST_ID: &str = "unknown";

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    pub id: Value,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(RpcError),
}

impl JsonRpcResponse {
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }

    pub fn error_code(&self) -> Option<i64> {
        match &self.outcome {
            Outcome::Error(error) => Some(error.code),
            Outcome::Result(_) => None,
        }
    }

    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Id echoed on a response: the request's own id, or `"unknown"` when the
/// request carried none (absent or `null`).
pub fn response_id(id: Option<&Value>) -> Value {
    match id {
        Some(Value::Null) | None => Value::String(UNKNOWN_REQUEST_ID.to_string()),
        Some(value) => value.clone(),
    }
}

/// `null`, `false`, zero, `""`, `[]` and `{}` all count as "not provided"
/// for required request fields.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Text used when a field value is echoed into an error message.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

pub fn app_error_to_json_rpc(id: Value, err: AppError) -> JsonRpcResponse {
    let code = err.code();
    let id = match &err {
        AppError::NotAnObject { .. } => Value::Null,
        _ => id,
    };
    json_rpc_error(id, code, &err.to_string())
}

pub fn json_rpc_error(id: Value, code: i64, message: &str) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: JSONRPC_VERSION,
        id,
        outcome: Outcome::Error(RpcError {
            code,
            data: None,
            message: message.to_string(),
        }),
    }
}

pub fn json_rpc_result(id: Value, result: Value) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: JSONRPC_VERSION,
        id,
        outcome: Outcome::Result(result),
    }
}

/// Fixed reply for a line that is not valid JSON; no id can be recovered.
pub fn parse_error() -> JsonRpcResponse {
    json_rpc_error(Value::Null, PARSE_ERROR, "Parse error")
}

/// Reply used when handling a line failed outside the dispatcher's own
/// error mapping.
pub fn internal_error(message: &str) -> JsonRpcResponse {
    json_rpc_error(
        Value::Null,
        INTERNAL_ERROR,
        &format!("Internal error: {message}"),
    )
}
