//! Tools exposed via Model Context Protocol
//!
//! Provides the `add_numbers` descriptor and the `tools/call` handler that
//! validates call params before delegating to the calculator.

use rust_mcp_sdk::{
    macros,
    schema::{CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::domain::calculator::{add_numbers, Calculation};
use crate::errors::AppError;
use crate::mcp::rpc::{is_empty_value, value_text};

#[macros::mcp_tool(name = "add_numbers", description = "Add two numbers together")]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct AddNumbersTool {
    /// First number to add
    pub number1: f64,
    /// Second number to add
    pub number2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    AddNumbers,
}

impl ToolName {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "add_numbers" => Some(Self::AddNumbers),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AddNumbers => "add_numbers",
        }
    }
}

pub fn build_tools_list() -> Vec<Tool> {
    vec![AddNumbersTool::tool()]
}

pub fn handle_tools_call(params: Option<&Value>) -> Result<Value, AppError> {
    let empty = Map::new();
    let params = match params {
        None => &empty,
        Some(Value::Object(object)) => object,
        Some(_) => return Err(AppError::invalid_params("Invalid params: must be an object")),
    };

    let name = match params.get("name") {
        Some(name) if !is_empty_value(name) => value_text(name),
        _ => return Err(AppError::invalid_params("Invalid params: 'name' is required")),
    };

    let tool = ToolName::parse(&name)
        .ok_or_else(|| AppError::method_not_found(format!("Unknown tool: {name}")))?;
    info!(tool = tool.as_str(), "handling tools/call");

    let arguments = match params.get("arguments") {
        None | Some(Value::Null) => &empty,
        Some(Value::Object(object)) => object,
        Some(_) => {
            return Err(AppError::invalid_params(
                "Invalid params: 'arguments' must be an object",
            ))
        }
    };

    let calculation = match tool {
        ToolName::AddNumbers => {
            let number1 = required_argument(arguments, "number1");
            let number2 = required_argument(arguments, "number2");
            let (Some(number1), Some(number2)) = (number1, number2) else {
                return Err(AppError::invalid_params(
                    "Both number1 and number2 are required",
                ));
            };
            add_numbers(number1, number2)
        }
    };

    call_tool_result(&calculation)
}

fn required_argument<'a>(arguments: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    arguments.get(key).filter(|value| !value.is_null())
}

fn call_tool_result(calculation: &Calculation) -> Result<Value, AppError> {
    let structured_content = match serde_json::to_value(calculation) {
        Ok(Value::Object(map)) => map,
        Ok(_) => return Err(AppError::internal("calculation did not serialize to an object")),
        Err(err) => return Err(AppError::internal(err.to_string())),
    };

    serde_json::to_value(CallToolResult {
        content: vec![ContentBlock::from(TextContent::new(
            calculation.to_text(),
            None,
            None,
        ))],
        is_error: Some(calculation.is_error()),
        meta: None,
        structured_content: Some(structured_content),
    })
    .map_err(|err| AppError::internal(err.to_string()))
}
