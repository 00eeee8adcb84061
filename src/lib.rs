use std::{future::Future, sync::Arc};

use rust_mcp_sdk::schema::Tool;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::info;

pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod mcp;
pub mod stdio;

use domain::tools::build_tools_list;
use errors::TransportError;
use stdio::{handlers::handle_line, transport::LineTransport};

pub const SERVER_NAME: &str = "Simple MCP Calculator";
pub const SERVER_DESCRIPTION: &str = "Simple calculator that adds two numbers";

/// Read-only descriptors shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub server_name: &'static str,
    pub server_description: &'static str,
    pub tools: Arc<[Tool]>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            server_name: SERVER_NAME,
            server_description: SERVER_DESCRIPTION,
            tools: Arc::from(build_tools_list()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Answers one line at a time until the reader reaches end of input.
pub async fn serve<R, W>(reader: R, writer: W, state: &AppState) -> Result<(), TransportError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut transport = LineTransport::new(reader, writer);
    info!("ready to receive requests");

    while let Some(line) = transport.read_line().await? {
        if line.is_empty() {
            continue;
        }

        let frame = handle_line(state, &line);
        transport.write_line(&frame).await?;
    }

    info!("end of input received, shutting down");
    Ok(())
}

/// Why `serve_until` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    EndOfInput,
    Interrupted,
}

/// Runs `serve` until end of input or until `shutdown` resolves, whichever
/// comes first. A read still pending when `shutdown` fires is abandoned.
pub async fn serve_until<R, W, S>(
    reader: R,
    writer: W,
    state: &AppState,
    shutdown: S,
) -> Result<Shutdown, TransportError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    tokio::select! {
        result = serve(reader, writer, state) => result.map(|()| Shutdown::EndOfInput),
        () = shutdown => {
            info!("stopped by user");
            Ok(Shutdown::Interrupted)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    async fn exchange(input: &str) -> Vec<Value> {
        let mut output = Vec::new();
        serve(input.as_bytes(), &mut output, &AppState::new())
            .await
            .expect("serve should finish at eof");

        String::from_utf8(output)
            .expect("utf8 output")
            .lines()
            .map(|line| serde_json::from_str(line).expect("each line is json"))
            .collect()
    }

    #[tokio::test]
    async fn full_session_answers_every_line_in_order() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test-client","version":"1.0.0"}}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list","params":{}}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"add_numbers","arguments":{"number1":2,"number2":3}}}"#,
            "\n",
        );

        let responses = exchange(input).await;
        assert_eq!(responses.len(), 3);

        assert_eq!(responses[0]["id"], 1);
        assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
        assert_eq!(
            responses[0]["result"]["serverInfo"]["version"],
            env!("CARGO_PKG_VERSION")
        );

        assert_eq!(responses[1]["id"], 2);
        assert_eq!(responses[1]["result"]["tools"][0]["name"], "add_numbers");
        assert_eq!(
            responses[1]["result"]["tools"].as_array().map(Vec::len),
            Some(1)
        );

        assert_eq!(responses[2]["id"], 3);
        assert_eq!(responses[2]["result"]["isError"], false);
        let text = responses[2]["result"]["content"][0]["text"]
            .as_str()
            .expect("text content");
        assert!(text.contains("2.0 + 3.0 = 5"));
    }

    #[tokio::test]
    async fn blank_lines_get_no_reply() {
        let input = "\n   \n{\"jsonrpc\":\"2.0\",\"id\":\"x\",\"method\":\"tools/list\"}\n\n";
        let responses = exchange(input).await;

        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], "x");
    }

    #[tokio::test]
    async fn malformed_line_does_not_stop_the_loop() {
        let input = "{bad\n{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"foo/bar\"}\n";
        let responses = exchange(input).await;

        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0]["id"], Value::Null);
        assert_eq!(responses[0]["error"]["code"], -32700);
        assert_eq!(responses[1]["id"], 7);
        assert_eq!(responses[1]["error"]["code"], -32601);
        assert!(responses[1]["error"]["message"]
            .as_str()
            .expect("message")
            .contains("foo/bar"));
    }

    #[tokio::test]
    async fn envelope_errors_echo_the_id() {
        let input = concat!(
            r#"{"jsonrpc":"1.0","id":11,"method":"tools/list"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":12}"#,
            "\n",
        );
        let responses = exchange(input).await;

        assert_eq!(responses[0]["id"], 11);
        assert_eq!(responses[0]["error"]["code"], -32600);
        assert_eq!(responses[1]["id"], 12);
        assert_eq!(responses[1]["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn tool_failure_is_a_successful_rpc() {
        let input = r#"{"jsonrpc":"2.0","id":20,"method":"tools/call","params":{"name":"add_numbers","arguments":{"number1":"abc","number2":1}}}"#;
        let responses = exchange(input).await;

        assert!(responses[0].get("error").is_none());
        assert_eq!(responses[0]["result"]["isError"], true);
        assert!(responses[0]["result"]["content"][0]["text"]
            .as_str()
            .expect("text content")
            .contains("Invalid numbers provided"));
    }

    #[tokio::test]
    async fn repeated_additions_agree_and_normalize() {
        let call = |id: u32, a: Value, b: Value| {
            json!({
                "jsonrpc": "2.0",
                "id": id,
                "method": "tools/call",
                "params": {"name": "add_numbers", "arguments": {"number1": a, "number2": b}}
            })
            .to_string()
        };
        let input = [
            call(1, json!(2), json!(3)),
            call(2, json!(2), json!(3)),
            call(3, json!(2.5), json!(2.5)),
        ]
        .join("\n");

        let responses = exchange(&input).await;

        let first = &responses[0]["result"]["structuredContent"]["result"];
        let second = &responses[1]["result"]["structuredContent"]["result"];
        assert_eq!(first, &json!(5));
        assert_eq!(first, second);

        let normalized = &responses[2]["result"]["structuredContent"]["result"];
        assert_eq!(normalized, &json!(5));
        assert!(normalized.is_i64());
    }

    #[tokio::test]
    async fn shutdown_signal_ends_a_blocked_session() {
        let (_client, server) = tokio::io::duplex(64);
        let (reader, writer) = tokio::io::split(server);

        let outcome = serve_until(reader, writer, &AppState::new(), async {})
            .await
            .expect("interrupted session");

        assert_eq!(outcome, Shutdown::Interrupted);
    }

    #[tokio::test]
    async fn end_of_input_wins_without_a_signal() {
        let input = r#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
        let mut output = Vec::new();

        let outcome = serve_until(
            input.as_bytes(),
            &mut output,
            &AppState::new(),
            std::future::pending(),
        )
        .await
        .expect("session ends at eof");

        assert_eq!(outcome, Shutdown::EndOfInput);
        assert!(!output.is_empty());
    }

    #[tokio::test]
    async fn missing_numbers_are_invalid_params() {
        let input = r#"{"jsonrpc":"2.0","id":30,"method":"tools/call","params":{"name":"add_numbers","arguments":{"number1":4}}}"#;
        let responses = exchange(input).await;

        assert_eq!(responses[0]["id"], 30);
        assert_eq!(responses[0]["error"]["code"], -32602);
        assert_eq!(
            responses[0]["error"]["message"],
            "Both number1 and number2 are required"
        );
    }
}
