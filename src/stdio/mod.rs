//! Newline-delimited JSON-RPC over stdin/stdout
//!
//! Provides the line transport and the per-line handler that sits in front of
//! the MCP engine.

pub mod handlers;
pub mod transport;
