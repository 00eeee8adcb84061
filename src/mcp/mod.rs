//! Model Context Protocol (MCP) handling and JSON-RPC envelopes
//!
//! Provides envelope validation, method routing and response formatting.

pub mod rpc;
pub mod server;
