//! MCP (Model Context Protocol) server for Undertekst.
//!
//! Exposes transcript resolution as a tool for AI assistants.
//! Implements JSON-RPC 2.0 over stdio.

mod protocol;
mod server;
mod tools;

pub use server::McpServer;
