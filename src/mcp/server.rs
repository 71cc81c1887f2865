//! MCP server implementation.

use super::protocol::*;
use super::tools::{get_tools, ANALYZE_SUBTITLE};
use crate::config::Settings;
use crate::resolver::TranscriptResolver;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "undertekst";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// MCP Server for Undertekst.
pub struct McpServer {
    resolver: Arc<TranscriptResolver>,
}

impl McpServer {
    /// Create a server backed by the configured catalog.
    pub fn new(settings: &Settings) -> crate::Result<Self> {
        Ok(Self::with_resolver(Arc::new(TranscriptResolver::new(settings)?)))
    }

    pub fn with_resolver(resolver: Arc<TranscriptResolver>) -> Self {
        Self { resolver }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run(&self) -> anyhow::Result<()> {
        info!("Undertekst MCP server starting");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    /// Answer one JSON-RPC message per input line until the input ends.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(line) {
                Ok(request) => self.handle_request(request).await,
                Err(e) => {
                    warn!("Failed to parse request: {}", e);
                    Some(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error"))
                }
            };

            if let Some(response) = response {
                let mut out = serde_json::to_string(&response)?;
                out.push('\n');
                writer.write_all(out.as_bytes()).await?;
                writer.flush().await?;
            }
        }

        info!("Input closed, MCP server stopping");
        Ok(())
    }

    /// Handle a single JSON-RPC message. Notifications get no response.
    async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!("Received {}", request.method);

        match request.method.as_str() {
            "initialize" => Some(self.handle_initialize(request.id, request.params)),
            "initialized" | "notifications/initialized" => None,
            "ping" => Some(JsonRpcResponse::success(request.id, json!({}))),
            "tools/list" => Some(self.handle_tools_list(request.id)),
            "tools/call" => Some(self.handle_tools_call(request.id, request.params).await),
            _ if request.id.is_none() => None,
            _ => Some(JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            )),
        }
    }

    /// Handle initialize request.
    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        if let Some(params) = params.and_then(|p| serde_json::from_value::<InitializeParams>(p).ok()) {
            let client = params
                .client_info
                .map(|c| format!("{} {}", c.name, c.version))
                .unwrap_or_else(|| "unknown client".to_string());
            info!("Initializing for {} (protocol {})", client, params.protocol_version);
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        respond(id, &result)
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ToolsListResult {
            tools: get_tools(self.resolver.default_language()),
        };
        respond(id, &result)
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, INVALID_PARAMS, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        if params.name != ANALYZE_SUBTITLE {
            return respond(id, &ToolCallResult::error(format!("Unknown tool: {}", params.name)));
        }

        let args: AnalyzeSubtitleArgs = match params
            .arguments
            .map(serde_json::from_value::<AnalyzeSubtitleArgs>)
        {
            Some(Ok(args)) => args,
            Some(Err(e)) => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, &format!("Invalid arguments: {}", e))
            }
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing 'youtube_url' argument"),
        };

        let result = self
            .resolver
            .resolve(&args.youtube_url, args.language.as_deref())
            .await;

        match serde_json::to_string_pretty(&result) {
            Ok(text) => respond(id, &ToolCallResult::text_flagged(text, result.is_error())),
            Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, &e.to_string()),
        }
    }
}

fn respond<T: Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, &e.to_string()),
    }
}
