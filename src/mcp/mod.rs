//! MCP server over stdio
//!
//! Stdout carries protocol messages only; logs go to stderr.

mod tools;

use std::sync::Arc;

use anyhow::Result;
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Implementation, ServerCapabilities, ServerInfo};
use rmcp::transport::stdio;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};

use crate::sentry::client::SentryClient;
use crate::sentry::config::SentryConfig;
use tools::{
    tool_result, EventArgs, EventsArgs, ExtractArgs, IssueArgs, ListIssuesArgs, ListProjectsArgs,
};


/// Sentry tools exposed to MCP clients
#[derive(Clone)]
pub struct SentryServer {
    client: Arc<SentryClient>,
    config: SentryConfig,
    tool_router: ToolRouter<Self>,
}

impl SentryServer {
    pub fn new(config: SentryConfig) -> Result<Self> {
        let client = SentryClient::new(config.clone())?;
        Ok(Self {
            client: Arc::new(client),
            config,
            tool_router: Self::tool_router(),
        })
    }
}

#[tool_router]
impl SentryServer {
    #[tool(description = "List the projects of a Sentry organization")]
    pub async fn list_projects(
        &self,
        Parameters(args): Parameters<ListProjectsArgs>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::list_projects(self.client.as_ref(), &self.config, args).await;
        Ok(tool_result("list_projects", result))
    }

    #[tool(description = "List issues of a Sentry project with 24h event counts")]
    pub async fn list_project_issues(
        &self,
        Parameters(args): Parameters<ListIssuesArgs>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::list_project_issues(self.client.as_ref(), &self.config, args).await;
        Ok(tool_result("list_project_issues", result))
    }

    #[tool(description = "Show one Sentry issue with project, first release, tags and 24h stats")]
    pub async fn get_sentry_issue(
        &self,
        Parameters(args): Parameters<IssueArgs>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::get_sentry_issue(self.client.as_ref(), &self.config, args).await;
        Ok(tool_result("get_sentry_issue", result))
    }

    #[tool(description = "List events captured for a Sentry issue")]
    pub async fn list_issue_events(
        &self,
        Parameters(args): Parameters<EventsArgs>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::list_issue_events(self.client.as_ref(), &self.config, args).await;
        Ok(tool_result("list_issue_events", result))
    }

    #[tool(
        description = "Show one event with environment, additional data, stack trace and user. Defaults to the latest event"
    )]
    pub async fn get_sentry_event(
        &self,
        Parameters(args): Parameters<EventArgs>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::get_sentry_event(self.client.as_ref(), &self.config, args).await;
        Ok(tool_result("get_sentry_event", result))
    }

    #[tool(
        description = "Collect the values of context fields across the events of an issue. Returns JSON"
    )]
    pub async fn extract_event_context(
        &self,
        Parameters(args): Parameters<ExtractArgs>,
    ) -> Result<CallToolResult, McpError> {
        let result = tools::extract_event_context(self.client.as_ref(), &self.config, args).await;
        Ok(tool_result("extract_event_context", result))
    }
}

#[tool_handler]
impl ServerHandler for SentryServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Sentry projects, issues and events as markdown or plain text. Pass an issue ID, short ID or Sentry URL to the issue and event tools.".into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "sentry-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}

/// Serve MCP on stdin/stdout until the client disconnects
#[cfg(not(tarpaulin_include))]
pub async fn serve_stdio(config: SentryConfig) -> Result<()> {
    if !config.is_configured() {
        tracing::warn!("SENTRY_AUTH_TOKEN not set; tool calls will fail until configured");
    }
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "MCP server listening on stdio");

    let server = SentryServer::new(config)?.serve(stdio()).await?;
    server.waiting().await?;

    tracing::info!("MCP client disconnected, shutting down");
    Ok(())
}
