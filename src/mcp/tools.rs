//! Tool arguments and handlers
//!
//! Each handler takes any [`SentryApi`] so the tools run against a mock in
//! tests. [`SentryServer`](super::SentryServer) wraps them for rmcp.

use rmcp::model::{CallToolResult, Content};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::sentry::client::SentryApi;
use crate::sentry::config::SentryConfig;
use crate::sentry::display::{DetailLevel, OutputMode};
use crate::sentry::error::ToolError;
use crate::sentry::reference::IssueReference;
use crate::sentry::service::{self, EventOptions, IssueOptions, ReportOptions, DEFAULT_LIMIT};

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListProjectsArgs {
    /// Organization slug; defaults to SENTRY_ORG
    pub organization_slug: Option<String>,
    /// Output format
    #[serde(default)]
    pub format: OutputMode,
    /// Level of detail
    #[serde(default)]
    pub view: DetailLevel,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListIssuesArgs {
    /// Organization slug; defaults to SENTRY_ORG
    pub organization_slug: Option<String>,
    /// Project slug
    pub project_slug: String,
    /// Sentry search query, e.g. `is:unresolved`
    pub query: Option<String>,
    /// Maximum number of issues (1-100, default 25)
    pub limit: Option<usize>,
    #[serde(default)]
    pub format: OutputMode,
    #[serde(default)]
    pub view: DetailLevel,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct IssueArgs {
    /// Issue ID, short ID, or full Sentry issue URL
    pub issue_id_or_url: String,
    /// Organization slug; defaults to the URL's, then SENTRY_ORG
    pub organization_slug: Option<String>,
    #[serde(default)]
    pub format: OutputMode,
    #[serde(default)]
    pub view: DetailLevel,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EventsArgs {
    /// Issue ID, short ID, or full Sentry issue URL
    pub issue_id_or_url: String,
    /// Organization slug; defaults to the URL's, then SENTRY_ORG
    pub organization_slug: Option<String>,
    /// Maximum number of events (1-100, default 25)
    pub limit: Option<usize>,
    #[serde(default)]
    pub format: OutputMode,
    #[serde(default)]
    pub view: DetailLevel,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EventArgs {
    /// Issue ID, short ID, or full Sentry issue/event URL
    pub issue_id_or_url: String,
    /// Event ID; defaults to the URL's, else the latest event
    pub event_id: Option<String>,
    /// Organization slug; defaults to the URL's, then SENTRY_ORG
    pub organization_slug: Option<String>,
    #[serde(default)]
    pub format: OutputMode,
    /// Accepted and ignored; an event always renders in full
    #[serde(default)]
    #[allow(dead_code)]
    pub view: DetailLevel,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ExtractArgs {
    /// Issue ID, short ID, or full Sentry issue URL
    pub issue_id_or_url: String,
    /// Field names looked up in contexts, extra, context, then the event itself
    pub fields: Vec<String>,
    /// Organization slug; defaults to the URL's, then SENTRY_ORG
    pub organization_slug: Option<String>,
    /// Maximum number of events scanned (1-100, default 25)
    pub limit: Option<usize>,
}

/// Text on success, error flag plus message otherwise
pub fn tool_result(tool: &str, result: Result<String, ToolError>) -> CallToolResult {
    match result {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(err) => {
            tracing::warn!(tool, error = %err, "tool call failed");
            CallToolResult::error(vec![Content::text(err.to_string())])
        }
    }
}

pub async fn list_projects(
    api: &impl SentryApi,
    config: &SentryConfig,
    args: ListProjectsArgs,
) -> Result<String, ToolError> {
    let org = service::resolve_org(args.organization_slug.as_deref(), None, config)?;
    let opts = ReportOptions {
        mode: args.format,
        detail: args.view,
    };
    service::projects_report(api, &org, opts).await
}

pub async fn list_project_issues(
    api: &impl SentryApi,
    config: &SentryConfig,
    args: ListIssuesArgs,
) -> Result<String, ToolError> {
    let org = service::resolve_org(args.organization_slug.as_deref(), None, config)?;
    let issue_opts = IssueOptions {
        project: args.project_slug,
        query: args.query,
        limit: args.limit.unwrap_or(DEFAULT_LIMIT),
    };
    let opts = ReportOptions {
        mode: args.format,
        detail: args.view,
    };
    service::issues_report(api, &org, &issue_opts, opts).await
}

pub async fn get_sentry_issue(
    api: &impl SentryApi,
    config: &SentryConfig,
    args: IssueArgs,
) -> Result<String, ToolError> {
    let (org, reference) = locate(&args.issue_id_or_url, &args.organization_slug, config)?;
    let opts = ReportOptions {
        mode: args.format,
        detail: args.view,
    };
    service::issue_report(api, &org, &reference.issue_id, opts).await
}

pub async fn list_issue_events(
    api: &impl SentryApi,
    config: &SentryConfig,
    args: EventsArgs,
) -> Result<String, ToolError> {
    let (org, reference) = locate(&args.issue_id_or_url, &args.organization_slug, config)?;
    let event_opts = EventOptions {
        issue_id: reference.issue_id,
        limit: args.limit.unwrap_or(DEFAULT_LIMIT),
    };
    let opts = ReportOptions {
        mode: args.format,
        detail: args.view,
    };
    service::events_report(api, &org, &event_opts, opts).await
}

pub async fn get_sentry_event(
    api: &impl SentryApi,
    config: &SentryConfig,
    args: EventArgs,
) -> Result<String, ToolError> {
    let (org, reference) = locate(&args.issue_id_or_url, &args.organization_slug, config)?;
    let event_id = args.event_id.or(reference.event_id);
    service::event_report(
        api,
        &org,
        &reference.issue_id,
        event_id.as_deref(),
        args.format,
    )
    .await
}

/// Pretty-printed JSON of the extraction result
pub async fn extract_event_context(
    api: &impl SentryApi,
    config: &SentryConfig,
    args: ExtractArgs,
) -> Result<String, ToolError> {
    let (org, reference) = locate(&args.issue_id_or_url, &args.organization_slug, config)?;
    let event_opts = EventOptions {
        issue_id: reference.issue_id,
        limit: args.limit.unwrap_or(DEFAULT_LIMIT),
    };
    let result = service::extract_context(api, &org, &event_opts, &args.fields).await?;
    serde_json::to_string_pretty(&result).map_err(|e| ToolError::Upstream {
        operation: "extract_event_context".to_string(),
        message: e.to_string(),
    })
}

/// Parse the issue reference and settle the organization
fn locate(
    input: &str,
    explicit_org: &Option<String>,
    config: &SentryConfig,
) -> Result<(String, IssueReference), ToolError> {
    let reference = IssueReference::parse(input)?;
    let org = service::resolve_org(
        explicit_org.as_deref(),
        reference.organization.as_deref(),
        config,
    )?;
    Ok((org, reference))
}
