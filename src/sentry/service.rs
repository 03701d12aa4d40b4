//! Sentry service layer - business logic that returns data
//!
//! Functions in this module accept any [`SentryApi`] and return rendered
//! reports or extraction results. They never print - that's the CLI layer's
//! job - and every failure is already classified as a [`ToolError`].

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::client::SentryApi;
use super::config::SentryConfig;
use super::display::{self, DetailLevel, OutputMode};
use super::error::ToolError;
use super::extract::{self, ExtractionResult};
use super::types::{Event, Issue, Project};

/// Largest page Sentry hands out
pub const MAX_LIMIT: usize = 100;

/// Default page size
pub const DEFAULT_LIMIT: usize = 25;

/// Event ID used when none is given
pub const LATEST_EVENT: &str = "latest";

/// Render settings for one call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    pub mode: OutputMode,
    pub detail: DetailLevel,
}

/// Options for listing issues
#[derive(Debug)]
pub struct IssueOptions {
    /// Project slug
    pub project: String,
    /// Search query (Sentry search syntax)
    pub query: Option<String>,
    /// Maximum number of results
    pub limit: usize,
}

impl IssueOptions {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            query: None,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Options for listing events
#[derive(Debug)]
pub struct EventOptions {
    /// Issue ID
    pub issue_id: String,
    /// Maximum number of results
    pub limit: usize,
}

impl EventOptions {
    pub fn new(issue_id: impl Into<String>) -> Self {
        Self {
            issue_id: issue_id.into(),
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Pick the organization: explicit argument, then URL, then config
pub fn resolve_org(
    explicit: Option<&str>,
    from_reference: Option<&str>,
    config: &SentryConfig,
) -> Result<String, ToolError> {
    explicit
        .or(from_reference)
        .or(config.organization.as_deref())
        .map(str::trim)
        .filter(|org| !org.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            ToolError::validation(
                "organization_slug is required (pass it, use a full issue URL, or set SENTRY_ORG)",
            )
        })
}

/// Check a page size
pub fn validate_limit(limit: usize) -> Result<usize, ToolError> {
    if limit == 0 || limit > MAX_LIMIT {
        return Err(ToolError::validation(format!(
            "limit must be between 1 and {}, got {}",
            MAX_LIMIT, limit
        )));
    }
    Ok(limit)
}

/// Decode a raw payload into typed views
fn decode<T: DeserializeOwned>(operation: &str, value: Value) -> Result<T, ToolError> {
    serde_json::from_value(value).map_err(|e| ToolError::Upstream {
        operation: operation.to_string(),
        message: format!("unexpected response shape: {}", e),
    })
}

/// Projects of an organization
pub async fn projects_report(
    api: &impl SentryApi,
    org: &str,
    opts: ReportOptions,
) -> Result<String, ToolError> {
    const OP: &str = "list_projects";
    let raw = api
        .list_projects(org)
        .await
        .map_err(|e| ToolError::from_api(OP, "Organization", org, e))?;
    let projects: Vec<Project> = decode(OP, raw)?;
    Ok(display::render_projects(&projects, opts.mode, opts.detail))
}

/// Issues of one project
pub async fn issues_report(
    api: &impl SentryApi,
    org: &str,
    issue_opts: &IssueOptions,
    opts: ReportOptions,
) -> Result<String, ToolError> {
    const OP: &str = "list_project_issues";
    let limit = validate_limit(issue_opts.limit)?;
    if issue_opts.project.trim().is_empty() {
        return Err(ToolError::validation("project_slug must not be empty"));
    }
    let raw = api
        .list_project_issues(org, &issue_opts.project, issue_opts.query.as_deref(), limit)
        .await
        .map_err(|e| ToolError::from_api(OP, "Project", &issue_opts.project, e))?;
    let issues: Vec<Issue> = decode(OP, raw)?;
    Ok(display::render_issues(
        &issues,
        &issue_opts.project,
        opts.mode,
        opts.detail,
    ))
}

/// One issue
pub async fn issue_report(
    api: &impl SentryApi,
    org: &str,
    issue_id: &str,
    opts: ReportOptions,
) -> Result<String, ToolError> {
    const OP: &str = "get_sentry_issue";
    let raw = api
        .get_issue(org, issue_id)
        .await
        .map_err(|e| ToolError::from_api(OP, "Issue", issue_id, e))?;
    let issue: Issue = decode(OP, raw)?;
    Ok(display::render_issue_detail(&issue, opts.mode, opts.detail))
}

/// Events of one issue
pub async fn events_report(
    api: &impl SentryApi,
    org: &str,
    event_opts: &EventOptions,
    opts: ReportOptions,
) -> Result<String, ToolError> {
    const OP: &str = "list_issue_events";
    let events: Vec<Event> = decode(OP, fetch_events(api, org, event_opts, OP).await?)?;
    Ok(display::render_events(
        &events,
        &event_opts.issue_id,
        opts.mode,
        opts.detail,
    ))
}

/// One event of an issue; the layout ignores the detail level
pub async fn event_report(
    api: &impl SentryApi,
    org: &str,
    issue_id: &str,
    event_id: Option<&str>,
    mode: OutputMode,
) -> Result<String, ToolError> {
    const OP: &str = "get_sentry_event";
    let event_id = event_id.unwrap_or(LATEST_EVENT);
    let raw = api
        .get_issue_event(org, issue_id, event_id)
        .await
        .map_err(|e| ToolError::from_api(OP, "Event", event_id, e))?;
    let event: Event = decode(OP, raw)?;
    Ok(display::render_event_detail(&event, mode))
}

/// Pull `fields` out of the events of one issue
pub async fn extract_context(
    api: &impl SentryApi,
    org: &str,
    event_opts: &EventOptions,
    fields: &[String],
) -> Result<ExtractionResult, ToolError> {
    const OP: &str = "extract_event_context";
    if fields.is_empty() {
        return Err(ToolError::validation(
            "fields must contain at least one field name",
        ));
    }
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(ToolError::validation("field names must not be empty"));
    }

    let events: Vec<Value> = decode(OP, fetch_events(api, org, event_opts, OP).await?)?;
    Ok(extract::extract(&events, fields))
}

async fn fetch_events(
    api: &impl SentryApi,
    org: &str,
    event_opts: &EventOptions,
    operation: &str,
) -> Result<Value, ToolError> {
    let limit = validate_limit(event_opts.limit)?;
    api.list_issue_events(org, &event_opts.issue_id, limit)
        .await
        .map_err(|e| ToolError::from_api(operation, "Issue", &event_opts.issue_id, e))
}
