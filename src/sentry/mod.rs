//! Sentry integration
//!
//! Fetch projects, issues and events from Sentry and render them as reports
//! for agents and humans.
//!
//! # CLI Usage
//! Use [`run`] for CLI commands that format and print output.
//!
//! # Programmatic Usage (MCP)
//! The [`service`] functions take any [`client::SentryApi`] and return the
//! rendered text or extraction result without printing.

pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod extract;
pub mod reference;
pub mod service;
pub mod types;

use anyhow::Result;

use crate::cli::{Command, RenderArgs, ReportCommand};
use client::SentryClient;
use config::SentryConfig;
use reference::IssueReference;
use service::{EventOptions, IssueOptions, ReportOptions};

impl From<RenderArgs> for ReportOptions {
    fn from(args: RenderArgs) -> Self {
        Self {
            mode: args.format,
            detail: args.view,
        }
    }
}

/// Run a report command (CLI entry point - formats and prints)
#[cfg(not(tarpaulin_include))]
pub async fn run(cmd: Command, config: SentryConfig) -> Result<()> {
    match cmd {
        Command::Config => {
            print!("{}", config_status(&config));
            Ok(())
        }
        Command::Auth { token, org } => {
            config::save_auth_token(&token, &org)?;
            println!("Sentry auth token saved for organization: {}", org);
            Ok(())
        }
        Command::Serve => crate::mcp::serve_stdio(config).await,
        Command::Report(report) => run_report(report, config).await,
    }
}

/// Commands that talk to the API
#[cfg(not(tarpaulin_include))]
async fn run_report(cmd: ReportCommand, config: SentryConfig) -> Result<()> {
    ensure_configured(&config)?;
    let client = SentryClient::new(config)?;
    let config = client.config();

    let output = match cmd {
        ReportCommand::Projects { org, render } => {
            let org = service::resolve_org(org.as_deref(), None, config)?;
            service::projects_report(&client, &org, render.into()).await?
        }
        ReportCommand::Issues {
            project,
            org,
            query,
            limit,
            render,
        } => {
            let org = service::resolve_org(org.as_deref(), None, config)?;
            let opts = IssueOptions {
                project,
                query,
                limit,
            };
            service::issues_report(&client, &org, &opts, render.into()).await?
        }
        ReportCommand::Issue { issue, org, render } => {
            let reference = IssueReference::parse(&issue)?;
            let org = service::resolve_org(
                org.as_deref(),
                reference.organization.as_deref(),
                config,
            )?;
            service::issue_report(&client, &org, &reference.issue_id, render.into()).await?
        }
        ReportCommand::Events {
            issue,
            org,
            limit,
            render,
        } => {
            let reference = IssueReference::parse(&issue)?;
            let org = service::resolve_org(
                org.as_deref(),
                reference.organization.as_deref(),
                config,
            )?;
            let opts = EventOptions {
                issue_id: reference.issue_id,
                limit,
            };
            service::events_report(&client, &org, &opts, render.into()).await?
        }
        ReportCommand::Event {
            issue,
            event,
            org,
            format,
        } => {
            let reference = IssueReference::parse(&issue)?;
            let org = service::resolve_org(
                org.as_deref(),
                reference.organization.as_deref(),
                config,
            )?;
            let event_id = event.or(reference.event_id);
            service::event_report(
                &client,
                &org,
                &reference.issue_id,
                event_id.as_deref(),
                format,
            )
            .await?
        }
        ReportCommand::Extract {
            issue,
            fields,
            org,
            limit,
        } => {
            let reference = IssueReference::parse(&issue)?;
            let org = service::resolve_org(
                org.as_deref(),
                reference.organization.as_deref(),
                config,
            )?;
            let opts = EventOptions {
                issue_id: reference.issue_id,
                limit,
            };
            let result = service::extract_context(&client, &org, &opts, &fields).await?;
            serde_json::to_string_pretty(&result)?
        }
    };

    println!("{}", output.trim_end());
    Ok(())
}

/// Check if API is configured, return error if not
pub fn ensure_configured(config: &SentryConfig) -> Result<()> {
    if !config.is_configured() {
        anyhow::bail!(
            "Sentry not configured. Run: sentry-mcp auth <token> --org <org>\n\
             Or set SENTRY_AUTH_TOKEN and SENTRY_ORG environment variables."
        );
    }
    Ok(())
}

/// Config status report
fn config_status(config: &SentryConfig) -> String {
    let mut out = String::from("Sentry Configuration\n");
    out.push_str(&format!("{}\n", "-".repeat(40)));
    out.push_str(&format!(
        "Auth token:   {}\n",
        if config.is_configured() { "Yes" } else { "No" }
    ));
    out.push_str(&format!(
        "Organization: {}\n",
        config.organization.as_deref().unwrap_or("Not set")
    ));
    out.push_str(&format!("API:          {}\n", config.api_base()));
    out
}
