use clap::{Args, Parser, Subcommand};

use crate::sentry::display::{DetailLevel, OutputMode};
use crate::sentry::service::DEFAULT_LIMIT;

#[derive(Parser)]
#[command(name = "sentry-mcp")]
#[command(about = "Sentry projects, issues and events for AI agents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output settings shared by every report
#[derive(Debug, Clone, Copy, Args)]
pub struct RenderArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputMode::Markdown)]
    pub format: OutputMode,

    /// Level of detail
    #[arg(long, value_enum, default_value_t = DetailLevel::Detailed)]
    pub view: DetailLevel,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the MCP server on stdio
    Serve,

    /// Show configuration status
    Config,

    /// Save auth token and organization
    Auth {
        /// Auth token
        token: String,

        /// Organization slug
        #[arg(short, long)]
        org: String,
    },

    #[command(flatten)]
    Report(ReportCommand),
}

/// Commands that fetch from the API and print a report
#[derive(Subcommand)]
pub enum ReportCommand {
    /// List projects of the organization
    Projects {
        /// Organization slug (defaults to configured one)
        #[arg(long)]
        org: Option<String>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// List issues of a project
    Issues {
        /// Project slug
        project: String,

        /// Organization slug (defaults to configured one)
        #[arg(long)]
        org: Option<String>,

        /// Search query (Sentry search syntax)
        #[arg(short, long)]
        query: Option<String>,

        /// Maximum number of issues to return
        #[arg(short = 'n', long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Show issue details
    Issue {
        /// Issue ID, short ID or Sentry URL
        issue: String,

        /// Organization slug (defaults to the URL's or configured one)
        #[arg(long)]
        org: Option<String>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// List events of an issue
    Events {
        /// Issue ID, short ID or Sentry URL
        issue: String,

        /// Organization slug (defaults to the URL's or configured one)
        #[arg(long)]
        org: Option<String>,

        /// Maximum number of events to return
        #[arg(short = 'n', long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Show one event of an issue
    Event {
        /// Issue ID, short ID or Sentry URL
        issue: String,

        /// Event ID (defaults to the URL's, else the latest event)
        #[arg(short, long)]
        event: Option<String>,

        /// Organization slug (defaults to the URL's or configured one)
        #[arg(long)]
        org: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputMode::Markdown)]
        format: OutputMode,
    },

    /// Extract context fields across the events of an issue (JSON output)
    Extract {
        /// Issue ID, short ID or Sentry URL
        issue: String,

        /// Field to extract (repeatable)
        #[arg(long = "field", required = true)]
        fields: Vec<String>,

        /// Organization slug (defaults to the URL's or configured one)
        #[arg(long)]
        org: Option<String>,

        /// Maximum number of events to scan
        #[arg(short = 'n', long, default_value_t = DEFAULT_LIMIT)]
        limit: usize,
    },
}
