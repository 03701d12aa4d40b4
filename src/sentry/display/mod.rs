//! Sentry output formatting
//!
//! Every report is built from the same small set of primitives. Each one
//! takes its content plus the active [`OutputMode`] and returns a string, so
//! a report renders as markdown or plain text without any other branching.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

mod events;
mod issues;
mod projects;

pub use events::{render_event_detail, render_events};
pub use issues::{render_issue_detail, render_issues};
pub use projects::render_projects;

#[cfg(test)]
mod tests;

/// Width of the plain-text separator rule
const PLAIN_RULE_WIDTH: usize = 40;

/// Placeholder for absent scalar fields
pub(crate) const NOT_AVAILABLE: &str = "N/A";

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Markdown,
    Plain,
}

/// How much of each record a report shows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    Summary,
    #[default]
    Detailed,
}

impl OutputMode {
    /// Section header followed by a blank line
    pub fn header(self, title: &str, level: usize) -> String {
        match self {
            Self::Markdown => format!("{} {}\n\n", "#".repeat(level.max(1)), title),
            Self::Plain => format!("{}\n\n", title),
        }
    }

    /// Table with a header row
    pub fn table<S: AsRef<str>>(self, headers: &[&str], rows: &[Vec<S>]) -> String {
        let mut out = String::new();
        let cells = |row: &[S]| {
            row.iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .join(" | ")
        };

        match self {
            Self::Markdown => {
                out.push_str(&format!("| {} |\n", headers.join(" | ")));
                out.push_str(&format!("|{}\n", " --- |".repeat(headers.len())));
                for row in rows {
                    out.push_str(&format!("| {} |\n", cells(row.as_slice())));
                }
            }
            Self::Plain => {
                out.push_str(&headers.join(" | "));
                out.push('\n');
                for row in rows {
                    out.push_str(&cells(row.as_slice()));
                    out.push('\n');
                }
            }
        }

        out.push('\n');
        out
    }

    /// Bulleted or numbered list; identical in both modes
    pub fn list<S: AsRef<str>>(self, items: &[S], ordered: bool) -> String {
        let mut out = String::new();
        for (i, item) in items.iter().enumerate() {
            if ordered {
                out.push_str(&format!("{}. {}\n", i + 1, item.as_ref()));
            } else {
                out.push_str(&format!("- {}\n", item.as_ref()));
            }
        }
        out.push('\n');
        out
    }

    /// Fenced code block; plain mode drops the fence and language
    pub fn code_block(self, code: &str, language: &str) -> String {
        match self {
            Self::Markdown => format!("```{}\n{}\n```\n\n", language, code),
            Self::Plain => format!("{}\n\n", code),
        }
    }

    pub fn link(self, text: &str, url: &str) -> String {
        match self {
            Self::Markdown => format!("[{}]({})", text, url),
            Self::Plain => format!("{}: {}", text, url),
        }
    }

    pub fn bold(self, text: &str) -> String {
        match self {
            Self::Markdown => format!("**{}**", text),
            Self::Plain => text.to_string(),
        }
    }

    pub fn separator(self) -> String {
        match self {
            Self::Markdown => "---\n\n".to_string(),
            Self::Plain => format!("{}\n\n", "-".repeat(PLAIN_RULE_WIDTH)),
        }
    }

    /// `label: value` list item with the label emphasised
    pub(crate) fn field(self, label: &str, value: &str) -> String {
        format!("{}: {}", self.bold(label), value)
    }
}

/// Value or the `N/A` placeholder
pub(crate) fn or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => NOT_AVAILABLE,
    }
}

/// Convert epoch seconds to an ISO-8601 UTC timestamp
pub(crate) fn epoch_to_iso(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
        .unwrap_or_else(|| secs.to_string())
}
