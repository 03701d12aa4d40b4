//! Issue reports

use super::{epoch_to_iso, or_na, DetailLevel, OutputMode};
use crate::sentry::types::{Issue, ProjectRef, Release};

/// Render the issues of one project
pub fn render_issues(
    issues: &[Issue],
    project: &str,
    mode: OutputMode,
    detail: DetailLevel,
) -> String {
    let mut out = mode.header(&format!("Issues for Project: {}", project), 1);

    if issues.is_empty() {
        out.push_str("No issues found for this project.\n");
        return out;
    }

    match detail {
        DetailLevel::Detailed => {
            if mode == OutputMode::Markdown {
                let rows: Vec<Vec<String>> = issues
                    .iter()
                    .map(|i| {
                        vec![
                            i.id.clone(),
                            i.short_id.clone(),
                            i.title.clone(),
                            i.status.clone(),
                            i.level.clone(),
                            or_na(i.first_seen.as_deref()).to_string(),
                            or_na(i.last_seen.as_deref()).to_string(),
                            i.count.clone(),
                            i.user_count.clone(),
                        ]
                    })
                    .collect();
                out.push_str(&mode.table(
                    &[
                        "ID",
                        "Short ID",
                        "Title",
                        "Status",
                        "Level",
                        "First Seen",
                        "Last Seen",
                        "Events",
                        "Users",
                    ],
                    &rows,
                ));
            }

            for issue in issues {
                out.push_str(&mode.header(&format!("{}: {}", issue.short_id, issue.title), 2));
                out.push_str(&mode.list(&overview_fields(issue, mode), false));
                if let Some(buckets) = issue.day_stats() {
                    out.push_str(&mode.header("Events (last 24h)", 3));
                    out.push_str(&mode.list(&bucket_lines(buckets), false));
                }
                out.push_str(&mode.separator());
            }
        }
        DetailLevel::Summary => {
            let items: Vec<String> = issues
                .iter()
                .map(|i| {
                    format!(
                        "{} ({})\n  Status: {} | Level: {} | Events: {}\n  First seen: {} | Last seen: {}",
                        mode.bold(&i.title),
                        i.short_id,
                        i.status,
                        i.level,
                        i.count,
                        or_na(i.first_seen.as_deref()),
                        or_na(i.last_seen.as_deref()),
                    )
                })
                .collect();
            out.push_str(&mode.list(&items, false));
        }
    }

    out
}

/// Render a single issue
pub fn render_issue_detail(issue: &Issue, mode: OutputMode, detail: DetailLevel) -> String {
    let mut out = mode.header(&format!("Issue {}: {}", issue.short_id, issue.title), 1);

    if detail == DetailLevel::Summary {
        let mut items = vec![
            mode.field("Status", &issue.status),
            mode.field("Level", &issue.level),
            mode.field("Events", &issue.count),
            mode.field("Users", &issue.user_count),
            mode.field("First Seen", or_na(issue.first_seen.as_deref())),
            mode.field("Last Seen", or_na(issue.last_seen.as_deref())),
        ];
        if let Some(url) = issue.permalink.as_deref() {
            items.push(mode.link("View in Sentry", url));
        }
        out.push_str(&mode.list(&items, false));

        if let Some(buckets) = issue.day_stats() {
            let total: u64 = buckets.iter().map(|(_, count)| count).sum();
            out.push_str(&format!("Total events in last 24h: {}\n", total));
        }
        return out;
    }

    out.push_str(&mode.header("Overview", 2));
    out.push_str(&mode.list(&overview_fields(issue, mode), false));

    if let Some(project) = &issue.project {
        out.push_str(&mode.header("Project", 2));
        out.push_str(&mode.list(&project_fields(project, mode), false));
    }

    if let Some(release) = &issue.first_release {
        out.push_str(&render_release(release, mode));
    }

    if !issue.tags.is_empty() {
        out.push_str(&mode.header("Tags", 2));
        match mode {
            OutputMode::Markdown => {
                let rows: Vec<Vec<&str>> = issue
                    .tags
                    .iter()
                    .map(|t| vec![t.key.as_str(), t.value.as_str()])
                    .collect();
                out.push_str(&mode.table(&["Key", "Value"], &rows));
            }
            OutputMode::Plain => {
                let items: Vec<String> = issue
                    .tags
                    .iter()
                    .map(|t| format!("{}: {}", t.key, t.value))
                    .collect();
                out.push_str(&mode.list(&items, false));
            }
        }
    }

    if let Some(buckets) = issue.day_stats() {
        out.push_str(&mode.header("Events (last 24h)", 2));
        out.push_str(&mode.list(&bucket_lines(buckets), false));
    }

    out
}

fn overview_fields(issue: &Issue, mode: OutputMode) -> Vec<String> {
    let mut fields = vec![
        mode.field("ID", &issue.id),
        mode.field("Short ID", &issue.short_id),
        mode.field("Title", &issue.title),
        mode.field("Status", &issue.status),
        mode.field("Level", &issue.level),
        mode.field("First Seen", or_na(issue.first_seen.as_deref())),
        mode.field("Last Seen", or_na(issue.last_seen.as_deref())),
        mode.field("Events", &issue.count),
        mode.field("Users", &issue.user_count),
        mode.field("Culprit", or_na(issue.culprit.as_deref())),
    ];
    if let Some(url) = issue.permalink.as_deref() {
        let link = match mode {
            OutputMode::Markdown => mode.link(url, url),
            OutputMode::Plain => url.to_string(),
        };
        fields.push(mode.field("Link", &link));
    }
    fields
}

fn project_fields(project: &ProjectRef, mode: OutputMode) -> Vec<String> {
    vec![
        mode.field("ID", &project.id),
        mode.field("Name", &project.name),
        mode.field("Slug", &project.slug),
        mode.field("Platform", or_na(project.platform.as_deref())),
    ]
}

fn render_release(release: &Release, mode: OutputMode) -> String {
    let mut out = mode.header("First Release", 2);
    out.push_str(&mode.list(
        &[
            mode.field("Version", &release.version),
            mode.field("Short Version", or_na(release.short_version.as_deref())),
            mode.field("Created", or_na(release.date_created.as_deref())),
            mode.field("Released", or_na(release.date_released.as_deref())),
        ],
        false,
    ));

    if let Some(projects) = release.projects.as_deref().filter(|p| !p.is_empty()) {
        out.push_str(&mode.header("Release Projects", 3));
        let items: Vec<String> = projects
            .iter()
            .map(|p| format!("{} ({})", p.name, p.slug))
            .collect();
        out.push_str(&mode.list(&items, false));
    }
    out
}

fn bucket_lines(buckets: &[(i64, u64)]) -> Vec<String> {
    buckets
        .iter()
        .map(|(ts, count)| format!("{}: {}", epoch_to_iso(*ts), count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentry::types::{IssueStats, Tag};

    fn make_issue() -> Issue {
        Issue {
            id: "100".to_string(),
            short_id: "DEMO-1".to_string(),
            title: "ZeroDivisionError".to_string(),
            status: "unresolved".to_string(),
            level: "error".to_string(),
            first_seen: Some("2024-01-01T00:00:00Z".to_string()),
            last_seen: Some("2024-01-02T00:00:00Z".to_string()),
            count: "8".to_string(),
            user_count: "2".to_string(),
            culprit: Some("app.views.divide".to_string()),
            permalink: Some("https://sentry.io/issues/100/".to_string()),
            ..Default::default()
        }
    }

    fn with_stats(mut issue: Issue) -> Issue {
        issue.stats = Some(IssueStats {
            last_24h: vec![(1000, 5), (2000, 3)],
        });
        issue
    }

    #[test]
    fn empty_list_has_fixed_message() {
        for mode in [OutputMode::Markdown, OutputMode::Plain] {
            for detail in [DetailLevel::Summary, DetailLevel::Detailed] {
                let out = render_issues(&[], "X", mode, detail);
                assert!(out.contains("Issues for Project: X\n\n"));
                assert!(out.ends_with("No issues found for this project.\n"));
                assert!(!out.contains('|'));
            }
        }
    }

    #[test]
    fn detailed_markdown_has_nine_column_table() {
        let out = render_issues(&[make_issue()], "demo", OutputMode::Markdown, DetailLevel::Detailed);
        assert!(out.contains(
            "| ID | Short ID | Title | Status | Level | First Seen | Last Seen | Events | Users |"
        ));
        assert!(out.contains(&format!("|{}", " --- |".repeat(9))));
        assert!(out.contains("## DEMO-1: ZeroDivisionError"));
        assert!(out.contains("---\n\n"));
    }

    #[test]
    fn detailed_plain_skips_table() {
        let out = render_issues(&[make_issue()], "demo", OutputMode::Plain, DetailLevel::Detailed);
        assert!(!out.contains("Short ID | Title"));
        assert!(out.contains("- Short ID: DEMO-1\n"));
        assert!(out.contains(&"-".repeat(40)));
    }

    #[test]
    fn detailed_list_expands_day_stats() {
        let issue = with_stats(make_issue());
        let out = render_issues(&[issue], "demo", OutputMode::Markdown, DetailLevel::Detailed);
        assert!(out.contains("### Events (last 24h)"));
        assert!(out.contains("- 1970-01-01T00:16:40.000Z: 5\n"));
        assert!(out.contains("- 1970-01-01T00:33:20.000Z: 3\n"));
    }

    #[test]
    fn summary_list_has_two_sub_lines() {
        let out = render_issues(&[make_issue()], "demo", OutputMode::Markdown, DetailLevel::Summary);
        assert!(out.contains("- **ZeroDivisionError** (DEMO-1)\n"));
        assert!(out.contains("  Status: unresolved | Level: error | Events: 8\n"));
        assert!(out.contains("  First seen: 2024-01-01T00:00:00Z | Last seen: 2024-01-02T00:00:00Z\n"));
    }

    #[test]
    fn summary_detail_sums_day_stats() {
        let issue = with_stats(make_issue());
        let out = render_issue_detail(&issue, OutputMode::Markdown, DetailLevel::Summary);
        assert!(out.contains("Total events in last 24h: 8\n"));
        assert!(!out.contains("## Overview"));
    }

    #[test]
    fn summary_detail_without_stats_has_no_total() {
        let out = render_issue_detail(&make_issue(), OutputMode::Plain, DetailLevel::Summary);
        assert!(!out.contains("Total events"));
        assert!(out.contains("View in Sentry: https://sentry.io/issues/100/"));
    }

    #[test]
    fn detailed_sections_in_order() {
        let mut issue = with_stats(make_issue());
        issue.project = Some(ProjectRef {
            id: "1".to_string(),
            name: "Demo".to_string(),
            slug: "demo".to_string(),
            platform: None,
        });
        issue.first_release = Some(Release {
            version: "1.2.3".to_string(),
            projects: Some(vec![ProjectRef {
                name: "Demo".to_string(),
                slug: "demo".to_string(),
                ..Default::default()
            }]),
            ..Default::default()
        });
        issue.tags = vec![Tag {
            key: "browser".to_string(),
            value: "Firefox".to_string(),
        }];

        let out = render_issue_detail(&issue, OutputMode::Markdown, DetailLevel::Detailed);
        let positions: Vec<usize> = [
            "## Overview",
            "## Project",
            "## First Release",
            "### Release Projects",
            "## Tags",
            "## Events (last 24h)",
        ]
        .iter()
        .map(|h| out.find(h).unwrap_or_else(|| panic!("missing {h}")))
        .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(out.contains("| browser | Firefox |"));
        assert!(out.contains("- **Platform**: N/A\n"));
    }

    #[test]
    fn detailed_omits_absent_sections() {
        let out = render_issue_detail(&make_issue(), OutputMode::Plain, DetailLevel::Detailed);
        assert!(out.contains("Overview\n\n"));
        assert!(!out.contains("First Release"));
        assert!(!out.contains("Tags"));
        assert!(out.contains("- Link: https://sentry.io/issues/100/\n"));
        assert!(!out.contains("https://sentry.io/issues/100/: "));

        let out = render_issue_detail(&make_issue(), OutputMode::Markdown, DetailLevel::Detailed);
        assert!(out.contains(
            "- **Link**: [https://sentry.io/issues/100/](https://sentry.io/issues/100/)\n"
        ));
    }
}
