//! Project reports

use super::{or_na, DetailLevel, OutputMode};
use crate::sentry::types::Project;

/// Render a list of projects
pub fn render_projects(projects: &[Project], mode: OutputMode, detail: DetailLevel) -> String {
    let mut out = mode.header("Sentry Projects", 1);

    if projects.is_empty() {
        out.push_str("No projects found.\n");
        return out;
    }

    match detail {
        DetailLevel::Summary => {
            let items: Vec<String> = projects
                .iter()
                .map(|p| format!("{} ({}): ID {}", mode.bold(&p.name), p.slug, p.id))
                .collect();
            out.push_str(&mode.list(&items, false));
        }
        DetailLevel::Detailed => {
            if mode == OutputMode::Markdown {
                let rows: Vec<Vec<String>> = projects
                    .iter()
                    .map(|p| {
                        vec![
                            p.id.clone(),
                            p.name.clone(),
                            p.slug.clone(),
                            or_na(p.platform.as_deref()).to_string(),
                            team_names(p),
                            joined_or_none(p.environments.as_deref()),
                            joined_or_none(p.features.as_deref()),
                        ]
                    })
                    .collect();
                out.push_str(&mode.table(
                    &[
                        "ID",
                        "Name",
                        "Slug",
                        "Platform",
                        "Teams",
                        "Environments",
                        "Features",
                    ],
                    &rows,
                ));
            } else {
                for p in projects {
                    out.push_str(&format!("Project: {}\n", p.name));
                    out.push_str(&format!("  ID: {}\n", p.id));
                    out.push_str(&format!("  Slug: {}\n", p.slug));
                    out.push_str(&format!("  Platform: {}\n", or_na(p.platform.as_deref())));
                    out.push_str(&format!("  Teams: {}\n", team_names(p)));
                    out.push_str(&format!(
                        "  Environments: {}\n",
                        joined_or_none(p.environments.as_deref())
                    ));
                    out.push_str(&format!(
                        "  Features: {}\n\n",
                        joined_or_none(p.features.as_deref())
                    ));
                }
            }
            out.push_str(&mode.header("Summary", 2));
        }
    }

    out.push_str(&format!("Total Projects: {}\n", projects.len()));
    out
}

fn team_names(project: &Project) -> String {
    project
        .teams
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn joined_or_none(values: Option<&[String]>) -> String {
    match values {
        Some(v) if !v.is_empty() => v.join(", "),
        _ => "None".to_string(),
    }
}
