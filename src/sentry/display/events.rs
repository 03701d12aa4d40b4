//! Event reports

use serde_json::{Map, Value};

use super::{or_na, DetailLevel, OutputMode, NOT_AVAILABLE};
use crate::sentry::types::{tag_value, Event, EventUser, Frame};

/// Tags surfaced in the event "Environment" section
const ENVIRONMENT_TAGS: [&str; 5] = ["environment", "level", "release", "server_name", "runtime"];

/// In-app frames shown when the trace has any
const IN_APP_FRAME_LIMIT: usize = 5;

/// Frames shown when no frame is in-app
const ANY_FRAME_LIMIT: usize = 10;

/// Render the events of one issue
pub fn render_events(
    events: &[Event],
    issue: &str,
    mode: OutputMode,
    detail: DetailLevel,
) -> String {
    let mut out = mode.header(&format!("Events for Issue: {}", issue), 1);

    if events.is_empty() {
        out.push_str("No events found for this issue.\n");
        return out;
    }

    match detail {
        DetailLevel::Detailed => {
            if mode == OutputMode::Markdown {
                let rows: Vec<Vec<&str>> = events
                    .iter()
                    .map(|e| {
                        vec![
                            or_na(e.display_id()),
                            or_na(e.title.as_deref()),
                            or_na(e.platform.as_deref()),
                            or_na(e.date_created.as_deref()),
                            or_na(e.location.as_deref()),
                        ]
                    })
                    .collect();
                out.push_str(&mode.table(
                    &["Event ID", "Title", "Platform", "Date", "Location"],
                    &rows,
                ));
            }

            for event in events {
                out.push_str(&mode.header(&format!("Event {}", or_na(event.display_id())), 2));
                out.push_str(&mode.list(
                    &[
                        mode.field("Title", or_na(event.title.as_deref())),
                        mode.field("Platform", or_na(event.platform.as_deref())),
                        mode.field("Date", or_na(event.date_created.as_deref())),
                        mode.field("Location", or_na(event.location.as_deref())),
                        mode.field("Message", or_na(event.message.as_deref())),
                    ],
                    false,
                ));

                if !event.tags.is_empty() {
                    out.push_str(&mode.header("Tags", 3));
                    let items: Vec<String> = event
                        .tags
                        .iter()
                        .map(|t| format!("{}: {}", t.key, t.value))
                        .collect();
                    out.push_str(&mode.list(&items, false));
                }

                if let Some(user) = &event.user {
                    let items = user_fields(user, mode);
                    if !items.is_empty() {
                        out.push_str(&mode.header("User", 3));
                        out.push_str(&mode.list(&items, false));
                    }
                }

                out.push_str(&mode.separator());
            }

            out.push_str(&mode.header("Summary", 2));
            out.push_str(&format!("Total Events: {}\n", events.len()));
        }
        DetailLevel::Summary => {
            let items: Vec<String> = events
                .iter()
                .map(|e| {
                    format!(
                        "{}\n  Title: {}\n  Level: {}\n  Environment: {}\n  Platform: {}\n  Date: {}",
                        mode.field("Event ID", or_na(e.display_id())),
                        or_na(e.title.as_deref()),
                        tag_value(&e.tags, "level").unwrap_or("unknown"),
                        tag_value(&e.tags, "environment").unwrap_or("unknown"),
                        or_na(e.platform.as_deref()),
                        or_na(e.date_created.as_deref()),
                    )
                })
                .collect();
            out.push_str(&mode.list(&items, false));
        }
    }

    out
}

/// Render one event in full
///
/// The layout does not depend on the detail level.
pub fn render_event_detail(event: &Event, mode: OutputMode) -> String {
    let mut out = mode.header(&format!("Event {}", or_na(event.display_id())), 1);

    out.push_str(&mode.header("Overview", 2));
    out.push_str(&mode.list(
        &[
            mode.field("Title", or_na(event.display_title())),
            mode.field("Platform", or_na(event.platform.as_deref())),
            mode.field("Date", or_na(event.date_created.as_deref())),
            mode.field("Culprit", or_na(event.culprit.as_deref())),
        ],
        false,
    ));

    let env_tags: Vec<String> = event
        .tags
        .iter()
        .filter(|t| ENVIRONMENT_TAGS.contains(&t.key.as_str()))
        .map(|t| mode.field(&t.key, &t.value))
        .collect();
    if !env_tags.is_empty() {
        out.push_str(&mode.header("Environment", 2));
        out.push_str(&mode.list(&env_tags, false));
    }

    let frames = event.stack_frames();

    let additional = additional_data(event, frames.as_deref().unwrap_or_default());
    if !additional.is_empty() {
        let json = serde_json::to_string_pretty(&additional).unwrap_or_else(|_| "{}".to_string());
        out.push_str(&mode.header("Additional Data", 2));
        out.push_str(&mode.code_block(&json, "json"));
    }

    if let Some(frames) = &frames {
        out.push_str(&render_stack_trace(frames, mode));
    }

    if let Some(user) = &event.user {
        let items = user_fields(user, mode);
        if !items.is_empty() {
            out.push_str(&mode.header("User Information", 2));
            out.push_str(&mode.list(&items, false));
        }
    }

    out
}

/// Merge `context`, `contexts` and `extra` in that order, later keys winning
///
/// Only when all three are empty are the variables of the last frame with a
/// non-empty `vars` map consulted (`vars.context`, `vars.record.context`,
/// `vars.record.extra`).
pub(crate) fn additional_data(event: &Event, frames: &[Frame]) -> Map<String, Value> {
    let mut merged = Map::new();
    for source in [&event.context, &event.contexts, &event.extra]
        .into_iter()
        .flatten()
    {
        merged.extend(source.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    if merged.is_empty() {
        if let Some(vars) = frames
            .iter()
            .rev()
            .find_map(|f| f.vars.as_ref().filter(|v| !v.is_empty()))
        {
            let record = vars.get("record");
            let candidates = [
                vars.get("context"),
                record.and_then(|r| r.get("context")),
                record.and_then(|r| r.get("extra")),
            ];
            for map in candidates.into_iter().flatten().filter_map(Value::as_object) {
                merged.extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
    }

    merged
}

/// Pick the frames worth showing, keeping their original positions
///
/// With any in-app frames, the last five of those; otherwise the last ten.
pub(crate) fn select_frames(frames: &[Frame]) -> Vec<(usize, &Frame)> {
    let has_in_app = frames.iter().any(|f| f.in_app);
    let (selected, limit): (Vec<(usize, &Frame)>, usize) = if has_in_app {
        let in_app = frames.iter().enumerate().filter(|(_, f)| f.in_app);
        (in_app.collect(), IN_APP_FRAME_LIMIT)
    } else {
        (frames.iter().enumerate().collect(), ANY_FRAME_LIMIT)
    };
    let skip = selected.len().saturating_sub(limit);
    selected.into_iter().skip(skip).collect()
}

fn render_stack_trace(frames: &[Frame], mode: OutputMode) -> String {
    let mut out = mode.header("Stack Trace", 2);
    let shown = select_frames(frames);

    let items: Vec<String> = shown
        .iter()
        .map(|(index, frame)| {
            let mut item = format!(
                "{} {}:{} in {}",
                mode.bold(&format!("Frame {}", index + 1)),
                frame.filename.as_deref().unwrap_or("unknown"),
                frame
                    .line_no
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
                frame.function.as_deref().unwrap_or("unknown"),
            );
            if let Some(line) = frame.current_line() {
                item.push_str(&format!("\n  > {}", line.trim()));
            }
            item
        })
        .collect();
    out.push_str(&mode.list(&items, false));

    if shown.len() < frames.len() {
        let which = if frames.iter().any(|f| f.in_app) {
            "in-app frames only"
        } else {
            "most recent frames"
        };
        out.push_str(&format!(
            "Showing {} of {} frames ({})\n\n",
            shown.len(),
            frames.len(),
            which
        ));
    }
    out
}

/// Present user fields only
fn user_fields(user: &EventUser, mode: OutputMode) -> Vec<String> {
    [
        ("ID", &user.id),
        ("Email", &user.email),
        ("Username", &user.username),
        ("IP Address", &user.ip),
    ]
    .into_iter()
    .filter_map(|(label, value)| {
        value
            .as_deref()
            .filter(|v| !v.is_empty())
            .map(|v| mode.field(label, v))
    })
    .collect()
}
