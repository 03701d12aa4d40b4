//! Sentry data types
//!
//! Read-only views over API payloads. Every field is optional or defaulted:
//! a missing field is treated as absent, never as an error.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sentry project
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project ID
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    /// Project name
    #[serde(default)]
    pub name: String,
    /// Project slug
    #[serde(default)]
    pub slug: String,
    /// Platform (python, javascript, etc.)
    #[serde(default)]
    pub platform: Option<String>,
    /// Teams owning the project
    #[serde(default, deserialize_with = "lenient::seq")]
    pub teams: Vec<Team>,
    /// Environment names
    #[serde(default)]
    pub environments: Option<Vec<String>>,
    /// Enabled feature flags
    #[serde(default)]
    pub features: Option<Vec<String>>,
}

/// Team reference
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub name: String,
}

/// Sentry issue
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Issue ID
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    /// Short ID (e.g., "PROJECT-123")
    #[serde(default, deserialize_with = "lenient::string")]
    pub short_id: String,
    /// Issue title
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    /// Issue status (unresolved, resolved, ignored)
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
    /// Issue level (error, warning, info)
    #[serde(default, deserialize_with = "lenient::string")]
    pub level: String,
    /// First seen timestamp
    #[serde(default)]
    pub first_seen: Option<String>,
    /// Last seen timestamp
    #[serde(default)]
    pub last_seen: Option<String>,
    /// Number of events
    #[serde(default, deserialize_with = "lenient::string")]
    pub count: String,
    /// Number of affected users
    #[serde(default, deserialize_with = "lenient::string")]
    pub user_count: String,
    /// Culprit (location in code)
    #[serde(default)]
    pub culprit: Option<String>,
    /// Permalink to Sentry UI
    #[serde(default)]
    pub permalink: Option<String>,
    /// Project info
    #[serde(default)]
    pub project: Option<ProjectRef>,
    /// Release the issue first appeared in
    #[serde(default)]
    pub first_release: Option<Release>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub stats: Option<IssueStats>,
}

/// Project info embedded in issues and releases
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectRef {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub platform: Option<String>,
}

/// Release record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub short_version: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub date_released: Option<String>,
    #[serde(default)]
    pub projects: Option<Vec<ProjectRef>>,
}

/// Time-bucketed event counts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueStats {
    /// `(unix seconds, count)` buckets for the last day
    #[serde(rename = "24h", default, deserialize_with = "lenient::seq")]
    pub last_24h: Vec<(i64, u64)>,
}

impl Issue {
    /// 24h buckets, if the payload carried any
    pub fn day_stats(&self) -> Option<&[(i64, u64)]> {
        self.stats
            .as_ref()
            .map(|s| s.last_24h.as_slice())
            .filter(|buckets| !buckets.is_empty())
    }
}

/// Key/value tag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub key: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub value: String,
}

/// Look up a tag value by key
pub fn tag_value<'a>(tags: &'a [Tag], key: &str) -> Option<&'a str> {
    tags.iter()
        .find(|t| t.key == key)
        .map(|t| t.value.as_str())
}

/// Sentry event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    #[serde(rename = "eventID", default, deserialize_with = "lenient::opt_string")]
    pub event_id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default)]
    pub culprit: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub user: Option<EventUser>,
    #[serde(default)]
    pub metadata: Option<EventMetadata>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub context: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub contexts: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub extra: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub entries: Vec<Entry>,
}

impl Event {
    /// `eventID`, falling back to `id`
    pub fn display_id(&self) -> Option<&str> {
        self.event_id.as_deref().or(self.id.as_deref())
    }

    /// Title, falling back to `metadata.title`
    pub fn display_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or_else(|| self.metadata.as_ref().and_then(|m| m.title.as_deref()))
    }

    /// Frames of the first `stacktrace` entry, if it has any
    ///
    /// Frames are decoded one by one so a malformed frame is skipped instead
    /// of discarding the whole trace.
    pub fn stack_frames(&self) -> Option<Vec<Frame>> {
        let entry = self.entries.iter().find(|e| e.kind == "stacktrace")?;
        let frames: Vec<Frame> = entry
            .data
            .get("frames")?
            .as_array()?
            .iter()
            .filter_map(|frame| serde_json::from_value(frame.clone()).ok())
            .collect();
        (!frames.is_empty()).then_some(frames)
    }
}

/// Event metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventMetadata {
    #[serde(default)]
    pub title: Option<String>,
}

/// User info in event
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventUser {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    /// IP address
    #[serde(rename = "ip_address", alias = "ip", default)]
    pub ip: Option<String>,
}

/// Event entry (exception, stacktrace, breadcrumbs, ...)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

/// Stack frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub filename: Option<String>,
    #[serde(default, deserialize_with = "lenient::line_no")]
    pub line_no: Option<u64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub function: Option<String>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub in_app: bool,
    /// Source lines around the frame as `(line number, text)`
    #[serde(default, deserialize_with = "lenient::context_lines")]
    pub context: Vec<ContextLine>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub vars: Option<Map<String, Value>>,
}

/// One `(line number, text)` source line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextLine(pub Option<u64>, pub Option<String>);

impl Frame {
    /// Source line recorded for the frame's own line number
    pub fn current_line(&self) -> Option<&str> {
        let line_no = self.line_no?;
        self.context
            .iter()
            .find(|ContextLine(n, _)| *n == Some(line_no))
            .and_then(|ContextLine(_, text)| text.as_deref())
    }
}

/// Deserializers that degrade odd shapes instead of rejecting the payload
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::{Map, Value};

    use super::ContextLine;

    /// Scalar rendered as a string; null and missing become empty
    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        opt_string(d).map(Option::unwrap_or_default)
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }

    /// List where null counts as empty
    pub fn seq<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<Vec<T>>::deserialize(d).map(Option::unwrap_or_default)
    }

    /// Object, or `None` for anything else
    pub fn object<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Map<String, Value>>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Object(map) => Some(map),
            _ => None,
        })
    }

    /// Positive whole line number; anything else is absent
    pub fn line_no<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
        Ok(Value::deserialize(d)?.as_u64())
    }

    /// `[line, text]` pairs; malformed pairs are skipped
    pub fn context_lines<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<ContextLine>, D::Error> {
        let Value::Array(lines) = Value::deserialize(d)? else {
            return Ok(Vec::new());
        };
        Ok(lines
            .iter()
            .filter_map(|line| match line.as_array()?.as_slice() {
                [number, text, ..] => Some(ContextLine(
                    number.as_u64(),
                    text.as_str().map(str::to_string),
                )),
                _ => None,
            })
            .collect())
    }

    /// Boolean where anything but `true` is false
    pub fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(matches!(Value::deserialize(d)?, Value::Bool(true)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn project_accepts_numeric_id() {
        let project: Project = serde_json::from_value(json!({
            "id": 42,
            "name": "Demo",
            "slug": "demo",
            "teams": null
        }))
        .unwrap();
        assert_eq!(project.id, "42");
        assert!(project.teams.is_empty());
        assert!(project.platform.is_none());
    }

    #[test]
    fn issue_parses_stats_and_release() {
        let issue: Issue = serde_json::from_value(json!({
            "id": "1",
            "shortId": "DEMO-1",
            "title": "boom",
            "count": "12",
            "userCount": 3,
            "firstRelease": {"version": "1.0.0", "projects": [{"name": "Demo", "slug": "demo"}]},
            "stats": {"24h": [[1000, 5], [2000, 3]]}
        }))
        .unwrap();
        assert_eq!(issue.user_count, "3");
        assert_eq!(issue.day_stats(), Some(&[(1000, 5), (2000, 3)][..]));
        let release = issue.first_release.unwrap();
        assert_eq!(release.projects.unwrap()[0].slug, "demo");
    }

    #[test]
    fn issue_empty_stats_are_absent() {
        let issue: Issue = serde_json::from_value(json!({"stats": {"24h": []}})).unwrap();
        assert!(issue.day_stats().is_none());
    }

    #[test]
    fn event_ids_and_title_fallbacks() {
        let event: Event = serde_json::from_value(json!({
            "id": "internal",
            "eventID": "abc123",
            "metadata": {"title": "From metadata"}
        }))
        .unwrap();
        assert_eq!(event.display_id(), Some("abc123"));
        assert_eq!(event.display_title(), Some("From metadata"));
    }

    #[test]
    fn event_non_object_context_is_ignored() {
        let event: Event = serde_json::from_value(json!({
            "context": "oops",
            "extra": {"a": 1}
        }))
        .unwrap();
        assert!(event.context.is_none());
        assert_eq!(event.extra.unwrap()["a"], json!(1));
    }

    #[test]
    fn user_ip_address_field() {
        let user: EventUser =
            serde_json::from_value(json!({"id": 7, "ip_address": "10.0.0.1"})).unwrap();
        assert_eq!(user.id.as_deref(), Some("7"));
        assert_eq!(user.ip.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn stack_frames_from_stacktrace_entry() {
        let event: Event = serde_json::from_value(json!({
            "entries": [
                {"type": "message", "data": {"formatted": "hi"}},
                {"type": "stacktrace", "data": {"frames": [
                    {"filename": "app.py", "lineNo": 3, "inApp": true,
                     "context": [[2, "a = 1"], [3, "raise Boom"]]},
                    {"filename": "lib.py", "lineNo": 9, "inApp": null}
                ]}}
            ]
        }))
        .unwrap();
        let frames = event.stack_frames().unwrap();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].in_app);
        assert!(!frames[1].in_app);
        assert_eq!(frames[0].current_line(), Some("raise Boom"));
        assert_eq!(frames[1].current_line(), None);
    }

    #[test]
    fn stack_frames_absent_without_entry() {
        let event = Event::default();
        assert!(event.stack_frames().is_none());
    }

    #[test]
    fn odd_frame_values_degrade_per_field() {
        let event: Event = serde_json::from_value(json!({
            "entries": [{"type": "stacktrace", "data": {"frames": [
                {"filename": "a.py", "lineNo": 3, "inApp": true},
                {"filename": "b.py", "lineNo": -1, "inApp": true},
                {"filename": "c.py", "lineNo": 2.5, "context": [[2, "x", "extra"], "junk", [3]]},
                "not a frame"
            ]}}]
        }))
        .unwrap();
        let frames = event.stack_frames().unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].line_no, Some(3));
        assert_eq!(frames[1].filename.as_deref(), Some("b.py"));
        assert_eq!(frames[1].line_no, None);
        assert_eq!(frames[2].line_no, None);
        assert_eq!(frames[2].context, vec![ContextLine(Some(2), Some("x".to_string()))]);
    }

    #[test]
    fn stack_frames_absent_when_none_decode() {
        let event: Event = serde_json::from_value(json!({
            "entries": [{"type": "stacktrace", "data": {"frames": ["x", 1]}}]
        }))
        .unwrap();
        assert!(event.stack_frames().is_none());

        let event: Event = serde_json::from_value(json!({
            "entries": [{"type": "stacktrace", "data": {"frames": []}}]
        }))
        .unwrap();
        assert!(event.stack_frames().is_none());
    }

    #[test]
    fn tag_value_lookup() {
        let tags = vec![
            Tag {
                key: "level".to_string(),
                value: "error".to_string(),
            },
            Tag {
                key: "environment".to_string(),
                value: "prod".to_string(),
            },
        ];
        assert_eq!(tag_value(&tags, "environment"), Some("prod"));
        assert_eq!(tag_value(&tags, "release"), None);
    }
}
