//! Context extraction across a batch of events
//!
//! Each requested field is resolved per event from an ordered list of
//! sources. The first source that defines the field wins; values are also
//! collected into a sorted set of distinct strings per field.

use std::collections::BTreeSet;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};


/// Where a field value can come from, in lookup order
const SOURCES: [Source; 4] = [
    Source::Contexts,
    Source::Extra,
    Source::Context,
    Source::Root,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    Contexts,
    Extra,
    Context,
    /// The event's own top-level properties
    Root,
}

impl Source {
    /// Value of `field` in this source, if the source defines it
    fn lookup<'a>(self, event: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
        match self {
            Self::Contexts => nested(event, "contexts", field),
            Self::Extra => nested(event, "extra", field),
            Self::Context => nested(event, "context", field),
            Self::Root => event.get(field),
        }
    }
}

fn nested<'a>(event: &'a Map<String, Value>, key: &str, field: &str) -> Option<&'a Value> {
    event.get(key)?.as_object()?.get(field)
}

/// Resolve one field on one event: first defining source wins
pub fn resolve_field<'a>(event: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    SOURCES
        .iter()
        .find_map(|source| source.lookup(event, field))
}

/// String form used for distinct-value sets
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Per-event output record
///
/// `event_id` and `timestamp` come first; resolved fields follow in request
/// order. A requested field with one of those two names replaces the value
/// in place, so every key appears once.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct ExtractedEvent(Map<String, Value>);

impl ExtractedEvent {
    fn new(event_id: Value, timestamp: Value) -> Self {
        let mut record = Map::new();
        record.insert("event_id".to_string(), event_id);
        record.insert("timestamp".to_string(), timestamp);
        Self(record)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Distinct observed values per field, in request order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniqueValues(pub Vec<(String, BTreeSet<String>)>);

impl UniqueValues {
    pub fn get(&self, field: &str) -> Option<&BTreeSet<String>> {
        self.0.iter().find(|(f, _)| f == field).map(|(_, v)| v)
    }
}

impl Serialize for UniqueValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, values) in &self.0 {
            map.serialize_entry(field, values)?;
        }
        map.end()
    }
}

/// Result of [`extract`]
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ExtractionResult {
    pub extracted_data: Vec<ExtractedEvent>,
    pub unique_values: UniqueValues,
    pub total_events: usize,
    pub events_with_data: usize,
}

/// Extract `fields` from every event
///
/// Events that resolve no field are left out of `extracted_data` but still
/// counted in `total_events`. Non-object events resolve nothing.
pub fn extract(events: &[Value], fields: &[String]) -> ExtractionResult {
    let mut requested: Vec<&str> = Vec::with_capacity(fields.len());
    for field in fields {
        if !requested.contains(&field.as_str()) {
            requested.push(field);
        }
    }

    let mut unique: Vec<(String, BTreeSet<String>)> = requested
        .iter()
        .map(|f| (f.to_string(), BTreeSet::new()))
        .collect();
    let mut extracted_data = Vec::new();

    for event in events {
        let Some(event) = event.as_object() else {
            continue;
        };

        let mut resolved = Vec::new();
        for (field, (_, seen)) in requested.iter().zip(unique.iter_mut()) {
            if let Some(value) = resolve_field(event, field) {
                seen.insert(stringify(value));
                resolved.push((field.to_string(), value.clone()));
            }
        }

        if !resolved.is_empty() {
            let mut record = ExtractedEvent::new(
                event
                    .get("eventID")
                    .or_else(|| event.get("id"))
                    .cloned()
                    .unwrap_or(Value::Null),
                event
                    .get("dateCreated")
                    .or_else(|| event.get("timestamp"))
                    .cloned()
                    .unwrap_or(Value::Null),
            );
            record.0.extend(resolved);
            extracted_data.push(record);
        }
    }

    tracing::debug!(
        total = events.len(),
        with_data = extracted_data.len(),
        fields = requested.len(),
        "extracted event context"
    );

    ExtractionResult {
        events_with_data: extracted_data.len(),
        total_events: events.len(),
        extracted_data,
        unique_values: UniqueValues(unique),
    }
}
