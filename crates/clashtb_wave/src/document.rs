//! The serialized trace document.
//!
//! A trace file is a JSON object whose `signal` key holds an ordered list of
//! items. An item is a leaf entry (`{"name": .., "wave": .., "data": [..]}`),
//! a named group (a list whose first element is the group label), or an
//! empty spacer object. Every other top-level key (`head`, `config`, ...)
//! and every unknown entry key is carried through unchanged.

use serde_json::{Map, Value as Json};

use clashtb_common::Value;

use crate::error::WaveError;

/// The key holding the item list.
pub const SIGNAL_KEY: &str = "signal";

/// One leaf entry of a trace.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceEntry {
    /// The entry name. Clock tracks may be unnamed.
    pub name: Option<String>,
    /// The compressed wave string.
    pub wave: String,
    /// The compacted data list.
    pub data: Option<Vec<Value>>,
    /// Keys other than `name`, `wave` and `data`, in document order.
    pub extra: Map<String, Json>,
}

impl TraceEntry {
    /// Creates an entry with no extra keys.
    pub fn new(name: Option<String>, wave: impl Into<String>, data: Option<Vec<Value>>) -> Self {
        Self {
            name,
            wave: wave.into(),
            data,
            extra: Map::new(),
        }
    }

    /// Returns `true` if the wave is a clock track.
    pub fn is_clock(&self) -> bool {
        self.wave.chars().any(|c| matches!(c, 'p' | 'P'))
    }

    fn from_json(object: &Map<String, Json>) -> Result<Self, WaveError> {
        let name = match object.get("name") {
            None => None,
            Some(Json::String(name)) => Some(name.clone()),
            Some(other) => return Err(malformed(format!("name must be a string, got {other}"))),
        };
        let wave = match object.get("wave") {
            None => return Err(WaveError::MissingProperty { property: "wave" }),
            Some(Json::String(wave)) => wave.clone(),
            Some(other) => return Err(malformed(format!("wave must be a string, got {other}"))),
        };
        let data = object.get("data").map(data_from_json).transpose()?;
        let extra = object
            .iter()
            .filter(|(key, _)| !matches!(key.as_str(), "name" | "wave" | "data"))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            name,
            wave,
            data,
            extra,
        })
    }

    fn to_json(&self) -> Json {
        let mut object = Map::new();
        if let Some(name) = &self.name {
            object.insert("name".into(), Json::String(name.clone()));
        }
        object.insert("wave".into(), Json::String(self.wave.clone()));
        if let Some(data) = &self.data {
            object.insert(
                "data".into(),
                Json::Array(data.iter().map(value_to_json).collect()),
            );
        }
        for (key, value) in &self.extra {
            object.insert(key.clone(), value.clone());
        }
        Json::Object(object)
    }
}

/// One item of the `signal` list.
#[derive(Clone, Debug, PartialEq)]
pub enum TraceItem {
    /// A leaf entry.
    Entry(TraceEntry),
    /// A labelled group of items.
    Group {
        /// The header label.
        label: String,
        /// The grouped items.
        items: Vec<TraceItem>,
    },
    /// An empty object used as vertical space.
    Spacer,
}

impl TraceItem {
    fn from_json(json: &Json) -> Result<Self, WaveError> {
        match json {
            Json::Object(object) if object.is_empty() => Ok(TraceItem::Spacer),
            Json::Object(object) => Ok(TraceItem::Entry(TraceEntry::from_json(object)?)),
            Json::Array(list) => {
                let (head, rest) = list
                    .split_first()
                    .ok_or_else(|| malformed("group has no label".to_string()))?;
                let label = match head {
                    Json::String(label) => label.clone(),
                    other => return Err(malformed(format!("group label must be a string, got {other}"))),
                };
                let items = rest.iter().map(TraceItem::from_json).collect::<Result<_, _>>()?;
                Ok(TraceItem::Group { label, items })
            }
            other => Err(malformed(format!("expected an object or a list, got {other}"))),
        }
    }

    fn to_json(&self) -> Json {
        match self {
            TraceItem::Entry(entry) => entry.to_json(),
            TraceItem::Group { label, items } => {
                let mut list = Vec::with_capacity(items.len() + 1);
                list.push(Json::String(label.clone()));
                list.extend(items.iter().map(TraceItem::to_json));
                Json::Array(list)
            }
            TraceItem::Spacer => Json::Object(Map::new()),
        }
    }
}

/// A parsed trace file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraceDocument {
    /// The `signal` items in document order.
    pub items: Vec<TraceItem>,
    /// All other top-level keys, in document order.
    pub extra: Map<String, Json>,
}

impl TraceDocument {
    /// Parses a document from JSON text.
    ///
    /// # Errors
    ///
    /// Fails on invalid JSON, a missing `signal` list, or a malformed item.
    pub fn parse(text: &str) -> Result<Self, WaveError> {
        let json: Json = serde_json::from_str(text)?;
        Self::from_json(&json)
    }

    /// Builds a document from a parsed JSON value.
    pub fn from_json(json: &Json) -> Result<Self, WaveError> {
        let object = json
            .as_object()
            .ok_or_else(|| malformed("trace document must be a JSON object".to_string()))?;
        let items = match object.get(SIGNAL_KEY) {
            None => return Err(WaveError::MissingProperty { property: "signal" }),
            Some(Json::Array(items)) => items
                .iter()
                .map(TraceItem::from_json)
                .collect::<Result<_, _>>()?,
            Some(other) => return Err(malformed(format!("signal must be a list, got {other}"))),
        };
        let extra = object
            .iter()
            .filter(|(key, _)| key.as_str() != SIGNAL_KEY)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Ok(Self { items, extra })
    }

    /// Converts the document back to a JSON value, `signal` first.
    pub fn to_json(&self) -> Json {
        let mut object = Map::new();
        object.insert(
            SIGNAL_KEY.into(),
            Json::Array(self.items.iter().map(TraceItem::to_json).collect()),
        );
        for (key, value) in &self.extra {
            object.insert(key.clone(), value.clone());
        }
        Json::Object(object)
    }

    /// Iterates every leaf entry depth-first, in document order.
    pub fn entries(&self) -> Vec<&TraceEntry> {
        let mut out = Vec::new();
        collect_entries(&self.items, &mut out);
        out
    }

    /// Returns the items of the group labelled `label`, searching nested groups.
    pub fn group(&self, label: &str) -> Option<&[TraceItem]> {
        find_group(&self.items, label)
    }

    /// Returns the named entry, searching nested groups.
    pub fn entry_mut(&mut self, name: &str) -> Option<&mut TraceEntry> {
        find_entry_mut(&mut self.items, name)
    }

    /// Inserts `entry` directly after the entry named `anchor`, inside the
    /// same group.
    ///
    /// Hands `entry` back when no entry is named `anchor`.
    pub fn insert_after(&mut self, anchor: &str, entry: TraceEntry) -> Result<(), TraceEntry> {
        insert_after(&mut self.items, anchor, entry)
    }
}

fn collect_entries<'a>(items: &'a [TraceItem], out: &mut Vec<&'a TraceEntry>) {
    for item in items {
        match item {
            TraceItem::Entry(entry) => out.push(entry),
            TraceItem::Group { items, .. } => collect_entries(items, out),
            TraceItem::Spacer => {}
        }
    }
}

fn find_group<'a>(items: &'a [TraceItem], label: &str) -> Option<&'a [TraceItem]> {
    items.iter().find_map(|item| match item {
        TraceItem::Group { label: l, items } if l == label => Some(items.as_slice()),
        TraceItem::Group { items, .. } => find_group(items, label),
        _ => None,
    })
}

fn find_entry_mut<'a>(items: &'a mut [TraceItem], name: &str) -> Option<&'a mut TraceEntry> {
    items.iter_mut().find_map(|item| match item {
        TraceItem::Entry(entry) if entry.name.as_deref() == Some(name) => Some(entry),
        TraceItem::Group { items, .. } => find_entry_mut(items, name),
        _ => None,
    })
}

fn insert_after(
    items: &mut Vec<TraceItem>,
    anchor: &str,
    entry: TraceEntry,
) -> Result<(), TraceEntry> {
    let position = items.iter().position(
        |item| matches!(item, TraceItem::Entry(e) if e.name.as_deref() == Some(anchor)),
    );
    if let Some(position) = position {
        items.insert(position + 1, TraceItem::Entry(entry));
        return Ok(());
    }

    let mut entry = entry;
    for item in items.iter_mut() {
        if let TraceItem::Group { items, .. } = item {
            match insert_after(items, anchor, entry) {
                Ok(()) => return Ok(()),
                Err(back) => entry = back,
            }
        }
    }
    Err(entry)
}

/// Reads a `data` property: a list of scalars, or a whitespace-separated
/// string.
fn data_from_json(json: &Json) -> Result<Vec<Value>, WaveError> {
    match json {
        Json::Array(values) => values.iter().map(value_from_json).collect(),
        Json::String(text) => Ok(text.split_whitespace().map(Value::parse).collect()),
        other => Err(malformed(format!("data must be a list, got {other}"))),
    }
}

fn value_from_json(json: &Json) -> Result<Value, WaveError> {
    match json {
        Json::Number(n) => Ok(match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Text(n.to_string()),
        }),
        Json::String(s) => Ok(Value::Text(s.clone())),
        Json::Bool(b) => Ok(Value::Int(i64::from(*b))),
        other => Err(malformed(format!("unsupported data value {other}"))),
    }
}

/// Writes a value back as JSON. Numeric text (non-integer numbers read from
/// a trace) is written as a JSON number.
fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Int(n) => Json::from(*n),
        Value::Text(s) => match serde_json::from_str::<Json>(s) {
            Ok(Json::Number(n)) => Json::Number(n),
            _ => Json::String(s.clone()),
        },
    }
}

fn malformed(reason: String) -> WaveError {
    WaveError::MalformedEntry { reason }
}
