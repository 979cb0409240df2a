//! Editable chronograms: a trace document viewed as named signals.
//!
//! A [`Chronogram`] loads a trace file, extracts its non-clock entries as
//! [`Signal`]s, lets callers write modified or new signals back, and saves
//! the document with its layout and extra keys intact. New signals can be
//! positioned after an existing entry by registering a template.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use clashtb_common::Signal;
use tracing::debug;

use crate::codec::{decode_signal, encode_signal, infer_kind};
use crate::document::{TraceDocument, TraceEntry, TraceItem};
use crate::error::WaveError;

/// A trace document plus the placement templates for new signals.
#[derive(Clone, Debug, Default)]
pub struct Chronogram {
    document: TraceDocument,
    templates: BTreeMap<String, String>,
}

impl Chronogram {
    /// Wraps an already-parsed document.
    pub fn new(document: TraceDocument) -> Self {
        Self {
            document,
            templates: BTreeMap::new(),
        }
    }

    /// Parses a chronogram from JSON text.
    pub fn from_json(text: &str) -> Result<Self, WaveError> {
        Ok(Self::new(TraceDocument::parse(text)?))
    }

    /// Reads a chronogram from a trace file.
    pub fn load(path: &Path) -> Result<Self, WaveError> {
        let text = std::fs::read_to_string(path)?;
        let chronogram = Self::from_json(&text)?;
        debug!(
            path = %path.display(),
            entries = chronogram.document.entries().len(),
            "loaded chronogram"
        );
        Ok(chronogram)
    }

    /// Builds a chronogram of `len` steps from labelled signal groups.
    ///
    /// The document starts with an unnamed clock track; each group is
    /// followed by a spacer.
    ///
    /// # Errors
    ///
    /// Fails with [`WaveError::EmptyRun`] if `len` is zero.
    pub fn from_groups<'a, G>(len: usize, groups: G) -> Result<Self, WaveError>
    where
        G: IntoIterator<Item = (&'a str, &'a [Signal])>,
    {
        if len == 0 {
            return Err(WaveError::EmptyRun);
        }
        let mut items = vec![TraceItem::Entry(clock_entry(len))];
        for (label, signals) in groups {
            let entries = signals
                .iter()
                .map(|signal| Ok(TraceItem::Entry(signal_entry(signal)?)))
                .collect::<Result<Vec<_>, WaveError>>()?;
            items.push(TraceItem::Group {
                label: label.to_string(),
                items: entries,
            });
            items.push(TraceItem::Spacer);
        }
        Ok(Self::new(TraceDocument {
            items,
            ..TraceDocument::default()
        }))
    }

    /// The underlying document.
    pub fn document(&self) -> &TraceDocument {
        &self.document
    }

    /// Decodes every named, non-clock entry.
    ///
    /// Each signal's order is its position among the decoded signals.
    ///
    /// # Errors
    ///
    /// Fails on an unnamed non-clock entry, a duplicate name, or an entry
    /// that does not decode.
    pub fn signals(&self) -> Result<Vec<Signal>, WaveError> {
        decode_entries(self.document.entries())
    }

    /// Decodes the named entries of one group, ordered by position.
    pub fn group_signals(&self, label: &str) -> Result<Vec<Signal>, WaveError> {
        let items = self
            .document
            .group(label)
            .ok_or_else(|| WaveError::UnknownGroup(label.to_string()))?;
        let entries = items
            .iter()
            .filter_map(|item| match item {
                TraceItem::Entry(entry) => Some(entry),
                _ => None,
            })
            .collect();
        decode_entries(entries)
    }

    /// Decodes the entry called `name`.
    pub fn signal(&self, name: &str) -> Result<Signal, WaveError> {
        self.signals()?
            .into_iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| WaveError::UnknownSignal(name.to_string()))
    }

    /// Registers placement templates: each new signal name maps to the
    /// existing entry it is inserted after.
    pub fn set_templates<I, K, V>(&mut self, templates: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.templates
            .extend(templates.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Writes signals into the document.
    ///
    /// An existing entry of the same name has its wave and data replaced in
    /// place, keeping its other keys. A new signal is inserted after its
    /// template entry, or appended at the end when it has none.
    ///
    /// # Errors
    ///
    /// Fails if a template names an entry that does not exist.
    pub fn set_signals<'a>(
        &mut self,
        signals: impl IntoIterator<Item = &'a Signal>,
    ) -> Result<(), WaveError> {
        for signal in signals {
            let encoded = encode_signal(signal)?;
            if let Some(entry) = self.document.entry_mut(signal.name()) {
                entry.wave = encoded.wave;
                entry.data = encoded.data;
                continue;
            }

            let entry = TraceEntry::new(Some(signal.name().to_string()), encoded.wave, encoded.data);
            match self.templates.get(signal.name()) {
                Some(template) => {
                    if self.document.insert_after(template, entry).is_err() {
                        return Err(WaveError::UnknownSignal(template.clone()));
                    }
                }
                None => self.document.items.push(TraceItem::Entry(entry)),
            }
        }
        Ok(())
    }

    /// Serializes the document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, WaveError> {
        Ok(serde_json::to_string_pretty(&self.document.to_json())?)
    }

    /// Writes the document to a trace file.
    pub fn save(&self, path: &Path) -> Result<(), WaveError> {
        std::fs::write(path, self.to_json()?)?;
        debug!(path = %path.display(), "saved chronogram");
        Ok(())
    }
}

fn decode_entries(entries: Vec<&TraceEntry>) -> Result<Vec<Signal>, WaveError> {
    let mut seen = HashSet::new();
    let mut signals = Vec::new();
    for entry in entries.into_iter().filter(|e| !e.is_clock()) {
        let name = entry
            .name
            .as_deref()
            .ok_or(WaveError::MissingProperty { property: "name" })?;
        if !seen.insert(name) {
            return Err(WaveError::DuplicateName(name.to_string()));
        }
        let signal = decode_signal(
            name,
            infer_kind(&entry.wave),
            &entry.wave,
            entry.data.as_deref(),
        )?;
        signals.push(signal.with_order(signals.len()));
    }
    Ok(signals)
}

fn clock_entry(len: usize) -> TraceEntry {
    let mut wave = String::from("P");
    wave.extend(std::iter::repeat('.').take(len - 1));
    TraceEntry::new(None, wave, None)
}

fn signal_entry(signal: &Signal) -> Result<TraceEntry, WaveError> {
    let encoded = encode_signal(signal)?;
    Ok(TraceEntry::new(
        Some(signal.name().to_string()),
        encoded.wave,
        encoded.data,
    ))
}
