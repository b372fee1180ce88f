// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Insertion-ordered collection of entries.
//!
//! ```text
//! set("PATH", "x:/a")               [PATH#1]
//! set("alpha:PATH", "x:/b")         [PATH#1, PATH#2]        re-set appends
//! overwrite("alpha:PATH", "x:/c")   [PATH#1, PATH#2']       same namespaces: replaced
//! ```
//!
//! Loaders are atomic: every entry of a source is validated before any is
//! added, so a failed load leaves the registry untouched.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, trace};

use super::document::Document;
use super::entry::{Entry, Input};
use super::shell::Shell;
use crate::error::{EnvResult, Result};

/// Namespace of entries read from the process environment.
pub const AMBIENT_NAMESPACE: &str = "_environ";

/// Ordered set of entry occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new occurrence for `raw_name`, keeping earlier ones.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::EnvError::TypeInconsistency`] if the entry
    /// cannot be built.
    pub fn set(&mut self, raw_name: &str, value: impl Into<Input>) -> EnvResult<()> {
        let entry = Entry::new(raw_name, value)?;
        self.insert(entry);
        Ok(())
    }

    /// Adds an already built entry.
    pub fn insert(&mut self, entry: Entry) {
        trace!(name = %entry.qualified_name(), "Entry set");
        self.entries.push(entry);
    }

    /// Replaces the occurrences sharing the bare name and namespaces of
    /// `raw_name`, or appends when there are none.
    ///
    /// The replacement takes the position of the first match.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::EnvError::TypeInconsistency`] if the entry
    /// cannot be built.
    pub fn overwrite(&mut self, raw_name: &str, value: impl Into<Input>) -> EnvResult<()> {
        let entry = Entry::new(raw_name, value)?;
        let same = |e: &Entry| e.name() == entry.name() && e.namespaces() == entry.namespaces();

        let Some(first) = self.entries.iter().position(same) else {
            self.insert(entry);
            return Ok(());
        };

        trace!(name = %entry.qualified_name(), "Entry overwritten");
        let mut index = 0;
        self.entries.retain(|e| {
            let keep = index <= first || !same(e);
            index += 1;
            keep
        });
        self.entries[first] = entry;
        Ok(())
    }

    /// Loads every entry of `document`, tagging names with `namespaces`.
    ///
    /// Returns the number of entries added.
    ///
    /// # Errors
    ///
    /// Returns the first entry error; nothing is added in that case.
    pub fn load_mapping(&mut self, document: &Document, namespaces: &[&str]) -> EnvResult<usize> {
        let prefix = namespace_prefix(namespaces);
        let entries = document
            .entries()
            .map(|(name, value)| Entry::new(&format!("{prefix}{name}"), value.clone()))
            .collect::<EnvResult<Vec<_>>>()?;

        let count = entries.len();
        for entry in entries {
            self.insert(entry);
        }
        debug!(namespaces = %prefix, count, "Mapping loaded");
        Ok(count)
    }

    /// Reads a JSON document file and loads it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or holds an
    /// inconsistent entry.
    pub fn load_document(&mut self, path: &Path, namespaces: &[&str]) -> Result<usize> {
        let document = Document::from_file(path)?;
        Ok(self.load_mapping(&document, namespaces)?)
    }

    /// Loads plain `name=value` pairs under [`AMBIENT_NAMESPACE`].
    ///
    /// Pairs are added sorted by name. Names that are empty or contain `:`
    /// cannot be addressed and are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first entry error; nothing is added in that case.
    pub fn load_key_values<I, K, V>(&mut self, source: I) -> EnvResult<usize>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let sorted: BTreeMap<String, String> = source
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| {
                let usable = !k.is_empty() && !k.contains(':');
                if !usable {
                    trace!(name = %k, "Skipping unaddressable variable");
                }
                usable
            })
            .collect();

        let prefix = namespace_prefix(&[AMBIENT_NAMESPACE]);
        let entries = sorted
            .into_iter()
            .map(|(name, value)| Entry::new(&format!("{prefix}{name}"), value))
            .collect::<EnvResult<Vec<_>>>()?;

        let count = entries.len();
        for entry in entries {
            self.insert(entry);
        }
        debug!(count, "Key/value source loaded");
        Ok(count)
    }

    /// Registry holding the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be typed.
    pub fn ambient() -> EnvResult<Self> {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        let mut registry = Self::new();
        registry.load_key_values(vars)?;
        Ok(registry)
    }

    /// Occurrences in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Occurrences of a bare name, in insertion order.
    pub fn occurrences<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Entry> {
        self.entries.iter().filter(move |e| e.name() == name)
    }

    /// Distinct bare names in first-seen order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.entries
            .iter()
            .map(Entry::name)
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// Document form, each occurrence keyed by its qualified name.
    ///
    /// Occurrences with the same qualified name collapse into the last one.
    #[must_use]
    pub fn to_document(&self) -> Document {
        Document::from_pairs(
            self.entries
                .iter()
                .map(|e| (e.qualified_name(), e.value().to_raw())),
        )
    }

    /// Human-readable listing grouped by tag prefix.
    ///
    /// ```text
    /// alpha:path
    ///     - ALPHA_DIR: x:/alpha
    /// alpha:pathlist
    ///     - PATH: $ALPHA_DIR/bin
    /// ```
    ///
    /// Only entries whose bare name passes `filter` are listed.
    #[must_use]
    pub fn listing(&self, filter: impl Fn(&str) -> bool) -> Vec<String> {
        let mut groups: BTreeMap<String, Vec<(&str, String)>> = BTreeMap::new();
        for entry in self.entries.iter().filter(|e| filter(e.name())) {
            groups
                .entry(entry.tag_prefix())
                .or_default()
                .push((entry.name(), entry.value().to_string()));
        }

        let mut lines = Vec::new();
        for (prefix, mut members) in groups {
            members.sort();
            lines.push(prefix);
            lines.extend(
                members
                    .into_iter()
                    .map(|(name, value)| format!("    - {name}: {value}")),
            );
        }
        lines
    }

    /// Renders the registry as a script.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::EnvError::CyclicDependency`] if the entries
    /// reference each other in a cycle.
    pub fn emit(&self, shell: Shell, append_mode: bool) -> EnvResult<String> {
        super::resolve::emit(self, shell, append_mode)
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Sorted namespace tags joined with `:`, with a trailing `:` when non-empty.
fn namespace_prefix(namespaces: &[&str]) -> String {
    let sorted: BTreeSet<String> = namespaces
        .iter()
        .filter(|ns| !ns.is_empty())
        .map(|ns| ns.to_lowercase())
        .collect();
    sorted.into_iter().map(|ns| ns + ":").collect()
}
