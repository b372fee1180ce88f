// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Named, typed environment entries.
//!
//! ```text
//! "alpha:pathlist:PATH" ──split_name──> tags {alpha, pathlist}, name PATH
//!                                          |
//!             type tag present? ──no──> WELL_KNOWN[name] / list-like? / path
//!                                          |
//!                       Entry { name, kind, modifiers, namespaces, value }
//! ```

use std::collections::BTreeSet;
use std::fmt;

use super::shell::{REFERENCE, Shell};
use super::types::{Modifiers, ValueKind};
use super::value::{PathListValue, PathValue, RawValue, RenderMode, TextValue, Value};
use crate::error::{EnvError, EnvResult};

/// Well-known variables and how they are typed when untagged.
pub const WELL_KNOWN: &[(&str, ValueKind, Modifiers)] = &[
    ("TERM", ValueKind::Text, Modifiers::empty()),
    ("PROMPT", ValueKind::Text, Modifiers::NODEP),
    ("HOME", ValueKind::Text, Modifiers::empty()),
    ("PATH", ValueKind::PathList, Modifiers::empty()),
    // Linux
    ("LD_LIBRARY_PATH", ValueKind::PathList, Modifiers::empty()),
    // Windows
    ("COMPUTERNAME", ValueKind::Text, Modifiers::empty()),
    ("NUMBER_OF_PROCESSORS", ValueKind::Text, Modifiers::empty()),
    ("PROCESSOR_ARCHITECTURE", ValueKind::Text, Modifiers::empty()),
    ("PROCESSOR_IDENTIFIER", ValueKind::Text, Modifiers::empty()),
    ("PROCESSOR_LEVEL", ValueKind::Text, Modifiers::empty()),
    ("PROCESSOR_REVISION", ValueKind::Text, Modifiers::empty()),
    ("OS", ValueKind::Text, Modifiers::empty()),
    ("USERNAME", ValueKind::Text, Modifiers::empty()),
    ("USERDOMAIN", ValueKind::Text, Modifiers::empty()),
    ("PATHEXT", ValueKind::Text, Modifiers::empty()),
    ("VIRTUALENV", ValueKind::Text, Modifiers::empty()),
    // Python
    ("PYTHONPATH", ValueKind::PathList, Modifiers::empty()),
];

/// Value handed to [`Entry::new`]: raw document data or an already typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Raw(RawValue),
    Typed(Value),
}

impl From<RawValue> for Input {
    fn from(value: RawValue) -> Self {
        Self::Raw(value)
    }
}

impl From<&str> for Input {
    fn from(value: &str) -> Self {
        Self::Raw(value.into())
    }
}

impl From<String> for Input {
    fn from(value: String) -> Self {
        Self::Raw(value.into())
    }
}

impl From<Vec<String>> for Input {
    fn from(value: Vec<String>) -> Self {
        Self::Raw(value.into())
    }
}

impl From<&[&str]> for Input {
    fn from(value: &[&str]) -> Self {
        Self::Raw(value.into())
    }
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Self::Typed(value)
    }
}

impl From<TextValue> for Input {
    fn from(value: TextValue) -> Self {
        Self::Typed(value.into())
    }
}

impl From<PathValue> for Input {
    fn from(value: PathValue) -> Self {
        Self::Typed(value.into())
    }
}

impl From<PathListValue> for Input {
    fn from(value: PathListValue) -> Self {
        Self::Typed(value.into())
    }
}

/// Splits `tag1:tag2:NAME` into lower-cased tags and the bare name.
#[must_use]
pub fn split_name(raw: &str) -> (BTreeSet<String>, String) {
    match raw.rsplit_once(':') {
        Some((prefix, name)) => {
            let tags = prefix
                .split(':')
                .filter(|tag| !tag.is_empty())
                .map(str::to_lowercase)
                .collect();
            (tags, name.to_owned())
        }
        None => (BTreeSet::new(), raw.to_owned()),
    }
}

/// Kind and modifiers listed in [`WELL_KNOWN`] for `name`.
#[must_use]
pub fn well_known(name: &str) -> Option<(ValueKind, Modifiers)> {
    WELL_KNOWN
        .iter()
        .find(|(known, _, _)| *known == name)
        .map(|(_, kind, modifiers)| (*kind, *modifiers))
}

/// Default kind and modifiers for an untagged entry.
#[must_use]
pub fn infer_kind(name: &str, raw: &RawValue) -> (ValueKind, Modifiers) {
    if let Some(known) = well_known(name) {
        return known;
    }
    if raw.is_list_like() {
        (ValueKind::PathList, Modifiers::empty())
    } else {
        (ValueKind::Path, Modifiers::empty())
    }
}

/// A named environment entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    kind: ValueKind,
    modifiers: Modifiers,
    namespaces: BTreeSet<String>,
    value: Value,
}

impl Entry {
    /// Builds an entry from a possibly tagged name.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::TypeInconsistency`] if more than one type tag is
    /// given or the tagged type does not fit the value.
    pub fn new(raw_name: &str, input: impl Into<Input>) -> EnvResult<Self> {
        let (tags, name) = split_name(raw_name);

        let mut kind = None;
        let mut modifiers = Modifiers::empty();
        let mut namespaces = BTreeSet::new();
        for tag in tags {
            if let Some(tagged) = ValueKind::from_tag(&tag) {
                if let Some(previous) = kind.replace(tagged) {
                    return Err(EnvError::TypeInconsistency {
                        name,
                        message: format!("both '{previous}' and '{tagged}' are declared"),
                    });
                }
            } else if let Some(modifier) = Modifiers::from_tag(&tag) {
                modifiers |= modifier;
            } else {
                namespaces.insert(tag);
            }
        }

        let (kind, value) = match (kind, input.into()) {
            (Some(kind), Input::Typed(value)) => {
                if value.kind() != kind {
                    return Err(EnvError::TypeInconsistency {
                        name,
                        message: format!("declared as '{kind}' but holds a {} value", value.kind()),
                    });
                }
                (kind, value)
            }
            (None, Input::Typed(value)) => {
                if let Some((_, defaults)) = well_known(&name) {
                    modifiers |= defaults;
                }
                (value.kind(), value)
            }
            (Some(kind), Input::Raw(raw)) => (kind, Value::from_raw(&name, kind, &raw)?),
            (None, Input::Raw(raw)) => {
                let (kind, defaults) = infer_kind(&name, &raw);
                modifiers |= defaults;
                (kind, Value::from_raw(&name, kind, &raw)?)
            }
        };

        Ok(Self {
            name,
            kind,
            modifiers,
            namespaces,
            value,
        })
    }

    /// Bare name, without tags.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    #[must_use]
    pub const fn is_nodep(&self) -> bool {
        self.modifiers.contains(Modifiers::NODEP)
    }

    /// Namespace tags (e.g. a project name).
    #[must_use]
    pub const fn namespaces(&self) -> &BTreeSet<String> {
        &self.namespaces
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    pub const fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    /// Every tag of the entry: type, modifiers and namespaces.
    #[must_use]
    pub fn tags(&self) -> BTreeSet<String> {
        let mut tags = self.namespaces.clone();
        tags.insert(self.kind.as_str().to_owned());
        tags.extend(self.modifiers.tags().map(str::to_owned));
        tags
    }

    /// Sorted tags joined with `:`.
    #[must_use]
    pub fn tag_prefix(&self) -> String {
        self.tags().into_iter().collect::<Vec<_>>().join(":")
    }

    /// `tag:...:NAME`, the inverse of [`split_name`].
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.tag_prefix(), self.name)
    }

    /// Upper-cased names referenced by `$NAME` in the value.
    ///
    /// Entries tagged `nodep` have no dependencies.
    #[must_use]
    pub fn dependencies(&self) -> BTreeSet<String> {
        if self.is_nodep() {
            return BTreeSet::new();
        }
        self.value
            .as_list()
            .iter()
            .flat_map(|item| {
                REFERENCE
                    .captures_iter(item)
                    .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_uppercase()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Assignment line for this entry.
    ///
    /// With `append` the line extends the variable's current value.
    #[must_use]
    pub fn render(&self, shell: Shell, append: bool) -> String {
        let mode = if self.is_nodep() {
            RenderMode::Verbatim
        } else {
            RenderMode::Platformize
        };
        let value = self.value.render(shell, mode);
        if append {
            shell.append(&self.name, &value)
        } else {
            shell.assignment(&self.name, &value)
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}
