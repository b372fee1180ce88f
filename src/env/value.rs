// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Typed values: text, path and path-list.
//!
//! ```text
//! raw input ──> Value::from_raw(kind, RawValue)
//!                 Text      verbatim
//!                 Path      '\' -> '/', trimmed, trailing '/' stripped
//!                 PathList  split on ';', empties dropped, deduplicated
//!
//! comparison key:  Text = text, Path = lower-case path, PathList = [keys]
//! render(shell, mode):
//!   Expand       resolve $NAME from the process environment
//!   Verbatim     no reference rewriting (nodep)
//!   Platformize  native separators, case-folded, $NAME -> %NAME% / ${NAME}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;

use super::shell::{Shell, expand_references, process_lookup};
use super::types::ValueKind;
use crate::error::{EnvError, EnvResult, Result};

/// Separator between the members of a path-list in stored documents.
pub const LIST_SEPARATOR: char = ';';

/// How references inside a value are treated when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Substitute references with their live values.
    Expand,
    /// Keep references exactly as written.
    Verbatim,
    /// Rewrite references into the target shell's syntax.
    Platformize,
}

/// Untyped value as it appears in a document: a string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Scalar(String),
    List(Vec<String>),
}

impl RawValue {
    /// Returns true if the value looks like a list of paths.
    #[must_use]
    pub fn is_list_like(&self) -> bool {
        match self {
            Self::Scalar(s) => s.contains(LIST_SEPARATOR),
            Self::List(_) => true,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_owned())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<&[&str]> for RawValue {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(|s| (*s).to_owned()).collect())
    }
}

// --- Text ---

/// Opaque text without path semantics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextValue {
    text: String,
}

impl TextValue {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn as_list(&self) -> Vec<String> {
        vec![self.text.clone()]
    }

    #[must_use]
    pub fn render(&self, shell: Shell, mode: RenderMode) -> String {
        match mode {
            RenderMode::Expand => shell
                .escape(&expand_references(&self.text, &process_lookup))
                .into_owned(),
            RenderMode::Verbatim => shell.escape(&self.text).into_owned(),
            RenderMode::Platformize => shell.platformize(&self.text),
        }
    }

    pub fn expand_with(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        self.text = expand_references(&self.text, lookup);
    }
}

impl fmt::Display for TextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// --- Path ---

/// A single filesystem path, stored with forward slashes.
///
/// Equality, ordering and hashing use the case-folded form.
#[derive(Debug, Clone)]
pub struct PathValue {
    path: String,
}

impl PathValue {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self {
            path: standardize(raw),
        }
    }

    /// Stored form, case preserved.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Canonical comparison key.
    #[must_use]
    pub fn key(&self) -> String {
        self.path.to_lowercase()
    }

    #[must_use]
    pub fn as_list(&self) -> Vec<String> {
        vec![self.key()]
    }

    #[must_use]
    pub fn render(&self, shell: Shell, mode: RenderMode) -> String {
        let separator = shell.path_separator();
        match mode {
            RenderMode::Expand => {
                let expanded = expand_references(&self.path, &process_lookup);
                shell.escape(&normalize(&expanded, separator)).into_owned()
            }
            RenderMode::Verbatim => shell.escape(&normalize(&self.path, separator)).into_owned(),
            RenderMode::Platformize => {
                let native = normalize(&self.path, separator);
                if shell.folds_case() {
                    shell.platformize(&native.to_lowercase())
                } else {
                    shell.platformize(&native)
                }
            }
        }
    }

    pub fn expand_with(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        self.path = standardize(&expand_references(&self.path, lookup));
    }

    /// The path with references resolved against the process environment.
    #[must_use]
    pub fn expanded(&self) -> String {
        expand_references(&self.path, &process_lookup)
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        Path::new(&self.expanded()).is_dir()
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        Path::new(&self.expanded()).is_file()
    }

    /// Writes `contents` to the expanded path, replacing it atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory or the file cannot be written.
    pub fn create_file(&self, contents: &str) -> Result<()> {
        crate::utility::fs::write_atomic(Path::new(&self.expanded()), contents)
    }
}

impl PartialEq for PathValue {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for PathValue {}

impl Hash for PathValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for PathValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PathValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for PathValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

// --- PathList ---

/// Ordered, duplicate-free sequence of paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathListValue {
    paths: Vec<PathValue>,
}

impl PathListValue {
    /// Splits a `;`-joined string into a path-list.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::from_paths(raw.split(LIST_SEPARATOR))
    }

    /// Builds a path-list from individual paths.
    ///
    /// Empty members are dropped and the first occurrence of a path wins.
    pub fn from_paths<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::default();
        for item in items {
            list.push(PathValue::new(item.as_ref()));
        }
        list
    }

    /// Appends `path` unless it is empty or already present.
    pub fn push(&mut self, path: PathValue) -> bool {
        if path.as_str().is_empty() || self.paths.contains(&path) {
            return false;
        }
        self.paths.push(path);
        true
    }

    #[must_use]
    pub fn paths(&self) -> &[PathValue] {
        &self.paths
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    #[must_use]
    pub fn contains(&self, path: &PathValue) -> bool {
        self.paths.contains(path)
    }

    #[must_use]
    pub fn as_list(&self) -> Vec<String> {
        self.paths.iter().map(PathValue::key).collect()
    }

    #[must_use]
    pub fn render(&self, shell: Shell, mode: RenderMode) -> String {
        self.paths
            .iter()
            .map(|p| p.render(shell, mode))
            .collect::<Vec<_>>()
            .join(shell.list_separator())
    }

    /// Removes `path` from the list.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::ValueRemovalNotFound`] listing the current members
    /// if `path` is not in the list.
    pub fn remove(&mut self, path: &PathValue) -> EnvResult<()> {
        match self.paths.iter().position(|p| p == path) {
            Some(index) => {
                self.paths.remove(index);
                Ok(())
            }
            None => Err(EnvError::ValueRemovalNotFound {
                value: path.to_string(),
                members: self.paths.iter().map(ToString::to_string).collect(),
            }),
        }
    }

    pub fn expand_with(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        let expanded: Vec<String> = self
            .paths
            .iter()
            .map(|p| expand_references(p.as_str(), lookup))
            .collect();
        *self = Self::from_paths(expanded);
    }
}

impl fmt::Display for PathListValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .paths
            .iter()
            .map(PathValue::as_str)
            .collect::<Vec<_>>()
            .join(&LIST_SEPARATOR.to_string());
        f.write_str(&joined)
    }
}

// --- Value ---

/// A typed value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Text(TextValue),
    Path(PathValue),
    PathList(PathListValue),
}

impl Value {
    /// Builds a value of `kind` from its raw document form.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::TypeInconsistency`] when a list is given for a
    /// scalar kind.
    pub fn from_raw(name: &str, kind: ValueKind, raw: &RawValue) -> EnvResult<Self> {
        match (kind, raw) {
            (ValueKind::Text, RawValue::Scalar(s)) => Ok(Self::Text(TextValue::new(s.clone()))),
            (ValueKind::Path, RawValue::Scalar(s)) => Ok(Self::Path(PathValue::new(s))),
            (ValueKind::PathList, RawValue::Scalar(s)) => {
                Ok(Self::PathList(PathListValue::parse(s)))
            }
            (ValueKind::PathList, RawValue::List(items)) => {
                Ok(Self::PathList(PathListValue::from_paths(items)))
            }
            (ValueKind::Text | ValueKind::Path, RawValue::List(items)) => {
                Err(EnvError::TypeInconsistency {
                    name: name.to_owned(),
                    message: format!(
                        "a list of {} item(s) cannot be stored as {kind}",
                        items.len()
                    ),
                })
            }
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Path(_) => ValueKind::Path,
            Self::PathList(_) => ValueKind::PathList,
        }
    }

    /// Flat list of strings scanned for references.
    #[must_use]
    pub fn as_list(&self) -> Vec<String> {
        match self {
            Self::Text(v) => v.as_list(),
            Self::Path(v) => v.as_list(),
            Self::PathList(v) => v.as_list(),
        }
    }

    #[must_use]
    pub fn render(&self, shell: Shell, mode: RenderMode) -> String {
        match self {
            Self::Text(v) => v.render(shell, mode),
            Self::Path(v) => v.render(shell, mode),
            Self::PathList(v) => v.render(shell, mode),
        }
    }

    /// Resolves references in place against the process environment.
    pub fn expand(&mut self) {
        self.expand_with(&process_lookup);
    }

    /// Resolves references in place using `lookup`.
    pub fn expand_with(&mut self, lookup: &dyn Fn(&str) -> Option<String>) {
        match self {
            Self::Text(v) => v.expand_with(lookup),
            Self::Path(v) => v.expand_with(lookup),
            Self::PathList(v) => v.expand_with(lookup),
        }
    }

    /// Document form: a scalar for text and path, a list for path-lists.
    #[must_use]
    pub fn to_raw(&self) -> RawValue {
        match self {
            Self::Text(v) => RawValue::Scalar(v.as_str().to_owned()),
            Self::Path(v) => RawValue::Scalar(v.as_str().to_owned()),
            Self::PathList(v) => {
                RawValue::List(v.paths().iter().map(|p| p.as_str().to_owned()).collect())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(v) => fmt::Display::fmt(v, f),
            Self::Path(v) => fmt::Display::fmt(v, f),
            Self::PathList(v) => fmt::Display::fmt(v, f),
        }
    }
}

impl From<TextValue> for Value {
    fn from(value: TextValue) -> Self {
        Self::Text(value)
    }
}

impl From<PathValue> for Value {
    fn from(value: PathValue) -> Self {
        Self::Path(value)
    }
}

impl From<PathListValue> for Value {
    fn from(value: PathListValue) -> Self {
        Self::PathList(value)
    }
}

// --- Path helpers ---

/// Stored form of a path: forward slashes, no surrounding whitespace,
/// no trailing separators (a lone root is kept).
fn standardize(raw: &str) -> String {
    let unified = raw.replace('\\', "/");
    let trimmed = unified.trim();
    let stripped = trimmed.trim_end_matches(|c: char| c == '/' || c.is_whitespace());
    if stripped.is_empty() && trimmed.starts_with('/') {
        "/".to_owned()
    } else {
        stripped.to_owned()
    }
}

/// Collapses `.`, `..` and repeated separators, then joins with `separator`.
///
/// A leading drive (`x:`) and a leading root are preserved; `..` never
/// climbs above the root. The empty path stays empty.
pub(crate) fn normalize(path: &str, separator: char) -> String {
    if path.is_empty() {
        return String::new();
    }
    let unified = path.replace('\\', "/");

    let (drive, rest) = match unified.as_bytes() {
        [letter, b':', ..] if letter.is_ascii_alphabetic() => unified.split_at(2),
        _ => ("", unified.as_str()),
    };
    let leading = rest.len() - rest.trim_start_matches('/').len();
    let root: String = if drive.is_empty() && leading >= 2 {
        std::iter::repeat_n(separator, 2).collect()
    } else if leading > 0 {
        separator.to_string()
    } else {
        String::new()
    };

    let mut parts: Vec<&str> = Vec::new();
    for part in rest.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if !root.is_empty() => {}
                _ => parts.push(".."),
            },
            _ => parts.push(part),
        }
    }

    let joined = parts.join(&separator.to_string());
    let result = format!("{drive}{root}{joined}");
    if result.is_empty() {
        ".".to_owned()
    } else {
        result
    }
}
