// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Structured environment documents.
//!
//! ```text
//! {
//!   "environment": {
//!     "SHARED_DIR": "d:/shared",                  scalar  -> text / path
//!     "pathlist:PATH": ["$SHARED_DIR/bin", ...]   array   -> path-list
//!   }
//! }
//! ```
//!
//! Keys keep their document order. Sections other than `environment`
//! are ignored, and a missing section reads as empty.

use anyhow::Context;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;
use tracing::debug;

use super::value::RawValue;
use crate::error::{EnvError, EnvResult, Result};

/// Name of the section holding environment entries.
pub const SECTION_ENVIRONMENT: &str = "environment";

/// A parsed environment document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    environment: Environment,
}

/// `environment` section: raw names with their values, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Environment(Vec<(String, RawValue)>);

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a document from `(raw name, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RawValue>,
    {
        let mut document = Self::new();
        for (name, value) in pairs {
            document.push(name, value);
        }
        document
    }

    /// Appends an entry, replacing the value of an identical key.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        let name = name.into();
        let value = value.into();
        match self.environment.0.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.environment.0.push((name, value)),
        }
    }

    /// Entries in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.environment.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.environment.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.environment.0.is_empty()
    }

    /// Parses JSON text; `origin` names the source in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::MalformedDocument`] if the text is not JSON or the
    /// `environment` section is not a map of strings and string arrays.
    pub fn parse(text: &str, origin: &str) -> EnvResult<Self> {
        serde_json::from_str(text).map_err(|e| EnvError::MalformedDocument {
            origin: origin.to_owned(),
            message: e.to_string(),
        })
    }

    /// Reads and parses a document file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is malformed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read document: {}", path.display()))?;
        let document = Self::parse(&text, &path.display().to_string())?;
        debug!(path = %path.display(), count = document.len(), "Document loaded");
        Ok(document)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize document")
    }

    /// Writes the document as JSON, replacing `path` atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut json = self.to_json_pretty()?;
        json.push('\n');
        crate::utility::fs::write_atomic(path, &json)?;
        debug!(path = %path.display(), count = self.len(), "Document saved");
        Ok(())
    }
}

impl Serialize for Environment {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct EnvironmentVisitor;

        impl<'de> Visitor<'de> for EnvironmentVisitor {
            type Value = Environment;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of names to strings or string arrays")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Environment, A::Error> {
                let mut entries: Vec<(String, RawValue)> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, value)) = map.next_entry::<String, RawValue>()? {
                    if entries.iter().any(|(key, _)| *key == name) {
                        return Err(de::Error::custom(format!("duplicate entry '{name}'")));
                    }
                    entries.push((name, value));
                }
                Ok(Environment(entries))
            }
        }

        deserializer.deserialize_map(EnvironmentVisitor)
    }
}
