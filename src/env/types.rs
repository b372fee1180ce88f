// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Types for entry classification.
//!
//! ```text
//! ValueKind:  Text | Path | PathList      closed, exactly one per entry
//! Modifiers:  NODEP                       processing switches
//! namespaces: BTreeSet<String>            presentation only
//! ```

use bitflags::bitflags;
use std::fmt;

/// Kind of value an entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueKind {
    Text,
    Path,
    PathList,
}

impl ValueKind {
    /// Tag spelling of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Path => "path",
            Self::PathList => "pathlist",
        }
    }

    /// Parses a type tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "text" => Some(Self::Text),
            "path" => Some(Self::Path),
            "pathlist" => Some(Self::PathList),
            _ => None,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Flags modifying how an entry is processed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// References are neither tracked as dependencies nor rewritten.
        const NODEP = 0x01;
    }
}

impl Modifiers {
    /// Tag spellings of the modifiers.
    pub const TAGS: &'static [(&'static str, Self)] = &[("nodep", Self::NODEP)];

    /// Parses a single modifier tag.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::TAGS
            .iter()
            .find(|(name, _)| *name == tag)
            .map(|(_, flag)| *flag)
    }

    /// Tag spellings of the set modifiers.
    pub fn tags(self) -> impl Iterator<Item = &'static str> {
        Self::TAGS
            .iter()
            .filter(move |(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
    }
}
