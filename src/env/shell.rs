// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Target shell dialects.
//!
//! ```text
//!              Batch (cmd.exe)            Sh (POSIX)
//! set          set NAME=value             export NAME="value"
//! append       set NAME=%NAME%;value      export NAME="${NAME}:value"
//! reference    %NAME%                     ${NAME}
//! path sep     \                          /
//! list sep     ;                          :
//! case-fold    yes                        no
//! ```
//!
//! The dialect only decides how values are written out. Reference
//! detection (`$NAME`) and dependency ordering never depend on it.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::LazyLock;

use crate::error::ConfigError;

/// `$NAME` references: the dependency contract of the whole crate.
pub(crate) static REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\w+)").expect("invalid reference regex"));

/// `$NAME` and `${NAME}` references, as understood when expanding
/// against a live environment.
static EXPANSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$(\w+|\{[^}]*\})").expect("invalid expansion regex"));

/// Shell syntax used to render assignment lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shell {
    /// Windows batch files (`set NAME=value`).
    #[default]
    Batch,
    /// POSIX shells (`export NAME="value"`).
    Sh,
}

impl Shell {
    /// Name used in settings and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Batch => "batch",
            Self::Sh => "sh",
        }
    }

    /// Directory separator in rendered paths.
    #[must_use]
    pub const fn path_separator(self) -> char {
        match self {
            Self::Batch => '\\',
            Self::Sh => '/',
        }
    }

    /// Separator between the members of a rendered path-list.
    #[must_use]
    pub const fn list_separator(self) -> &'static str {
        match self {
            Self::Batch => ";",
            Self::Sh => ":",
        }
    }

    /// Whether rendered paths are lower-cased.
    #[must_use]
    pub const fn folds_case(self) -> bool {
        matches!(self, Self::Batch)
    }

    /// Reference to the current value of `name` in this shell.
    #[must_use]
    pub fn reference(self, name: &str) -> String {
        match self {
            Self::Batch => format!("%{name}%"),
            Self::Sh => format!("${{{name}}}"),
        }
    }

    /// Escapes literal text so the shell reproduces it unchanged.
    #[must_use]
    pub fn escape(self, literal: &str) -> Cow<'_, str> {
        match self {
            Self::Batch => Cow::Borrowed(literal),
            Self::Sh => {
                if !literal.contains(['\\', '"', '$', '`']) {
                    return Cow::Borrowed(literal);
                }
                let mut escaped = String::with_capacity(literal.len() + 4);
                for c in literal.chars() {
                    if matches!(c, '\\' | '"' | '$' | '`') {
                        escaped.push('\\');
                    }
                    escaped.push(c);
                }
                Cow::Owned(escaped)
            }
        }
    }

    /// Rewrites every `$NAME` into this shell's reference syntax,
    /// upper-casing the name. Text between references is escaped.
    #[must_use]
    pub fn platformize(self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in REFERENCE.captures_iter(text) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            out.push_str(&self.escape(&text[last..whole.start()]));
            out.push_str(&self.reference(&name.as_str().to_uppercase()));
            last = whole.end();
        }
        out.push_str(&self.escape(&text[last..]));
        out
    }

    /// Line that sets `name` to `value`.
    #[must_use]
    pub fn assignment(self, name: &str, value: &str) -> String {
        match self {
            Self::Batch => format!("set {name}={value}"),
            Self::Sh => format!("export {name}=\"{value}\""),
        }
    }

    /// Line that extends the current value of `name` with `value`.
    #[must_use]
    pub fn append(self, name: &str, value: &str) -> String {
        let current = self.reference(name);
        let separator = self.list_separator();
        match self {
            Self::Batch => format!("set {name}={current}{separator}{value}"),
            Self::Sh => format!("export {name}=\"{current}{separator}{value}\""),
        }
    }
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Shell {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "batch" | "bat" | "cmd" => Ok(Self::Batch),
            "sh" | "bash" | "posix" => Ok(Self::Sh),
            _ => Err(ConfigError::InvalidValue {
                section: "output".to_string(),
                key: "shell".to_string(),
                message: format!("expected 'batch' or 'sh', got '{s}'"),
            }),
        }
    }
}

/// Expands `$NAME` and `${NAME}` references using `lookup`.
///
/// References `lookup` cannot resolve are kept as written.
pub fn expand_references(text: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    EXPANSION
        .replace_all(text, |caps: &Captures<'_>| {
            let whole = caps.get(0).map_or("", |m| m.as_str());
            let name = caps.get(1).map_or("", |m| m.as_str());
            let name = name
                .strip_prefix('{')
                .and_then(|n| n.strip_suffix('}'))
                .unwrap_or(name);
            lookup(name).unwrap_or_else(|| whole.to_owned())
        })
        .into_owned()
}

/// Looks `name` up in the current process environment.
#[must_use]
pub fn process_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
