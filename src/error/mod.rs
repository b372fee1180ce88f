// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//! anyhow::Result     commands, loaders, settings (with .context())
//!   ├── EnvError     TypeInconsistency, CyclicDependency,
//!   │                MalformedDocument, ValueRemovalNotFound
//!   ├── ConfigError  InvalidValue
//!   └── FsError      NotFound, PermissionDenied, IoError
//! ```
//!
//! The core (`env`) returns [`EnvResult`] so callers can match on the kind;
//! everything above it adds context and propagates through `anyhow`.
//!
//! A `$NAME` reference to a name that is defined nowhere is not an error:
//! it is left for the target shell to resolve.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type for the environment core.
pub type EnvResult<T> = std::result::Result<T, EnvError>;

// --- Environment Errors ---

/// Errors raised while building, loading or emitting an environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvError {
    /// The tags of an entry name a type that does not fit its value.
    #[error("variable {name} has an inconsistent type: {message}")]
    TypeInconsistency { name: String, message: String },

    /// The dependency sort stopped making progress.
    #[error("cyclic dependency detected: {dependencies} (dependency of {name})")]
    CyclicDependency { name: String, dependencies: String },

    /// A document could not be parsed or has the wrong shape.
    #[error("malformed document '{origin}': {message}")]
    MalformedDocument { origin: String, message: String },

    /// A path was removed from a path-list that does not contain it.
    #[error(
        "while trying to remove value \"{value}\" from path-list:{}",
        format_members(.members)
    )]
    ValueRemovalNotFound { value: String, members: Vec<String> },
}

fn format_members(members: &[String]) -> String {
    members.iter().map(|m| format!("\n  - {m}")).collect()
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Filesystem Errors ---

/// Filesystem operation errors.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(String),

    /// Permission denied.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// General I/O error.
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl FsError {
    /// Classifies an I/O error raised while touching `path`.
    pub fn from_io(path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::IoError { path, source },
        }
    }
}
