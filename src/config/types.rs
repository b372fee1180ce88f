// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Settings sections.
//!
//! ```text
//! [global]  output_log_level, file_log_level, log_file
//! [output]  shell (batch|sh), script, append
//! [files]   reset, capture
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::env::{PathValue, Shell};
use crate::logging::LogLevel;

/// Global options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalSettings {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Path to log file; no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// Where and how the emitted script is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    /// Target shell dialect.
    pub shell: Shell,
    /// Script path; `$NAME` references are expanded on use.
    pub script: String,
    /// Path-lists extend the current value even on first occurrence.
    pub append: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            shell: Shell::Batch,
            script: "$TEMP/.shellmatic.bat".to_string(),
            append: false,
        }
    }
}

impl OutputSettings {
    /// Script path with references resolved against the process environment.
    #[must_use]
    pub fn script_path(&self) -> PathBuf {
        PathBuf::from(PathValue::new(&self.script).expanded())
    }
}

/// Documents read and written by the commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileSettings {
    /// Base document loaded by `reset`.
    pub reset: String,
    /// Where `capture` saves the ambient environment.
    pub capture: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            reset: "reset.json".to_string(),
            capture: "$APPDATA/.shellmatic.json".to_string(),
        }
    }
}

impl FileSettings {
    #[must_use]
    pub fn reset_path(&self) -> PathBuf {
        PathBuf::from(PathValue::new(&self.reset).expanded())
    }

    #[must_use]
    pub fn capture_path(&self) -> PathBuf {
        PathBuf::from(PathValue::new(&self.capture).expanded())
    }
}
