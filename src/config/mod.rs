// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tool settings.
//!
//! # Settings Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. shellmatic.toml (cwd, optional)
//! 3. --ini FILE...
//! 4. SHELLMATIC_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! SHELLMATIC_OUTPUT__SHELL=sh            → output.shell = "sh"
//! SHELLMATIC_GLOBAL__OUTPUT_LOG_LEVEL=4  → global.output_log_level = 4
//! SHELLMATIC_FILES__RESET=base.json      → files.reset = "base.json"
//! ```

pub mod loader;
pub mod types;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Result;

use loader::SettingsLoader;
use types::{FileSettings, GlobalSettings, OutputSettings};

/// Default settings file looked up in the current directory.
pub const DEFAULT_SETTINGS_FILE: &str = "shellmatic.toml";

/// Prefix of settings environment variables.
pub const ENV_PREFIX: &str = "SHELLMATIC";

/// Complete tool settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Global options.
    pub global: GlobalSettings,
    /// Script output.
    pub output: OutputSettings,
    /// Document locations.
    pub files: FileSettings,
}

impl Settings {
    /// Create a new settings builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use shellmatic::config::Settings;
    ///
    /// let settings = Settings::builder()
    ///     .add_toml_file_optional("shellmatic.toml")
    ///     .with_env_prefix("SHELLMATIC")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> SettingsLoader {
        SettingsLoader::new()
    }

    /// Load settings from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Settings` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load settings from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Settings` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Format settings for display, one `key = value` line each.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_global_options(&mut options);
        self.format_output_options(&mut options);
        self.format_files_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_global_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "global.output_log_level".into(),
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level".into(),
            self.global.file_log_level.as_u8().to_string(),
        );
        if let Some(ref path) = self.global.log_file {
            options.insert("global.log_file".into(), path.display().to_string());
        }
    }

    fn format_output_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("output.shell".into(), self.output.shell.to_string());
        options.insert("output.script".into(), self.output.script.clone());
        options.insert("output.append".into(), self.output.append.to_string());
    }

    fn format_files_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("files.reset".into(), self.files.reset.clone());
        options.insert("files.capture".into(), self.files.capture.clone());
    }
}
