// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Layering of `shellmatic.toml`, `--ini` files, `SHELLMATIC_*` variables
//! and command-line overrides into one [`Settings`].
//!
//! ```text
//! SettingsLoader::new()
//!   .add_toml_file_optional("shellmatic.toml")   skipped when absent
//!   .add_toml_file(ini)...                       --ini, must exist
//!   .with_env_prefix("SHELLMATIC")               SHELLMATIC_OUTPUT__SHELL=sh
//!   .set("output.shell", "sh")                   --shell sh
//!   .build() ──> Settings                        later sources win
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use super::Settings;
use crate::error::Result;

/// A settings source that contributed to the loader, as listed by `inis`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    /// A file that must exist (`--ini`).
    Required(PathBuf),
    /// A file that existed when it was added.
    Optional(PathBuf),
    /// TOML text given directly.
    Inline,
}

impl fmt::Display for SettingsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required(path) => write!(f, "[ini] {}", path.display()),
            Self::Optional(path) => write!(f, "[default] {}", path.display()),
            Self::Inline => f.write_str("[inline] <string>"),
        }
    }
}

/// Collects settings sources in increasing priority.
pub struct SettingsLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    sources: Vec<SettingsSource>,
}

impl SettingsLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            sources: Vec::new(),
        }
    }

    /// Adds a TOML file that `build()` requires to exist and parse.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        self.builder = self.builder.add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(true),
        );
        self.sources.push(SettingsSource::Required(path.to_path_buf()));
        self
    }

    /// Adds a TOML file that is skipped when missing.
    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref();
        self.builder = self.builder.add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(false),
        );
        if path.exists() {
            self.sources.push(SettingsSource::Optional(path.to_path_buf()));
        }
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(config::File::from_str(content, config::FileFormat::Toml));
        self.sources.push(SettingsSource::Inline);
        self
    }

    /// Reads `PREFIX_SECTION__KEY` environment variables during `build()`.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Overrides a single key such as `output.shell`, above every source.
    ///
    /// # Errors
    ///
    /// Returns an error if the key path is invalid.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| anyhow::anyhow!("Invalid settings override '{key}': {e}"))?;
        Ok(self)
    }

    /// Merges every source into [`Settings`].
    ///
    /// # Errors
    ///
    /// Returns an error if a required file is missing, a file is not valid
    /// TOML, or the merged result has unknown keys or invalid values.
    pub fn build(self) -> Result<Settings> {
        let builder = match &self.env_prefix {
            Some(prefix) => self.builder.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            ),
            None => self.builder,
        };
        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Sources added so far, lowest priority first.
    #[must_use]
    pub fn sources(&self) -> &[SettingsSource] {
        &self.sources
    }

    /// Numbered listing of [`Self::sources`].
    #[must_use]
    pub fn format_sources(&self) -> Vec<String> {
        self.sources
            .iter()
            .enumerate()
            .map(|(i, source)| format!("{}. {source}", i + 1))
            .collect()
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}
