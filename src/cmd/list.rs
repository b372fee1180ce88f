// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Inspection commands: `list` and `capture`.

use anyhow::Context;
use std::path::Path;
use tracing::info;
use wax::{Glob, Program};

use crate::cli::list::{CaptureArgs, ListArgs};
use crate::config::Settings;
use crate::env::Registry;
use crate::error::Result;

/// Main handler for the `list` command.
///
/// Lists `--file` when given. Otherwise lists the captured environment,
/// capturing it first when `files.capture` does not exist yet.
///
/// # Errors
///
/// Returns an error if the document cannot be loaded or the pattern is not
/// a valid glob.
pub fn run_list_command(args: &ListArgs, settings: &Settings) -> Result<()> {
    let registry = match &args.file {
        Some(path) => load_registry(path)?,
        None => captured_registry(&settings.files.capture_path())?,
    };

    let lines = format_listing(&registry, args.pattern.as_deref())?;
    if lines.is_empty() {
        println!("No variables found");
    } else {
        for line in &lines {
            println!("{line}");
        }
    }
    Ok(())
}

/// Main handler for the `capture` command.
///
/// # Errors
///
/// Returns an error if the environment cannot be typed or the document
/// cannot be written.
pub fn run_capture_command(args: &CaptureArgs, settings: &Settings) -> Result<()> {
    let path = args
        .output
        .clone()
        .unwrap_or_else(|| settings.files.capture_path());
    capture_environment(&path)?;
    Ok(())
}

/// Listing lines of `registry`, restricted to names matching `pattern`.
///
/// # Errors
///
/// Returns an error if the pattern is not a valid glob.
pub fn format_listing(registry: &Registry, pattern: Option<&str>) -> Result<Vec<String>> {
    match pattern {
        Some(pattern) => {
            let glob =
                Glob::new(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))?;
            Ok(registry.listing(|name| glob.is_match(name)))
        }
        None => Ok(registry.listing(|_| true)),
    }
}

/// Saves the process environment as a document at `path`.
///
/// # Errors
///
/// Returns an error if the environment cannot be typed or the document
/// cannot be written.
pub fn capture_environment(path: &Path) -> Result<Registry> {
    let registry = Registry::ambient().context("Failed to load the process environment")?;
    registry
        .to_document()
        .save(path)
        .with_context(|| format!("Failed to capture environment to {}", path.display()))?;
    info!(path = %path.display(), count = registry.len(), "Environment captured");
    Ok(registry)
}

fn load_registry(path: &Path) -> Result<Registry> {
    let mut registry = Registry::new();
    registry.load_document(path, &[])?;
    Ok(registry)
}

fn captured_registry(path: &Path) -> Result<Registry> {
    if path.is_file() {
        load_registry(path)
    } else {
        capture_environment(path)
    }
}
