// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Script-emitting commands.
//!
//! ```text
//! reset: files.reset            ─┐
//! load:  [environ] + FILE...     ├─> Registry ─> emit(shell, append) ─> script file | stdout
//! set:   NAME VALUE             ─┘
//! ```

use anyhow::Context;
use std::path::Path;
use tracing::info;

use crate::cli::emit::{LoadArgs, OutputArgs, ResetArgs, SetArgs};
use crate::config::Settings;
use crate::env::Registry;
use crate::error::Result;
use crate::utility::fs::write_atomic;

/// Main handler for the `reset` command.
///
/// # Errors
///
/// Returns an error if the base document cannot be loaded, the entries
/// reference each other in a cycle, or the script cannot be written.
pub fn run_reset_command(args: &ResetArgs, settings: &Settings) -> Result<()> {
    let path = settings.files.reset_path();
    let registry = build_reset_registry(&path)?;
    let script = registry.emit(settings.output.shell, settings.output.append)?;
    deliver(&script, settings, &args.output)
}

/// Main handler for the `load` command.
///
/// # Errors
///
/// Returns an error if a document cannot be loaded, the entries reference
/// each other in a cycle, or the script cannot be written.
pub fn run_load_command(args: &LoadArgs, settings: &Settings) -> Result<()> {
    let registry = build_load_registry(args)?;
    let append = args.append || settings.output.append;
    let script = registry.emit(settings.output.shell, append)?;
    deliver(&script, settings, &args.output)
}

/// Main handler for the `set` command.
///
/// # Errors
///
/// Returns an error if the entry is inconsistent or the script cannot be
/// written.
pub fn run_set_command(args: &SetArgs, settings: &Settings) -> Result<()> {
    let registry = build_set_registry(args)?;
    let script = registry.emit(settings.output.shell, settings.output.append)?;
    deliver(&script, settings, &args.output)
}

/// Registry holding the base document.
///
/// # Errors
///
/// Returns an error if the document cannot be read or is malformed.
pub fn build_reset_registry(path: &Path) -> Result<Registry> {
    let mut registry = Registry::new();
    let count = registry
        .load_document(path, &[])
        .with_context(|| format!("Failed to reset from {}", path.display()))?;
    info!(path = %path.display(), count, "Base document loaded");
    Ok(registry)
}

/// Registry holding the ambient environment (on request) and every document.
///
/// # Errors
///
/// Returns an error if any source cannot be loaded.
pub fn build_load_registry(args: &LoadArgs) -> Result<Registry> {
    let mut registry = if args.environ {
        Registry::ambient().context("Failed to load the process environment")?
    } else {
        Registry::new()
    };

    let namespaces: Vec<&str> = args.namespaces.iter().map(String::as_str).collect();
    for path in &args.files {
        let count = registry.load_document(path, &namespaces)?;
        info!(path = %path.display(), count, "Document loaded");
    }
    Ok(registry)
}

/// Registry holding a single entry.
///
/// # Errors
///
/// Returns an error if the entry is inconsistent.
pub fn build_set_registry(args: &SetArgs) -> Result<Registry> {
    let mut registry = Registry::new();
    registry.set(&args.name, args.value.as_str())?;
    Ok(registry)
}

/// Prints the script or writes it to `output.script`.
fn deliver(script: &str, settings: &Settings, output: &OutputArgs) -> Result<()> {
    if output.stdout {
        println!("{script}");
        return Ok(());
    }

    let path = settings.output.script_path();
    let mut contents = script.to_owned();
    if !contents.is_empty() {
        contents.push('\n');
    }
    write_atomic(&path, &contents)
        .with_context(|| format!("Failed to write script {}", path.display()))?;
    info!(path = %path.display(), shell = %settings.output.shell, "Script written");
    Ok(())
}
