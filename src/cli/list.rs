// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments of the inspection commands.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Only lists names matching this glob (e.g. `PYTHON*`).
    #[arg(value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Lists this document instead of the captured environment.
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Arguments for the `capture` command.
#[derive(Debug, Clone, Default, Args)]
pub struct CaptureArgs {
    /// Destination document, defaults to `files.capture`.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}
