// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments of the script-emitting commands.

use clap::{ArgAction, Args};
use std::path::PathBuf;

/// Where the emitted script goes.
#[derive(Debug, Clone, Default, Args)]
pub struct OutputArgs {
    /// Prints the script instead of writing `output.script`.
    #[arg(long, action = ArgAction::SetTrue)]
    pub stdout: bool,
}

/// Arguments for the `reset` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ResetArgs {
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the `load` command.
#[derive(Debug, Clone, Default, Args)]
pub struct LoadArgs {
    /// Documents to load, in order. Later documents layer over earlier ones.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Namespace tag applied to every loaded entry (can repeat).
    #[arg(short = 'n', long = "namespace", value_name = "TAG", action = ArgAction::Append)]
    pub namespaces: Vec<String>,

    /// Loads the current process environment before the documents.
    #[arg(long, action = ArgAction::SetTrue)]
    pub environ: bool,

    /// Path-lists extend the current value even on first occurrence.
    #[arg(long, action = ArgAction::SetTrue)]
    pub append: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Arguments for the `set` command.
#[derive(Debug, Clone, Default, Args)]
pub struct SetArgs {
    /// Variable name, optionally tagged (e.g. `pathlist:PATH`).
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Variable value.
    #[arg(value_name = "VALUE")]
    pub value: String,

    #[command(flatten)]
    pub output: OutputArgs,
}
