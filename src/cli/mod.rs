// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for shellmatic using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! shellmatic [global options] <command>
//! reset                     base document -> script
//! load FILE... [-n TAG]...  documents (+ ambient env) -> script
//! set NAME VALUE            single entry -> script
//! list [PATTERN]            grouped listing
//! capture                   ambient env -> document
//! options | inis | version
//! ```

pub mod emit;
pub mod global;
pub mod list;


use crate::cli::emit::{LoadArgs, ResetArgs, SetArgs};
use crate::cli::global::GlobalOptions;
use crate::cli::list::{CaptureArgs, ListArgs};
use clap::{Parser, Subcommand};

/// Layered shell environment resolver.
///
/// Resolves typed environment documents into ordered shell scripts.
#[derive(Debug, Parser)]
#[command(
    name = "shellmatic",
    author,
    version,
    about = "Layered shell environment resolver",
    long_about = "shellmatic Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Resolves environment documents into a shell script that sets\n\
                  every variable after the variables it references.\n\n\
                  `shellmatic reset` writes the base environment script. Do\n\
                  `shellmatic load <FILE>...` to layer project documents on top.\n\
                  See `shellmatic <command> --help` for more information.",
    after_help = "SETTINGS:\n\n\
                  shellmatic reads `shellmatic.toml` from the current directory\n\
                  when present, then every file given with --ini, then\n\
                  SHELLMATIC_SECTION__KEY environment variables. Command-line\n\
                  options override all of them."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all settings and their values.
    Options,

    /// Lists the settings files used.
    Inis,

    /// Writes the script for the base document.
    Reset(ResetArgs),

    /// Loads documents and writes their script.
    Load(LoadArgs),

    /// Sets a single variable and writes its script.
    Set(SetArgs),

    /// Lists variables grouped by their tags.
    List(ListArgs),

    /// Saves the current process environment as a document.
    Capture(CaptureArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
