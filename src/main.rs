// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Settings --> Logging --> Command Dispatch
//!   Reset | Load | Set | List | Capture | Options | Inis | Version
//! ```

use std::process::ExitCode;

use shellmatic::cli::global::GlobalOptions;
use shellmatic::cli::{self, Command};
use shellmatic::cmd::config::{run_inis_command, run_options_command};
use shellmatic::cmd::emit::{run_load_command, run_reset_command, run_set_command};
use shellmatic::cmd::list::{run_capture_command, run_list_command};
use shellmatic::config::loader::SettingsLoader;
use shellmatic::config::{DEFAULT_SETTINGS_FILE, ENV_PREFIX, Settings};
use shellmatic::logging::{LogConfig, LogGuard, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let cli = cli::parse();

    let settings = match load_settings(&cli.global) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let _log_guard: LogGuard = match init_logging(&build_log_config(&settings)) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &settings)
}

fn build_log_config(settings: &Settings) -> LogConfig {
    LogConfig::builder()
        .with_console_level(settings.global.output_log_level)
        .with_file_level(settings.global.file_log_level)
        .maybe_with_log_file(
            settings
                .global
                .log_file
                .as_ref()
                .map(|p| p.display().to_string()),
        )
        .build()
}

fn dispatch_command(cli: &cli::Cli, settings: &Settings) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(())
        }
        Some(Command::Options) => {
            run_options_command(settings);
            Ok(())
        }
        Some(Command::Inis) => {
            let loader = build_settings_loader(&cli.global);
            run_inis_command(&loader.format_sources());
            Ok(())
        }
        Some(Command::Reset(args)) => run_reset_command(args, settings),
        Some(Command::Load(args)) => run_load_command(args, settings),
        Some(Command::Set(args)) => run_set_command(args, settings),
        Some(Command::List(args)) => run_list_command(args, settings),
        Some(Command::Capture(args)) => run_capture_command(args, settings),
        None => Err(anyhow::anyhow!(
            "No command specified. Use --help for usage information."
        )),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_settings_loader(global: &GlobalOptions) -> SettingsLoader {
    let mut loader = SettingsLoader::new().add_toml_file_optional(DEFAULT_SETTINGS_FILE);
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

fn load_settings(global: &GlobalOptions) -> shellmatic::error::Result<Settings> {
    let mut loader = build_settings_loader(global);
    for (key, value) in global.to_settings_overrides() {
        loader = loader.set(key, value)?;
    }
    loader.build()
}
