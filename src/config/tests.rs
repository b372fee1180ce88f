// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{Settings, SettingsLoader};
use crate::env::Shell;
use crate::logging::LogLevel;
use std::path::PathBuf;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    insta::assert_snapshot!(settings.format_options().join("\n"), @r"
    files.capture           = $APPDATA/.shellmatic.json
    files.reset             = reset.json
    global.file_log_level   = 5
    global.output_log_level = 3
    output.append           = false
    output.script           = $TEMP/.shellmatic.bat
    output.shell            = batch
    ");
}

#[test]
fn test_settings_parse() {
    let toml = r#"
[global]
output_log_level = 4
log_file = "shellmatic.log"

[output]
shell = "sh"
script = "/tmp/env.sh"
append = true

[files]
reset = "base.json"
"#;
    let settings = Settings::parse(toml).unwrap();

    assert_eq!(settings.global.output_log_level, LogLevel::DEBUG);
    assert_eq!(settings.global.log_file, Some(PathBuf::from("shellmatic.log")));
    assert_eq!(settings.output.shell, Shell::Sh);
    assert_eq!(settings.output.script, "/tmp/env.sh");
    assert!(settings.output.append);
    assert_eq!(settings.files.reset, "base.json");
    assert_eq!(settings.files.capture, "$APPDATA/.shellmatic.json");
}

#[test]
fn test_settings_rejects_unknown_keys() {
    assert!(Settings::parse("[output]\ncolour = true").is_err());
    assert!(Settings::parse("[aliases]\nfoo = 1").is_err());
}

#[test]
fn test_settings_rejects_invalid_values() {
    assert!(Settings::parse("[output]\nshell = \"fish\"").is_err());
    assert!(Settings::parse("[global]\noutput_log_level = 9").is_err());
}

#[test]
fn test_settings_loader_add_toml_file_not_found() {
    let loader = SettingsLoader::new().add_toml_file("/nonexistent/path/to/shellmatic.toml");
    assert!(loader.build().is_err());
}

#[test]
fn test_settings_loader_add_toml_file_optional_missing() {
    let loader = SettingsLoader::new().add_toml_file_optional("/nonexistent/shellmatic.toml");
    assert!(loader.sources().is_empty());
    assert_eq!(loader.build().unwrap(), Settings::default());
}

#[test]
fn test_settings_loader_layered_sources() {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut file = NamedTempFile::new().expect("failed to create temp file");
    writeln!(file, "[output]\nshell = \"sh\"\nappend = true").expect("failed to write");

    let loader = SettingsLoader::new()
        .add_toml_file(file.path())
        .add_toml_str("[output]\nappend = false");
    assert_eq!(
        loader.format_sources(),
        vec![
            format!("1. [ini] {}", file.path().display()),
            "2. [inline] <string>".to_owned(),
        ]
    );

    let settings = loader.build().unwrap();
    assert_eq!(settings.output.shell, Shell::Sh);
    assert!(!settings.output.append);
}

#[test]
fn test_settings_loader_set_override() {
    let settings = SettingsLoader::new()
        .add_toml_str("[output]\nshell = \"sh\"")
        .set("output.shell", "batch")
        .expect("set should succeed")
        .build()
        .expect("build should succeed");

    assert_eq!(settings.output.shell, Shell::Batch);
}

#[test]
fn test_settings_loader_with_env_prefix() {
    // SAFETY: the variable name is unique to this test.
    unsafe {
        std::env::set_var("SHELLMATICTEST_OUTPUT__SCRIPT", "/tmp/from-env.bat");
    }

    let settings = SettingsLoader::new()
        .add_toml_str("[output]\nscript = \"/tmp/from-toml.bat\"")
        .with_env_prefix("SHELLMATICTEST")
        .build()
        .expect("build should succeed");

    // SAFETY: same as above.
    unsafe {
        std::env::remove_var("SHELLMATICTEST_OUTPUT__SCRIPT");
    }

    assert_eq!(settings.output.script, "/tmp/from-env.bat");
}

#[test]
fn test_script_path_expands_references() {
    // SAFETY: the variable name is unique to this test.
    unsafe {
        std::env::set_var("SCRIPT_PATH_TEST_DIR", "/tmp/scripts");
    }

    let mut settings = Settings::default();
    settings.output.script = "$SCRIPT_PATH_TEST_DIR/env.bat".to_string();
    let path = settings.output.script_path();

    // SAFETY: same as above.
    unsafe {
        std::env::remove_var("SCRIPT_PATH_TEST_DIR");
    }

    assert_eq!(path, PathBuf::from("/tmp/scripts/env.bat"));
}
