// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for dependency-ordered emission.
//!
//! Tests the Registry and resolver with realistic layered configurations.

use insta::assert_snapshot;
use shellmatic::env::{Document, Registry, Shell, split_name};
use shellmatic::error::EnvError;

fn emit(registry: &Registry) -> String {
    registry.emit(Shell::Batch, false).unwrap()
}

// =============================================================================
// Concrete Scenarios
// =============================================================================

#[test]
fn emit_text_and_path() {
    let mut registry = Registry::new();
    registry.set("text:ALPHA", "Alpha").unwrap();
    registry.set("BRAVO", "x:/Bravo\\directory/FOLDER").unwrap();

    assert_snapshot!(emit(&registry), @r"
    set ALPHA=Alpha
    set BRAVO=x:\bravo\directory\folder
    ");
}

#[test]
fn emit_unknown_reference() {
    let mut registry = Registry::new();
    registry.set("ALPHA", "$ZULU").unwrap();

    assert_snapshot!(emit(&registry), @"set ALPHA=%ZULU%");
}

#[test]
fn emit_self_reference() {
    let mut registry = Registry::new();
    registry.set("ALPHA", "$ALPHA/bravo/$CHARLIE").unwrap();

    assert_snapshot!(emit(&registry), @r"set ALPHA=%ALPHA%\bravo\%CHARLIE%");
}

#[test]
fn emit_layered_path() {
    let mut registry = Registry::new();
    registry.set("PATH", "x:/a").unwrap();
    registry.set("project:PATH", "x:/b").unwrap();

    assert_snapshot!(emit(&registry), @r"
    set PATH=x:\a
    set PATH=%PATH%;x:\b
    ");
}

#[test]
fn emit_nodep_verbatim() {
    let mut registry = Registry::new();
    registry.set("text:nodep:ALPHA", "$ALPHA/bravo/$CHARLIE").unwrap();

    assert_snapshot!(emit(&registry), @"set ALPHA=$ALPHA/bravo/$CHARLIE");
}

#[test]
fn emit_dependency_satisfied_earlier_in_pass() {
    let mut registry = Registry::new();
    registry.set("text:CHARLIE", "c").unwrap();
    registry.set("text:BRAVO", "$ALPHA-b").unwrap();
    registry.set("text:ALPHA", "a").unwrap();

    assert_snapshot!(emit(&registry), @r"
    set ALPHA=a
    set BRAVO=%ALPHA%-b
    set CHARLIE=c
    ");
}

#[test]
fn emit_cycle_fails() {
    let mut registry = Registry::new();
    registry.set("ALPHA", "$ZULU").unwrap();
    registry.set("ZULU", "$ALPHA").unwrap();

    let err = registry.emit(Shell::Batch, false).unwrap_err();
    assert!(matches!(err, EnvError::CyclicDependency { .. }));
    assert_snapshot!(err, @"cyclic dependency detected: ZULU (dependency of ALPHA)");
}

#[test]
fn emit_cycle_through_third_name() {
    let mut registry = Registry::new();
    registry.set("A", "$B").unwrap();
    registry.set("B", "$C").unwrap();
    registry.set("C", "$A").unwrap();
    registry.set("D", "x:/free").unwrap();

    assert!(registry.emit(Shell::Batch, false).is_err());
}

// =============================================================================
// Documents
// =============================================================================

#[test]
fn emit_base_and_overlay_documents() {
    let base = Document::parse(
        r#"{
            "environment": {
                "PROJECTS_DIR": "x:",
                "SHARED_DIR": "d:\\shared",
                "PYTHONHOME": "$SHARED_DIR/python27",
                "PATH": ["$PYTHONHOME", "$PYTHONHOME/scripts"]
            }
        }"#,
        "base",
    )
    .unwrap();
    let overlay = Document::parse(
        r#"{"environment": {"PATH": ["$SHARED_DIR/jdk/bin"], "text:JAVA_OPTS": "-Xmx1g"}}"#,
        "overlay",
    )
    .unwrap();

    let mut registry = Registry::new();
    registry.load_mapping(&base, &[]).unwrap();
    registry.load_mapping(&overlay, &["java"]).unwrap();

    assert_snapshot!(emit(&registry), @r"
    set JAVA_OPTS=-Xmx1g
    set PROJECTS_DIR=x:
    set SHARED_DIR=d:\shared
    set PYTHONHOME=%SHARED_DIR%\python27
    set PATH=%PYTHONHOME%;%PYTHONHOME%\scripts
    set PATH=%PATH%;%SHARED_DIR%\jdk\bin
    ");
}

#[test]
fn emit_append_mode_only_affects_path_lists() {
    let mut registry = Registry::new();
    registry.set("PYTHONPATH", "$PROJECT/src").unwrap();
    registry.set("PROJECT", "x:/project").unwrap();
    registry.set("text:TERM", "xterm").unwrap();

    assert_snapshot!(registry.emit(Shell::Batch, true).unwrap(), @r"
    set PROJECT=x:\project
    set PYTHONPATH=%PYTHONPATH%;%PROJECT%\src
    set TERM=xterm
    ");
}

#[test]
fn emit_posix_dialect() {
    let mut registry = Registry::new();
    registry.set("TOOLS", "/opt/Tools").unwrap();
    registry.set("PATH", vec!["$TOOLS/bin".to_owned()]).unwrap();
    registry.set("text:nodep:PS1", "$ ").unwrap();

    assert_snapshot!(registry.emit(Shell::Sh, false).unwrap(), @r#"
    export PS1="\$ "
    export TOOLS="/opt/Tools"
    export PATH="${TOOLS}/bin"
    "#);
}

// =============================================================================
// Properties
// =============================================================================

fn layered_registry() -> Registry {
    let mut registry = Registry::new();
    registry.set("PATH", "$PYTHONHOME;$TOOLS/bin").unwrap();
    registry.set("PYTHONHOME", "$SHARED/python").unwrap();
    registry.set("project:PATH", "$PROJECT/scripts").unwrap();
    registry.set("SHARED", "d:/shared").unwrap();
    registry.set("TOOLS", "$SHARED/tools").unwrap();
    registry.set("PROJECT", "$PROJECTS/alpha").unwrap();
    registry.set("text:GREETING", "hello $USERNAME").unwrap();
    registry
}

#[test]
fn emit_is_deterministic() {
    let registry = layered_registry();
    let first = emit(&registry);
    for _ in 0..5 {
        assert_eq!(emit(&registry.clone()), first);
    }
}

#[test]
fn emit_respects_dependencies() {
    let registry = layered_registry();
    let script = emit(&registry);
    let lines: Vec<&str> = script.lines().collect();
    assert_eq!(lines.len(), registry.len());

    fn line_name(line: &str) -> String {
        line.trim_start_matches("set ")
            .split('=')
            .next()
            .unwrap_or_default()
            .to_owned()
    }
    let defined: Vec<&str> = registry.names();

    for (index, line) in lines.iter().enumerate() {
        let name = line_name(line);
        let deps: Vec<String> = registry
            .occurrences(&name)
            .flat_map(|e| e.dependencies())
            .filter(|dep| *dep != name && defined.contains(&dep.as_str()))
            .collect();
        for dep in deps {
            let last = lines
                .iter()
                .rposition(|l| line_name(l) == dep)
                .unwrap();
            assert!(last < index, "{dep} must be emitted before {name}");
        }
    }
}

#[test]
fn split_name_inverts_qualified_names() {
    for entry in &layered_registry() {
        let (tags, name) = split_name(&entry.qualified_name());
        assert_eq!(tags, entry.tags());
        assert_eq!(name, entry.name());
    }
}
