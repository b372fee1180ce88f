// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Tests for the environment model.

use super::value::normalize;
use super::*;
use crate::error::EnvError;
use insta::assert_snapshot;
use std::collections::{BTreeMap, BTreeSet};

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| (*s).to_owned()).collect()
}

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: BTreeMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |name| vars.get(name).cloned()
}

// =============================================================================
// Values
// =============================================================================

#[test]
fn test_path_standardize() {
    assert_eq!(PathValue::new(" x:\\Alpha\\Bravo/ ").as_str(), "x:/Alpha/Bravo");
    assert_eq!(PathValue::new("/").as_str(), "/");
    assert_eq!(PathValue::new("").as_str(), "");
}

#[test]
fn test_path_standardize_idempotent() {
    for raw in ["x:\\a\\b\\", " /usr/local/ ", "$HOME\\bin", "c:", "a//b"] {
        let once = PathValue::new(raw);
        let twice = PathValue::new(once.as_str());
        assert_eq!(once.as_str(), twice.as_str(), "input: {raw:?}");
    }
}

#[test]
fn test_path_compares_case_folded() {
    assert_eq!(PathValue::new("X:/Alpha"), PathValue::new("x:\\alpha"));
    assert!(PathValue::new("x:/a") < PathValue::new("X:/B"));
    assert_eq!(PathValue::new("X:/Alpha").as_list(), vec!["x:/alpha"]);
}

#[test]
fn test_path_render_batch() {
    let render = |raw: &str| PathValue::new(raw).render(Shell::Batch, RenderMode::Platformize);
    assert_eq!(render("x:/Alpha\\Bravo/CHARLIE"), r"x:\alpha\bravo\charlie");
    assert_eq!(render("$shared_dir/alpha"), r"%SHARED_DIR%\alpha");
    assert_eq!(
        render("$python_home;$python_home/scripts"),
        r"%PYTHON_HOME%;%PYTHON_HOME%\scripts"
    );
    assert_eq!(render(""), "");
}

#[test]
fn test_path_render_verbatim_keeps_case_and_references() {
    let path = PathValue::new("$Root/Some/../Dir");
    assert_eq!(path.render(Shell::Batch, RenderMode::Verbatim), r"$Root\Dir");
}

#[test]
fn test_path_render_sh() {
    let render = |raw: &str| PathValue::new(raw).render(Shell::Sh, RenderMode::Platformize);
    assert_eq!(render("/Opt/Tools/"), "/Opt/Tools");
    assert_eq!(render("$home/bin"), "${HOME}/bin");
    assert_eq!(render("/tmp/a\"b"), "/tmp/a\\\"b");
}

#[test]
fn test_text_render() {
    let text = TextValue::new("hello $user");
    assert_eq!(text.render(Shell::Batch, RenderMode::Platformize), "hello %USER%");
    assert_eq!(text.render(Shell::Batch, RenderMode::Verbatim), "hello $user");
    assert_eq!(text.render(Shell::Sh, RenderMode::Platformize), "hello ${USER}");
    assert_eq!(text.render(Shell::Sh, RenderMode::Verbatim), "hello \\$user");
    assert_eq!(text.as_list(), vec!["hello $user"]);
}

#[test]
fn test_pathlist_parse_dedup() {
    let list = PathListValue::parse("x:/a;X:\\A;;x:/b; ");
    assert_eq!(list.len(), 2);
    assert_eq!(list.as_list(), vec!["x:/a", "x:/b"]);
    assert_eq!(list.to_string(), "x:/a;x:/b");
}

#[test]
fn test_pathlist_render() {
    let list = PathListValue::from_paths(["$A", "$A/Scripts"]);
    assert_eq!(list.render(Shell::Batch, RenderMode::Platformize), r"%A%;%A%\scripts");
    assert_eq!(list.render(Shell::Sh, RenderMode::Platformize), "${A}:${A}/Scripts");
}

#[test]
fn test_pathlist_remove() {
    let mut list = PathListValue::parse("x:/a;x:/b");
    list.remove(&PathValue::new("X:\\A")).unwrap();
    assert_eq!(list.as_list(), vec!["x:/b"]);

    let err = list.remove(&PathValue::new("x:/c")).unwrap_err();
    assert_snapshot!(err, @r#"
    while trying to remove value "x:/c" from path-list:
      - x:/b
    "#);
}

#[test]
fn test_value_from_raw_rejects_list_for_scalar() {
    let raw = RawValue::from(vec!["a".to_owned(), "b".to_owned()]);
    let err = Value::from_raw("FOO", ValueKind::Text, &raw).unwrap_err();
    assert!(matches!(err, EnvError::TypeInconsistency { ref name, .. } if name == "FOO"));
    assert!(Value::from_raw("FOO", ValueKind::Path, &raw).is_err());
    assert!(Value::from_raw("FOO", ValueKind::PathList, &raw).is_ok());
}

#[test]
fn test_value_to_raw() {
    let list = Value::from(PathListValue::parse("x:/A;x:/b"));
    assert_eq!(
        list.to_raw(),
        RawValue::List(vec!["x:/A".to_owned(), "x:/b".to_owned()])
    );
    let text = Value::from(TextValue::new("plain"));
    assert_eq!(text.to_raw(), RawValue::Scalar("plain".to_owned()));
}

#[test]
fn test_value_expand_with() {
    let vars = lookup(&[("ROOT", "c:\\tools"), ("A", "1"), ("B", "2")]);

    let mut path = Value::from(PathValue::new("$ROOT/bin"));
    path.expand_with(&vars);
    assert_eq!(path.to_string(), "c:/tools/bin");

    let mut text = Value::from(TextValue::new("${A}-$B-$C"));
    text.expand_with(&vars);
    assert_eq!(text.to_string(), "1-2-$C");

    let mut list = Value::from(PathListValue::parse("$ROOT;c:/tools;$MISSING"));
    list.expand_with(&vars);
    assert_eq!(list.to_string(), "c:/tools;$MISSING");
}

#[test]
fn test_normalize() {
    assert_eq!(normalize("a/./b/../c", '/'), "a/c");
    assert_eq!(normalize("/../x", '/'), "/x");
    assert_eq!(normalize("../x", '/'), "../x");
    assert_eq!(normalize("x:/a/../..", '\\'), r"x:\");
    assert_eq!(normalize("//server/share/x", '\\'), r"\\server\share\x");
    assert_eq!(normalize("a/..", '/'), ".");
    assert_eq!(normalize("", '/'), "");
}

// =============================================================================
// Entries
// =============================================================================

#[test]
fn test_split_name() {
    assert_eq!(split_name("NAME"), (BTreeSet::new(), "NAME".to_owned()));
    assert_eq!(
        split_name("Alpha:TEXT:NAME"),
        (set(&["alpha", "text"]), "NAME".to_owned())
    );
    assert_eq!(split_name("::NAME"), (BTreeSet::new(), "NAME".to_owned()));
}

#[test]
fn test_split_name_inverts_qualified_name() {
    for raw in ["PATH", "beta:alpha:PATH", "text:nodep:PROMPT", "x:path:HOME_DIR"] {
        let entry = Entry::new(raw, "v").unwrap();
        let (tags, name) = split_name(&entry.qualified_name());
        assert_eq!(tags, entry.tags(), "input: {raw:?}");
        assert_eq!(name, entry.name());
    }
}

#[test]
fn test_entry_infers_kind() {
    let kind = |name: &str, value: &str| Entry::new(name, value).unwrap().kind();
    assert_eq!(kind("PATH", "x:/a"), ValueKind::PathList);
    assert_eq!(kind("TERM", "xterm;256"), ValueKind::Text);
    assert_eq!(kind("FOO", "a;b"), ValueKind::PathList);
    assert_eq!(kind("FOO", "x:/a"), ValueKind::Path);

    let listed = Entry::new("FOO", vec!["a".to_owned()]).unwrap();
    assert_eq!(listed.kind(), ValueKind::PathList);
}

#[test]
fn test_entry_well_known_modifiers() {
    let prompt = Entry::new("PROMPT", "$P$G").unwrap();
    assert_eq!(prompt.kind(), ValueKind::Text);
    assert!(prompt.is_nodep());
    assert!(prompt.dependencies().is_empty());

    // Table defaults only apply to untagged entries.
    let tagged = Entry::new("text:PROMPT", "$P$G").unwrap();
    assert!(!tagged.is_nodep());
}

#[test]
fn test_entry_tags_are_classified() {
    let entry = Entry::new("Alpha:nodep:text:ALPHA", "x").unwrap();
    assert_eq!(entry.name(), "ALPHA");
    assert_eq!(entry.kind(), ValueKind::Text);
    assert_eq!(entry.modifiers(), Modifiers::NODEP);
    assert_eq!(entry.namespaces(), &set(&["alpha"]));
    assert_eq!(entry.qualified_name(), "alpha:nodep:text:ALPHA");
}

#[test]
fn test_entry_typed_value_passes_through() {
    let entry = Entry::new("FOO", TextValue::new("x;y")).unwrap();
    assert_eq!(entry.kind(), ValueKind::Text);

    let entry = Entry::new("PATH", PathValue::new("x:/a")).unwrap();
    assert_eq!(entry.kind(), ValueKind::Path);
}

#[test]
fn test_entry_typed_value_keeps_well_known_modifiers() {
    let entry = Entry::new("PROMPT", TextValue::new("$P$G")).unwrap();
    assert_eq!(entry.kind(), ValueKind::Text);
    assert!(entry.is_nodep());
    assert!(entry.dependencies().is_empty());
    assert_eq!(entry.render(Shell::Batch, false), "set PROMPT=$P$G");

    let entry = Entry::new("text:PROMPT", TextValue::new("$P$G")).unwrap();
    assert!(!entry.is_nodep());
}

#[test]
fn test_entry_type_inconsistency() {
    let err = Entry::new("text:path:FOO", "x").unwrap_err();
    assert_snapshot!(err, @"variable FOO has an inconsistent type: both 'path' and 'text' are declared");

    let err = Entry::new("path:FOO", TextValue::new("x")).unwrap_err();
    assert_snapshot!(err, @"variable FOO has an inconsistent type: declared as 'path' but holds a text value");

    let err = Entry::new("text:FOO", vec!["a".to_owned()]).unwrap_err();
    assert_snapshot!(err, @"variable FOO has an inconsistent type: a list of 1 item(s) cannot be stored as text");
}

#[test]
fn test_entry_dependencies() {
    let entry = Entry::new("path:A", "$Bravo/$charlie/x/$Bravo").unwrap();
    assert_eq!(entry.dependencies(), set(&["BRAVO", "CHARLIE"]));

    let entry = Entry::new("text:nodep:A", "$Bravo").unwrap();
    assert!(entry.dependencies().is_empty());

    let entry = Entry::new("PATH", vec!["$X/bin".to_owned(), "$Y".to_owned()]).unwrap();
    assert_eq!(entry.dependencies(), set(&["X", "Y"]));
}

#[test]
fn test_entry_render() {
    let entry = Entry::new("PATH", "x:/A;$Root/Bin").unwrap();
    assert_eq!(entry.render(Shell::Batch, false), r"set PATH=x:\a;%ROOT%\bin");
    assert_eq!(entry.render(Shell::Batch, true), r"set PATH=%PATH%;x:\a;%ROOT%\bin");
    assert_eq!(
        entry.render(Shell::Sh, true),
        r#"export PATH="${PATH}:x:/A:${ROOT}/Bin""#
    );
}

// =============================================================================
// Documents
// =============================================================================

#[test]
fn test_document_keeps_order() {
    let document = Document::parse(
        r#"{"other": 1, "environment": {"ZULU": "1", "ALPHA": ["x", "y"], "MIKE": "2"}}"#,
        "inline",
    )
    .unwrap();
    let names: Vec<&str> = document.entries().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["ZULU", "ALPHA", "MIKE"]);
}

#[test]
fn test_document_missing_section_is_empty() {
    let document = Document::parse(r#"{"aliases": {}}"#, "inline").unwrap();
    assert!(document.is_empty());
}

#[test]
fn test_document_malformed() {
    for text in [
        "not json",
        r#"{"environment": {"A": 1}}"#,
        r#"{"environment": ["A"]}"#,
        r#"{"environment": {"A": "1", "A": "2"}}"#,
    ] {
        let err = Document::parse(text, "inline").unwrap_err();
        assert!(
            matches!(err, EnvError::MalformedDocument { ref origin, .. } if origin == "inline"),
            "input: {text:?}"
        );
    }
}

#[test]
fn test_document_to_json() {
    let mut document = Document::from_pairs([("text:A", "1")]);
    document.push("pathlist:PATH", vec!["x:/a".to_owned()]);
    assert_snapshot!(document.to_json_pretty().unwrap(), @r#"
    {
      "environment": {
        "text:A": "1",
        "pathlist:PATH": [
          "x:/a"
        ]
      }
    }
    "#);
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn test_registry_set_appends_occurrences() {
    let mut registry = Registry::new();
    registry.set("PATH", "x:/a").unwrap();
    registry.set("alpha:PATH", "x:/b").unwrap();
    registry.set("HOME", "/home/me").unwrap();

    assert_eq!(registry.len(), 3);
    assert_eq!(registry.occurrences("PATH").count(), 2);
    assert_eq!(registry.names(), vec!["PATH", "HOME"]);
}

#[test]
fn test_registry_overwrite() {
    let mut registry = Registry::new();
    registry.set("PATH", "x:/a").unwrap();
    registry.set("alpha:PATH", "x:/b").unwrap();
    registry.set("alpha:PATH", "x:/c").unwrap();
    registry.overwrite("alpha:PATH", "x:/d").unwrap();

    let values: Vec<String> = registry.iter().map(|e| e.value().to_string()).collect();
    assert_eq!(values, vec!["x:/a", "x:/d"]);

    registry.overwrite("beta:PATH", "x:/e").unwrap();
    assert_eq!(registry.len(), 3);
}

#[test]
fn test_registry_load_mapping_namespaces() {
    let document = Document::from_pairs([("PATH", "x:/a"), ("text:GREETING", "hi")]);
    let mut registry = Registry::new();
    let count = registry.load_mapping(&document, &["Beta", "alpha"]).unwrap();

    assert_eq!(count, 2);
    let names: Vec<String> = registry.iter().map(Entry::qualified_name).collect();
    assert_eq!(names, vec!["alpha:beta:pathlist:PATH", "alpha:beta:text:GREETING"]);
}

#[test]
fn test_registry_load_mapping_is_atomic() {
    let mut registry = Registry::new();
    registry.set("HOME", "/home/me").unwrap();

    let mut document = Document::from_pairs([("GOOD", "x:/a")]);
    document.push("text:BAD", vec!["a".to_owned()]);
    assert!(registry.load_mapping(&document, &[]).is_err());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_registry_load_key_values() {
    let mut registry = Registry::new();
    let count = registry
        .load_key_values([("B", "x"), ("A", "y;z"), ("C:D", "w"), ("", "v")])
        .unwrap();

    assert_eq!(count, 2);
    let names: Vec<String> = registry.iter().map(Entry::qualified_name).collect();
    assert_eq!(names, vec!["_environ:pathlist:A", "_environ:path:B"]);
}

#[test]
fn test_registry_document_round_trip() {
    let mut registry = Registry::new();
    registry.set("SHARED_DIR", "D:\\Shared").unwrap();
    registry.set("text:nodep:PROMPT", "$P$G").unwrap();
    registry.set("alpha:PATH", vec!["$SHARED_DIR/bin".to_owned()]).unwrap();

    let mut restored = Registry::new();
    restored.load_mapping(&registry.to_document(), &[]).unwrap();
    assert_eq!(restored, registry);
}

#[test]
fn test_registry_listing() {
    let mut registry = Registry::new();
    registry.set("alpha:ALPHA_DIR", "x:/alpha").unwrap();
    registry.set("alpha:PYTHONPATH", vec!["$ALPHA_DIR".to_owned()]).unwrap();
    registry.set("alpha:PATH", vec!["$ALPHA_DIR/bin".to_owned()]).unwrap();

    assert_eq!(
        registry.listing(|_| true),
        vec![
            "alpha:path",
            "    - ALPHA_DIR: x:/alpha",
            "alpha:pathlist",
            "    - PATH: $ALPHA_DIR/bin",
            "    - PYTHONPATH: $ALPHA_DIR",
        ]
    );
    assert_eq!(
        registry.listing(|name| name.starts_with("PATH")),
        vec!["alpha:pathlist", "    - PATH: $ALPHA_DIR/bin"]
    );
}

// =============================================================================
// Resolution
// =============================================================================

#[test]
fn test_topological_order_passes() {
    let graph = BTreeMap::from([
        ("C".to_owned(), set(&["A", "Z"])),
        ("A".to_owned(), set(&["B"])),
        ("B".to_owned(), set(&["B"])),
        ("D".to_owned(), set(&[])),
    ]);
    assert_eq!(topological_order(&graph).unwrap(), vec!["B", "D", "A", "C"]);
}

#[test]
fn test_topological_order_same_pass_dependency() {
    let graph = BTreeMap::from([
        ("CHARLIE".to_owned(), set(&[])),
        ("BRAVO".to_owned(), set(&["ALPHA"])),
        ("ALPHA".to_owned(), set(&[])),
        ("AARDVARK".to_owned(), set(&["ZULU"])),
        ("ZULU".to_owned(), set(&[])),
    ]);
    assert_eq!(
        topological_order(&graph).unwrap(),
        vec!["ALPHA", "BRAVO", "CHARLIE", "ZULU", "AARDVARK"]
    );
}

#[test]
fn test_topological_order_cycle() {
    let graph = BTreeMap::from([
        ("A".to_owned(), set(&["B"])),
        ("B".to_owned(), set(&["A"])),
        ("C".to_owned(), set(&[])),
    ]);
    let err = topological_order(&graph).unwrap_err();
    assert_snapshot!(err, @"cyclic dependency detected: B (dependency of A)");
}

#[test]
fn test_emit_scenario_reset() {
    let document = Document::parse(
        r#"{
            "environment": {
                "PROJECTS_DIR": "x:",
                "SHARED_DIR": "d:\\shared",
                "PYTHONHOME": "$SHARED_DIR/python27",
                "PATH": ["$PYTHONHOME", "$PYTHONHOME/scripts"],
                "java:PATH": ["$SHARED_DIR/jdk/bin"]
            }
        }"#,
        "reset",
    )
    .unwrap();
    let mut registry = Registry::new();
    registry.load_mapping(&document, &[]).unwrap();

    assert_snapshot!(registry.emit(Shell::Batch, false).unwrap(), @r"
    set PROJECTS_DIR=x:
    set SHARED_DIR=d:\shared
    set PYTHONHOME=%SHARED_DIR%\python27
    set PATH=%PYTHONHOME%;%PYTHONHOME%\scripts
    set PATH=%PATH%;%SHARED_DIR%\jdk\bin
    ");
}

#[test]
fn test_emit_append_mode() {
    let mut registry = Registry::new();
    registry.set("PATH", "x:/a").unwrap();
    registry.set("text:TERM", "xterm").unwrap();

    assert_snapshot!(registry.emit(Shell::Batch, true).unwrap(), @r"
    set PATH=%PATH%;x:\a
    set TERM=xterm
    ");
}

#[test]
fn test_emit_sh() {
    let mut registry = Registry::new();
    registry.set("text:GREETING", "hello \"$USER\"").unwrap();
    registry.set("PATH", vec!["$HOME/bin".to_owned()]).unwrap();
    registry.set("alpha:PATH", vec!["/opt/alpha".to_owned()]).unwrap();

    assert_snapshot!(registry.emit(Shell::Sh, false).unwrap(), @r#"
    export GREETING="hello \"${USER}\""
    export PATH="${HOME}/bin"
    export PATH="${PATH}:/opt/alpha"
    "#);
}

#[test]
fn test_emit_empty_registry() {
    assert_eq!(Registry::new().emit(Shell::Batch, false).unwrap(), "");
}
