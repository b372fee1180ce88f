// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Dependency ordering and script emission.
//!
//! ```text
//! occurrences ──group by name──> NAME -> union of $references
//!                                   │  drop self and undefined names
//!                                   ▼
//!          pass: walk pending names lexicographically, emitting each one
//!                whose deps are emitted (earlier in this pass counts)
//!                                   │  no progress with names pending
//!                                   ├────────────> CyclicDependency
//!                                   ▼
//!          per name, per occurrence: first = set, later = append
//! ```

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace};

use super::registry::Registry;
use super::shell::Shell;
use super::types::ValueKind;
use crate::error::{EnvError, EnvResult};

/// Orders names so each one follows the names it depends on.
///
/// Each pass walks the pending names in lexicographic order and emits every
/// name whose dependencies are already emitted, including names emitted
/// earlier in the same pass. Dependencies on the name itself or on names
/// absent from `graph` do not constrain the order.
///
/// # Errors
///
/// Returns [`EnvError::CyclicDependency`] naming the first stuck name when a
/// pass makes no progress.
pub fn topological_order(graph: &BTreeMap<String, BTreeSet<String>>) -> EnvResult<Vec<&str>> {
    let mut pending: BTreeMap<&str, BTreeSet<&str>> = graph
        .iter()
        .map(|(name, deps)| {
            let deps = deps
                .iter()
                .map(String::as_str)
                .filter(|dep| *dep != name.as_str() && graph.contains_key(*dep))
                .collect();
            (name.as_str(), deps)
        })
        .collect();

    let mut order = Vec::with_capacity(pending.len());
    let mut emitted: BTreeSet<&str> = BTreeSet::new();
    let mut pass = 0_usize;
    while !pending.is_empty() {
        pass += 1;
        let start = order.len();
        let mut stuck: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for (name, mut deps) in std::mem::take(&mut pending) {
            deps.retain(|dep| !emitted.contains(dep));
            if deps.is_empty() {
                emitted.insert(name);
                order.push(name);
            } else {
                stuck.insert(name, deps);
            }
        }

        if order.len() == start {
            let (name, deps) = stuck
                .first_key_value()
                .map(|(name, deps)| (*name, deps.iter().copied().collect::<Vec<&str>>()))
                .unwrap_or_default();
            return Err(EnvError::CyclicDependency {
                name: name.to_owned(),
                dependencies: deps.join(", "),
            });
        }

        trace!(pass, names = ?&order[start..], "Resolved pass");
        pending = stuck;
    }

    Ok(order)
}

/// Name-level dependency graph of a registry.
#[must_use]
pub fn dependency_graph(registry: &Registry) -> BTreeMap<String, BTreeSet<String>> {
    let mut graph: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for entry in registry {
        graph
            .entry(entry.name().to_owned())
            .or_default()
            .extend(entry.dependencies());
    }
    graph
}

/// Renders every occurrence in dependency order, one line each.
///
/// The first occurrence of a name sets the variable and later ones append
/// to it. With `append_mode`, path-lists append even on first occurrence.
///
/// # Errors
///
/// Returns [`EnvError::CyclicDependency`] if names depend on each other in a
/// cycle; nothing is emitted in that case.
pub fn emit(registry: &Registry, shell: Shell, append_mode: bool) -> EnvResult<String> {
    let graph = dependency_graph(registry);
    let order = topological_order(&graph)?;

    let mut lines = Vec::with_capacity(registry.len());
    for name in order {
        for (index, entry) in registry.occurrences(name).enumerate() {
            let append = index > 0 || (append_mode && entry.kind() == ValueKind::PathList);
            lines.push(entry.render(shell, append));
        }
    }

    debug!(shell = %shell, lines = lines.len(), "Script emitted");
    Ok(lines.join("\n"))
}
