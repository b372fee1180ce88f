// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Typed environment model and dependency-ordered emission.
//!
//! # Architecture
//!
//! ```text
//! Document (JSON) ─┐
//! process env  ────┼──> Registry ──> Entry { kind, modifiers, namespaces, Value }
//! set(NAME, VALUE) ┘        │
//!                           ▼
//!                  resolve::emit(Shell) ──> "set A=...\nset B=%A%\..."
//! ```
//!
//! - **References**: `$NAME` tokens are the only dependency contract
//! - **Deterministic**: names are ordered by pass, then lexicographically
//! - **Layered**: later occurrences of a name append to earlier ones

pub mod document;
pub mod entry;
pub mod registry;
pub mod resolve;
pub mod shell;
pub mod types;
pub mod value;

#[cfg(test)]
mod tests;

pub use document::Document;
pub use entry::{Entry, Input, WELL_KNOWN, split_name};
pub use registry::{AMBIENT_NAMESPACE, Registry};
pub use resolve::{emit, topological_order};
pub use shell::Shell;
pub use types::{Modifiers, ValueKind};
pub use value::{PathListValue, PathValue, RawValue, RenderMode, TextValue, Value};
