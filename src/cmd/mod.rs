// shellmatic: layered shell environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   emit:   reset, load, set
//!   list:   list, capture
//!   config: options, inis
//! ```

pub mod config;
pub mod emit;
pub mod list;
