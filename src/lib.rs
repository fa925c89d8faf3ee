//! Reposweep - Terminal dashboard for browsing and pruning GitHub repositories
//!
//! This library crate exposes internal modules for integration testing.

pub mod config;
pub mod data;
pub mod mutation;
pub mod remote;
pub mod tui;
pub mod util;
