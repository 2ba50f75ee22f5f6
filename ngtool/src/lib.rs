//! # ngtool
//!
//! Command-line companion for node group libraries.
//!
//! `ngtool` derives menu records from library documents, manages the
//! registered source file list, activates groups into working documents and
//! browses the materialized menus in the terminal.
//!
//! ## Modules
//!
//! - [`ctx`] - Application context and workspace paths
//! - [`scan`] - `scan` and `update` commands
//! - [`library`] - entry list CRUD commands
//! - [`append`] - group activation command
//! - [`browse`] - interactive menu browser

/// Group activation command.
pub mod append;

/// Interactive menu browser built on ratatui.
pub mod browse;

/// Application context and workspace paths.
pub mod ctx;

/// Entry list CRUD commands.
pub mod library;

/// Record derivation commands.
pub mod scan;

#[macro_use]
extern crate log;
