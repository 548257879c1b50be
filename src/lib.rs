//! # chronogrid
//!
//! Interactive front-end for `chronogrid-core`: an editing session that owns
//! one layer set, a command registry, a REPL with document file watching, and
//! the `chronogrid` command-line entry point.
//!
//! ## Modules
//!
//! - `session`: the editing session, its property queries and file exports.
//! - `commands`: REPL command handlers routed by longest prefix.
//! - `repl`: line editing plus document reloads over one event loop.
//! - `render`: coloured terminal grid of the layers and their composite.
//! - `cli`: clap argument definitions.

pub mod cli;
pub mod commands;
pub mod render;
pub mod repl;
pub mod session;
pub mod trace;

pub use session::EditorSession;
