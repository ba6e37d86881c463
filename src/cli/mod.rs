//! Command-line interface for the `lz4chain` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity strings, file extensions, stdin/stdout marks, environment variable names. |
//! | [`args`]      | clap derive definitions: global verbosity flags and the `compress` / `decompress` / `info` / `block` / `unblock` subcommands. |
//! | [`commands`]  | Opening inputs and outputs, running each subcommand, end-of-run summaries. |
//!
//! Typical call sequence: `Cli::parse` → `commands::run`.

pub mod args;
pub mod commands;
pub mod constants;
