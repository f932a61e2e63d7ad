//! Command-line front end for hot-deal extraction.
//!
//! Contracts are staged in a private temporary directory and read by the
//! Claude Code CLI with only the `Read` tool available.

pub mod backend;
pub mod commands;
pub mod config;
pub mod edits;
/// Error types for the binary.
pub mod errors;
pub mod staging;

#[cfg(all(test, unix))]
mod testing;
