//! Tour CLI
//!
//! Library half of the `tourctl` binary. Each subcommand is a function that
//! takes plain inputs and returns the text to print, so the commands can be
//! driven from tests without spawning a process.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod commands;

pub use commands::{replay, sync, ReplayOptions, ReplaySummary, SyncOptions, SyncSummary};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
