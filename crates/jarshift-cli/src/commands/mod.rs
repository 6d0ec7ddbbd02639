//! Subcommand implementations.

pub mod completion;
pub mod migrate;
pub mod scan;
