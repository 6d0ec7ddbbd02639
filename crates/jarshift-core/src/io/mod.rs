//! I/O utilities for archive operations.
//!
//! This module provides the bounded entry reader shared by the scanning and
//! rewriting pipelines.

pub mod bounded;

// Re-export main items for convenience
pub use bounded::MAX_ENTRY_SIZE;
pub use bounded::check_declared_size;
pub use bounded::read_entry_bytes;
