//! Archive transformation pipeline for JAR and WAR files.
//!
//! `jarshift-core` rewrites Java archives entry by entry through a pluggable
//! [`Transformer`](transform::Transformer), and scans them, nested archives
//! included, for class resources. It is the engine behind namespace
//! migrations such as `javax.*` to `jakarta.*`: the transformer decides what
//! changes, the pipeline takes care of reading entries safely, preserving
//! order and reporting whether anything changed at all.
//!
//! Every entry is read through a bounded reader that rejects unknown or
//! oversized declared sizes and truncated data.
//!
//! # Examples
//!
//! ```no_run
//! use jarshift_core::MigrationConfig;
//! use jarshift_core::rewrite_archive;
//! use jarshift_core::transform::PrefixRenamer;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let renamer = PrefixRenamer::new().with_rule("javax.servlet", "jakarta.servlet");
//! let report = rewrite_archive("app.war", "app-migrated.war", &renamer, &MigrationConfig::default())?;
//! if report.any_changed {
//!     println!("app.war was transformed");
//! } else {
//!     println!("app.war was copied, no rule applicable");
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod batch;
pub mod config;
pub mod error;
pub mod formats;
pub mod io;
pub mod pipeline;
pub mod report;
pub mod transform;
pub mod types;

#[doc(hidden)]
pub mod test_utils;

// Re-export main API types
pub use api::migrate_path;
pub use api::migrate_path_with_progress;
pub use api::rewrite_archive;
pub use api::rewrite_archive_with_progress;
pub use api::scan_archive;
pub use batch::BatchReport;
pub use batch::migrate_tree;
pub use config::MigrationConfig;
pub use config::NestedMode;
pub use error::MigrationError;
pub use error::Result;
pub use error::TransformError;
pub use pipeline::Collector;
pub use report::NoopProgress;
pub use report::ProgressCallback;
pub use report::RewriteReport;
pub use report::ScanReport;
pub use transform::Transformer;

// Re-export types module for easier access
pub use types::EntryClass;
pub use types::Resource;
pub use types::classify;
