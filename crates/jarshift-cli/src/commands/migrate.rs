//! Migrate command implementation.

use crate::cli::MigrateArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use anyhow::bail;
use jarshift_core::MigrationConfig;
use jarshift_core::NoopProgress;
use jarshift_core::migrate_path_with_progress;
use jarshift_core::migrate_tree;
use jarshift_core::transform::PrefixRenamer;
use jarshift_core::types::is_container_name;
use std::fs;
use std::path::Path;
use tracing::debug;

pub fn execute(
    args: &MigrateArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let config = build_config(args);
    let renamer = PrefixRenamer::from_rules(args.rules.clone());
    debug!(
        rules = args.rules.len(),
        rewrite_nested = config.rewrite_nested,
        compression_level = ?config.compression_level,
        max_entry_size = config.max_entry_size,
        "built migration config"
    );

    if args.source.is_dir() {
        if args.dest.exists() && !args.dest.is_dir() {
            bail!(
                "Destination '{}' exists and is not a directory",
                args.dest.display()
            );
        }
        if !args.force && has_entries(&args.dest)? {
            bail!(
                "Destination directory '{}' is not empty\n\
                 HINT: Use --force to overwrite the files in it.",
                args.dest.display()
            );
        }

        let report = add_archive_context(
            migrate_tree(&args.source, &args.dest, &renamer, &config),
            &args.source,
        )?;
        formatter.format_batch_result(&args.source, &args.dest, &report)?;

        let failed = report.files_failed();
        if failed > 0 {
            bail!("{failed} of {} files failed to migrate", report.files.len());
        }
        return Ok(());
    }

    if args.dest.exists() && !args.force {
        bail!(
            "Destination '{}' already exists\n\
             HINT: Use --force to overwrite it.",
            args.dest.display()
        );
    }

    let with_bar = show_progress
        && CliProgress::should_show()
        && is_container_name(&args.source.to_string_lossy());

    let report = if with_bar {
        let mut progress = CliProgress::new("Migrating");
        add_archive_context(
            migrate_path_with_progress(&args.source, &args.dest, &renamer, &config, &mut progress),
            &args.source,
        )?
    } else {
        let mut noop = NoopProgress;
        add_archive_context(
            migrate_path_with_progress(&args.source, &args.dest, &renamer, &config, &mut noop),
            &args.source,
        )?
    };

    formatter.format_migration_result(&args.source, &args.dest, &report)?;

    Ok(())
}

fn build_config(args: &MigrateArgs) -> MigrationConfig {
    let mut config = MigrationConfig::default()
        .with_rewrite_nested(args.rewrite_nested)
        .with_compression_level(args.compression_level)
        .with_exclude_patterns(args.exclude.clone())
        .with_continue_on_error(args.keep_going);

    if let Some(max) = args.max_entry_size {
        config = config.with_max_entry_size(max);
    }

    config
}

/// Returns `true` if `dir` exists and contains anything.
fn has_entries(dir: &Path) -> Result<bool> {
    if !dir.is_dir() {
        return Ok(false);
    }
    Ok(fs::read_dir(dir)?.next().is_some())
}
