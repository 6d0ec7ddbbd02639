//! Scan command implementation

use crate::cli::ScanArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::output::ScannedResource;
use anyhow::Result;
use jarshift_core::MigrationConfig;
use jarshift_core::NestedMode;
use jarshift_core::TransformError;
use jarshift_core::scan_archive;

pub fn execute(args: &ScanArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let mode = if args.in_memory {
        NestedMode::InMemory
    } else {
        NestedMode::OnDisk
    };
    let mut config = MigrationConfig::default()
        .with_nested_mode(mode)
        .with_exclude_patterns(args.exclude.clone());
    if let Some(max) = args.max_entry_size {
        config = config.with_max_entry_size(max);
    }

    let mut resources = Vec::new();
    let mut collect = |data: &[u8], name: &str| -> Result<(), TransformError> {
        resources.push(ScannedResource {
            name: name.to_string(),
            size: data.len() as u64,
        });
        Ok(())
    };

    let report = add_archive_context(
        scan_archive(&args.archive, &mut collect, &config),
        &args.archive,
    )?;

    formatter.format_scan_result(&args.archive, &resources, &report, args.human_readable)?;

    Ok(())
}
