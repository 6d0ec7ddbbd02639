//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use super::formatter::ScannedResource;
use anyhow::Result;
use console::Term;
use console::style;
use jarshift_core::BatchReport;
use jarshift_core::RewriteReport;
use jarshift_core::ScanReport;
use jarshift_core::batch::FileStatus;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let digits = n.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }

        grouped
    }

    fn mark_done(&self) -> String {
        if self.use_colors {
            style("✓").green().bold().to_string()
        } else {
            "OK".to_string()
        }
    }

    fn mark_same(&self) -> String {
        if self.use_colors {
            style("=").dim().to_string()
        } else {
            "--".to_string()
        }
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_migration_result(
        &self,
        source: &Path,
        dest: &Path,
        report: &RewriteReport,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if report.any_changed {
            self.line(&format!(
                "{} {} was transformed to {}",
                self.mark_done(),
                source.display(),
                dest.display()
            ));
        } else {
            self.line(&format!(
                "{} {} was copied to {}, no rule applicable",
                self.mark_same(),
                source.display(),
                dest.display()
            ));
        }

        if self.verbose {
            self.line(&format!(
                "  Entries written: {}",
                Self::format_number(report.entries_written)
            ));
            self.line(&format!(
                "  Entries changed: {}",
                Self::format_number(report.entries_changed)
            ));
            self.line(&format!(
                "  Entries renamed: {}",
                Self::format_number(report.entries_renamed)
            ));
            if report.entries_excluded > 0 {
                self.line(&format!(
                    "  Entries copied unprocessed: {}",
                    Self::format_number(report.entries_excluded)
                ));
            }
            if report.nested_archives_rewritten > 0 {
                self.line(&format!(
                    "  Nested archives rewritten: {}",
                    Self::format_number(report.nested_archives_rewritten)
                ));
            }
            self.line(&format!(
                "  Read: {}, written: {}",
                Self::format_size(report.bytes_read),
                Self::format_size(report.bytes_written)
            ));
            self.line(&format!("  Duration: {:.2?}", report.duration));
        }

        Ok(())
    }

    fn format_batch_result(&self, source: &Path, dest: &Path, report: &BatchReport) -> Result<()> {
        for outcome in &report.files {
            match &outcome.status {
                FileStatus::Failed(message) => {
                    self.format_warning(&format!("{}: {message}", outcome.source.display()));
                }
                FileStatus::Changed if self.verbose && !self.quiet => {
                    self.line(&format!(
                        "  {} {}",
                        self.mark_done(),
                        outcome.dest.display()
                    ));
                }
                FileStatus::Unchanged if self.verbose && !self.quiet => {
                    self.line(&format!(
                        "  {} {}",
                        self.mark_same(),
                        outcome.dest.display()
                    ));
                }
                _ => {}
            }
        }

        if self.quiet {
            return Ok(());
        }

        self.line(&format!(
            "{} Migrated {} to {}: {} transformed, {} copied unchanged, {} failed",
            self.mark_done(),
            source.display(),
            dest.display(),
            Self::format_number(report.files_changed()),
            Self::format_number(report.files_unchanged()),
            Self::format_number(report.files_failed())
        ));

        if self.verbose {
            self.line(&format!(
                "  Directories created: {}",
                Self::format_number(report.directories_created)
            ));
            self.line(&format!("  Duration: {:.2?}", report.duration));
        }

        Ok(())
    }

    fn format_scan_result(
        &self,
        archive: &Path,
        resources: &[ScannedResource],
        report: &ScanReport,
        human_readable: bool,
    ) -> Result<()> {
        if self.quiet {
            for resource in resources {
                self.line(&resource.name);
            }
            return Ok(());
        }

        for resource in resources {
            let size = if human_readable {
                Self::format_size(resource.size)
            } else {
                resource.size.to_string()
            };
            self.line(&format!("{size:>10}  {}", resource.name));
        }

        self.line("");
        self.line(&format!(
            "Total: {} classes in {}, {} nested archives",
            Self::format_number(report.resources_collected),
            archive.display(),
            Self::format_number(report.nested_archives)
        ));

        if self.verbose {
            self.line(&format!(
                "  Nested extracted: {}, reused: {}",
                Self::format_number(report.nested_extracted),
                Self::format_number(report.nested_reused)
            ));
            self.line(&format!(
                "  Entries ignored: {}",
                Self::format_number(report.entries_ignored)
            ));
            self.line(&format!("  Read: {}", Self::format_size(report.bytes_read)));
            self.line(&format!("  Duration: {:.2?}", report.duration));
        }

        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("WARNING: {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(HumanFormatter::format_size(0), "0 B");
        assert_eq!(HumanFormatter::format_size(1023), "1023 B");
        assert_eq!(HumanFormatter::format_size(1024), "1.0 KB");
        assert_eq!(HumanFormatter::format_size(1536), "1.5 KB");
        assert_eq!(HumanFormatter::format_size(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(HumanFormatter::format_size(2 * 1024 * 1024 * 1024), "2.0 GB");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(HumanFormatter::format_number(0), "0");
        assert_eq!(HumanFormatter::format_number(999), "999");
        assert_eq!(HumanFormatter::format_number(1000), "1,000");
        assert_eq!(HumanFormatter::format_number(123_456), "123,456");
        assert_eq!(HumanFormatter::format_number(1_234_567), "1,234,567");
    }
}
