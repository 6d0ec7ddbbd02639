//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use jarshift_core::transform::PrefixRule;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jarshift")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Migrate an archive, a single file, or a directory tree
    Migrate(MigrateArgs),
    /// List the class resources reachable from an archive
    Scan(ScanArgs),
    /// Generate shell completions
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
pub struct MigrateArgs {
    /// JAR, WAR, other file, or directory to migrate
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Output file, or output directory when SOURCE is a directory
    #[arg(value_name = "DEST")]
    pub dest: PathBuf,

    /// Package prefix to rename, e.g. javax.servlet=jakarta.servlet (can be repeated)
    #[arg(short, long = "rule", value_name = "FROM=TO", required = true, value_parser = parse_rule)]
    pub rules: Vec<PrefixRule>,

    /// Rewrite nested JAR/WAR archives recursively
    #[arg(long)]
    pub rewrite_nested: bool,

    /// Compression level (0 = store, 1-9 = deflate)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(0..=9))]
    pub compression_level: Option<u8>,

    /// Copy entries matching this pattern untouched (can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Largest entry read into memory, in bytes (suffixes K, M, G)
    #[arg(long, value_parser = parse_byte_size)]
    pub max_entry_size: Option<u64>,

    /// Overwrite DEST if it exists, or write into a non-empty DEST directory
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Keep migrating the remaining files of a directory after a failure
    #[arg(short = 'k', long)]
    pub keep_going: bool,
}

#[derive(clap::Args)]
pub struct ScanArgs {
    /// Path to the archive or class file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Open nested archives in memory instead of extracting them next to ARCHIVE
    #[arg(long)]
    pub in_memory: bool,

    /// Skip entries matching this pattern (can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Largest entry read into memory, in bytes (suffixes K, M, G)
    #[arg(long, value_parser = parse_byte_size)]
    pub max_entry_size: Option<u64>,

    /// Show sizes in human-readable format
    #[arg(short = 'H', long)]
    pub human_readable: bool,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse a `FROM=TO` package rule
fn parse_rule(s: &str) -> Result<PrefixRule, String> {
    s.parse::<PrefixRule>().map_err(|e| e.to_string())
}

/// Parse byte size with optional suffix (K, M, G)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}
