//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;
use targuard_core::SecurityConfig;

#[derive(Parser)]
#[command(name = "targuard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
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
    /// Extract a tar archive, rejecting unsafe entries
    Extract(ExtractArgs),
    /// Check every entry of an archive without extracting it
    Verify(VerifyArgs),
    /// Stage a course upload and locate its manifest
    Import(ImportArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Limits and link policy shared by the commands that read archives.
#[derive(clap::Args)]
pub struct SecurityArgs {
    /// Maximum number of files to extract
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Maximum total extracted size in bytes (K, M, G, T suffixes)
    #[arg(long, value_parser = parse_byte_size)]
    pub max_total_size: Option<u64>,

    /// Maximum single file size in bytes (K, M, G, T suffixes)
    #[arg(long, value_parser = parse_byte_size)]
    pub max_file_size: Option<u64>,

    /// Reject all symlinks, even those that stay inside the target
    #[arg(long)]
    pub no_symlinks: bool,

    /// Reject all hardlinks, even those that stay inside the target
    #[arg(long)]
    pub no_hardlinks: bool,

    /// Preserve file permissions from archive (setuid/setgid always stripped)
    #[arg(long)]
    pub preserve_permissions: bool,
}

impl SecurityArgs {
    /// Builds the core configuration, keeping defaults for unset limits.
    pub fn to_config(&self) -> SecurityConfig {
        let defaults = SecurityConfig::default();
        SecurityConfig {
            max_file_size: self.max_file_size.unwrap_or(defaults.max_file_size),
            max_total_size: self.max_total_size.unwrap_or(defaults.max_total_size),
            max_file_count: self.max_files.unwrap_or(defaults.max_file_count),
            allow_symlinks: !self.no_symlinks,
            allow_hardlinks: !self.no_hardlinks,
            preserve_permissions: self.preserve_permissions,
        }
    }
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the archive file, or `-` for stdin
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Output directory (default: current directory)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    #[command(flatten)]
    pub security: SecurityArgs,
}

#[derive(clap::Args)]
pub struct VerifyArgs {
    /// Path to the archive file, or `-` for stdin
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Reject all symlinks
    #[arg(long)]
    pub no_symlinks: bool,

    /// Reject all hardlinks
    #[arg(long)]
    pub no_hardlinks: bool,
}

#[derive(clap::Args)]
pub struct ImportArgs {
    /// Path to the uploaded course archive, or `-` for stdin
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Parent directory for the scratch directory (default: system temp)
    #[arg(long, value_name = "DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Manifest file name to look for
    #[arg(long, value_name = "NAME", default_value = targuard_core::COURSE_MANIFEST)]
    pub manifest: String,

    /// Keep the extracted tree and print its location
    #[arg(long)]
    pub keep: bool,

    #[command(flatten)]
    pub security: SecurityArgs,
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_parse_byte_size() {
        assert_eq!(parse_byte_size("100").unwrap(), 100);
        assert_eq!(parse_byte_size("1K").unwrap(), 1024);
        assert_eq!(parse_byte_size("2M").unwrap(), 2 * 1024 * 1024);
        assert_eq!(parse_byte_size("3G").unwrap(), 3 * 1024 * 1024 * 1024);
        assert!(parse_byte_size("invalid").is_err());
        assert!(parse_byte_size("").is_err());
        assert!(parse_byte_size("17592186044416G").is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_security_args_defaults() {
        let cli = Cli::parse_from(["targuard", "extract", "upload.tar.gz"]);
        let Commands::Extract(args) = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(args.security.to_config(), SecurityConfig::default());
    }

    #[test]
    fn test_security_args_overrides() {
        let cli = Cli::parse_from([
            "targuard",
            "import",
            "upload.tar.gz",
            "--no-symlinks",
            "--max-total-size",
            "10M",
            "--max-files",
            "5",
        ]);
        let Commands::Import(args) = cli.command else {
            panic!("expected import");
        };
        let config = args.security.to_config();
        assert!(!config.allow_symlinks);
        assert!(config.allow_hardlinks);
        assert_eq!(config.max_total_size, 10 * 1024 * 1024);
        assert_eq!(config.max_file_count, 5);
        assert_eq!(args.manifest, "course.xml");
    }
}
