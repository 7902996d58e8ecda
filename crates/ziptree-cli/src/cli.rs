//! CLI argument parsing using clap.

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ziptree")]
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
    /// Compress files or a directory tree into a ZIP archive
    Compress(CompressArgs),
    /// Extract archive contents
    Extract(ExtractArgs),
    /// List archive contents without extraction
    List(ListArgs),
    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Args)]
pub struct CompressArgs {
    /// Output archive file path
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// A single directory, or one or more files
    #[arg(value_name = "SOURCE", required = true)]
    pub sources: Vec<PathBuf>,

    /// Only add the direct files of the directory
    #[arg(long)]
    pub no_recursive: bool,

    /// Include hidden files and directories
    #[arg(long)]
    pub include_hidden: bool,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Exclude pattern (glob, can be repeated)
    #[arg(long = "exclude", short = 'x', value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Compression level (0 = store, 1-9 = deflate)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(0..=9))]
    pub compression_level: Option<u8>,

    /// Do not record file permissions
    #[arg(long)]
    pub no_permissions: bool,

    /// Overwrite the archive if it exists
    #[arg(short = 'f', long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct ExtractArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Output directory (default: current directory)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Extract only this entry (can be repeated)
    #[arg(short = 'e', long = "entry", value_name = "NAME")]
    pub entries: Vec<String>,

    /// How to decode entry names
    #[arg(long, value_enum, default_value_t = NameEncoding::Default)]
    pub name_encoding: NameEncoding,
}

/// Entry-name decoding selectable on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum NameEncoding {
    /// UTF-8 when flagged by the archive, CP437 otherwise
    Default,
    /// Always CP437
    Cp437,
    /// Always UTF-8
    Utf8,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Show detailed file information
    #[arg(short, long)]
    pub long: bool,

    /// Show sizes in human-readable format
    #[arg(short = 'H', long)]
    pub human_readable: bool,
}
