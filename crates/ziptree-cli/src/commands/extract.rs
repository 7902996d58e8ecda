//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::cli::NameEncoding;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use std::env;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;
use ziptree_core::ArchiveReader;
use ziptree_core::Cp437;
use ziptree_core::NoopProgress;
use ziptree_core::ProgressCallback;
use ziptree_core::Utf8Lossy;
use ziptree_core::extract_dir_from;
use ziptree_core::extract_files_from;

pub fn execute(
    args: &ExtractArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let mut reader = add_archive_context(ArchiveReader::open(&args.archive), &args.archive)?;
    reader = match args.name_encoding {
        NameEncoding::Default => reader,
        NameEncoding::Cp437 => reader.with_name_codec(Box::new(Cp437)),
        NameEncoding::Utf8 => reader.with_name_codec(Box::new(Utf8Lossy)),
    };

    let extracted = if show_progress && CliProgress::should_show() {
        let mut progress = CliProgress::new("Extracting");
        run(args, &mut reader, &output_dir, &mut progress)?
    } else {
        run(args, &mut reader, &output_dir, &mut NoopProgress)?
    };

    formatter.format_extract_result(&output_dir, &extracted)
}

fn run(
    args: &ExtractArgs,
    reader: &mut ArchiveReader<File>,
    output_dir: &Path,
    progress: &mut dyn ProgressCallback,
) -> Result<Vec<PathBuf>> {
    let result = if args.entries.is_empty() {
        extract_dir_from(reader, output_dir, progress)
    } else {
        extract_files_from(reader, &args.entries, output_dir, progress)
    };
    add_archive_context(result, &args.archive)
}
