//! Compress command implementation.

use crate::cli::CompressArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Result;
use anyhow::bail;
use ziptree_core::CompressConfig;
use ziptree_core::CompressReport;
use ziptree_core::NoopProgress;
use ziptree_core::ProgressCallback;
use ziptree_core::compress_dir_with;
use ziptree_core::compress_files_with;

pub fn execute(
    args: &CompressArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    if args.archive.exists() && !args.force {
        bail!(
            "Archive '{}' already exists\n\
             HINT: Use --force to overwrite it.",
            args.archive.display()
        );
    }

    let config = build_config(args);

    let report = if show_progress && CliProgress::should_show() {
        let mut progress = CliProgress::new("Compressing");
        run(args, &config, &mut progress)?
    } else {
        run(args, &config, &mut NoopProgress)?
    };

    for warning in &report.warnings {
        log::debug!("compress warning: {warning}");
    }

    formatter.format_compress_result(&args.archive, &report)
}

fn build_config(args: &CompressArgs) -> CompressConfig {
    let mut config = CompressConfig::new()
        .with_include_hidden(args.include_hidden)
        .with_follow_symlinks(args.follow_symlinks)
        .with_exclude_patterns(args.exclude.clone())
        .with_preserve_permissions(!args.no_permissions);

    if let Some(level) = args.compression_level {
        config = config.with_compression_level(level);
    }

    config
}

fn run(
    args: &CompressArgs,
    config: &CompressConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<CompressReport> {
    let recursive = !args.no_recursive;

    match args.sources.as_slice() {
        [dir] if dir.is_dir() => add_archive_context(
            compress_dir_with(&args.archive, dir, recursive, config, progress),
            &args.archive,
        ),
        sources => {
            if let Some(dir) = sources.iter().find(|s| s.is_dir()) {
                bail!(
                    "'{}' is a directory\n\
                     HINT: Pass a single directory, or only files.",
                    dir.display()
                );
            }
            add_archive_context(
                compress_files_with(&args.archive, sources, config, progress),
                &args.archive,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::cli::Commands;
    use clap::Parser;

    fn parse(argv: &[&str]) -> CompressArgs {
        match Cli::try_parse_from(argv).map(|c| c.command) {
            Ok(Commands::Compress(args)) => args,
            _ => panic!("expected compress arguments"),
        }
    }

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(&parse(&["ziptree", "compress", "a.zip", "src"]));
        assert_eq!(config.compression_level, Some(6));
        assert!(config.preserve_permissions);
        assert!(!config.include_hidden);
    }

    #[test]
    fn test_build_config_flags() {
        let config = build_config(&parse(&[
            "ziptree",
            "compress",
            "-l",
            "0",
            "--include-hidden",
            "--no-permissions",
            "-x",
            "*.log",
            "a.zip",
            "src",
        ]));
        assert_eq!(config.compression_level, Some(0));
        assert!(config.include_hidden);
        assert!(!config.preserve_permissions);
        assert_eq!(config.exclude_patterns, vec!["*.log"]);
    }
}
