//! ziptree - compress, extract and list ZIP archives from the command line.

mod cli;
mod commands;
mod error;
mod output;
mod progress;

use clap::Parser;
use env_logger::Env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);
    let show_progress = !cli.quiet && !cli.json;

    let (operation, result) = match &cli.command {
        cli::Commands::Compress(args) => (
            "compress",
            commands::compress::execute(args, &*formatter, show_progress),
        ),
        cli::Commands::Extract(args) => (
            "extract",
            commands::extract::execute(args, &*formatter, show_progress),
        ),
        cli::Commands::List(args) => ("list", commands::list::execute(args, &*formatter)),
        cli::Commands::Completion { shell } => {
            commands::completion::execute(*shell);
            ("completion", Ok(()))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            formatter.format_error(operation, &err);
            ExitCode::FAILURE
        }
    }
}
