//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use ziptree_core::CompressReport;
use ziptree_core::EntryInfo;

pub struct JsonFormatter;

#[derive(Serialize)]
struct CompressOutput {
    archive: String,
    files_added: usize,
    entries: Vec<String>,
    bytes_written: u64,
    bytes_compressed: u64,
    compression_ratio: f64,
    compression_percentage: f64,
    files_skipped: usize,
    duration_ms: u128,
    warnings: Vec<String>,
}

#[derive(Serialize)]
struct ExtractOutput {
    output_dir: String,
    entries_extracted: usize,
    paths: Vec<String>,
}

#[derive(Serialize)]
struct EntryOutput<'a> {
    name: &'a str,
    size: u64,
    compressed_size: u64,
    mode: Option<u32>,
    is_dir: bool,
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn compress_output(archive: &Path, report: &CompressReport) -> CompressOutput {
        CompressOutput {
            archive: archive.display().to_string(),
            files_added: report.files_added,
            entries: report.entries.clone(),
            bytes_written: report.bytes_written,
            bytes_compressed: report.bytes_compressed,
            compression_ratio: report.compression_ratio(),
            compression_percentage: report.compression_percentage(),
            files_skipped: report.files_skipped,
            duration_ms: report.duration.as_millis(),
            warnings: report.warnings.clone(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_compress_result(&self, archive: &Path, report: &CompressReport) -> Result<()> {
        let output = JsonOutput::success("compress", Self::compress_output(archive, report));
        Self::output(&output)
    }

    fn format_extract_result(&self, output_dir: &Path, extracted: &[PathBuf]) -> Result<()> {
        let data = ExtractOutput {
            output_dir: output_dir.display().to_string(),
            entries_extracted: extracted.len(),
            paths: extracted.iter().map(|p| p.display().to_string()).collect(),
        };
        Self::output(&JsonOutput::success("extract", data))
    }

    fn format_entry_names(&self, names: &[String]) -> Result<()> {
        Self::output(&JsonOutput::success("list", names))
    }

    fn format_entry_details(&self, entries: &[EntryInfo], _human_readable: bool) -> Result<()> {
        let data: Vec<EntryOutput<'_>> = entries
            .iter()
            .map(|e| EntryOutput {
                name: &e.name,
                size: e.size,
                compressed_size: e.compressed_size,
                mode: e.permissions(),
                is_dir: e.is_dir,
            })
            .collect();
        Self::output(&JsonOutput::success("list", data))
    }

    fn format_error(&self, operation: &str, error: &anyhow::Error) {
        let output = JsonOutput::error(operation, format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData<'a> {
            message: &'a str,
        }

        let output = JsonOutput::success("warning", WarningData { message });
        let _ = Self::output(&output);
    }
}
