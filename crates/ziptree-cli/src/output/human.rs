//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use std::path::Path;
use std::path::PathBuf;
use ziptree_core::CompressReport;
use ziptree_core::EntryInfo;

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
        let s = n.to_string();
        let mut result = String::new();

        for (i, c) in s.chars().rev().enumerate() {
            if i > 0 && i % 3 == 0 {
                result.push(',');
            }
            result.push(c);
        }

        result.chars().rev().collect()
    }

    fn headline(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(message);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_compress_result(&self, archive: &Path, report: &CompressReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&format!("Archive created: {}", archive.display()));
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "  Files added:      {}",
            Self::format_number(report.files_added)
        ));
        let _ = self.term.write_line(&format!(
            "  Total size:       {}",
            Self::format_size(report.bytes_written)
        ));

        if report.bytes_compressed > 0 {
            let _ = self.term.write_line(&format!(
                "  Archive size:     {}",
                Self::format_size(report.bytes_compressed)
            ));
            let _ = self.term.write_line(&format!(
                "  Compression:      {:.1}%",
                report.compression_percentage()
            ));
        }

        if report.files_skipped > 0 {
            let _ = self
                .term
                .write_line(&format!("  Files skipped:    {}", report.files_skipped));
        }

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
            for entry in &report.entries {
                let _ = self.term.write_line(&format!("    {entry}"));
            }
        }

        if report.has_warnings() {
            let _ = self.term.write_line("");
            if self.use_colors {
                let _ = self
                    .term
                    .write_line(&format!("{}", style("Warnings:").yellow().bold()));
            } else {
                let _ = self.term.write_line("Warnings:");
            }
            for warning in &report.warnings {
                let _ = self.term.write_line(&format!("  - {warning}"));
            }
        }

        Ok(())
    }

    fn format_extract_result(&self, output_dir: &Path, extracted: &[PathBuf]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline("Extraction complete");
        let _ = self
            .term
            .write_line(&format!("  Output directory: {}", output_dir.display()));
        let _ = self.term.write_line(&format!(
            "  Entries extracted: {}",
            Self::format_number(extracted.len())
        ));

        if self.verbose {
            for path in extracted {
                let _ = self.term.write_line(&format!("    {}", path.display()));
            }
        }

        Ok(())
    }

    fn format_entry_names(&self, names: &[String]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for name in names {
            let _ = self.term.write_line(name);
        }

        Ok(())
    }

    fn format_entry_details(&self, entries: &[EntryInfo], human_readable: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let mut total_size = 0u64;
        for entry in entries {
            total_size += entry.size;

            let size_str = if human_readable {
                Self::format_size(entry.size)
            } else {
                entry.size.to_string()
            };
            let mode_str = entry
                .permissions()
                .map_or_else(|| "-".to_string(), |m| format!("{m:o}"));
            let type_char = if entry.is_dir { "d" } else { "-" };

            let _ = self.term.write_line(&format!(
                "{type_char}{mode_str:<6} {size_str:>10}  {}",
                entry.name
            ));
        }

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "Total: {} entries, {}",
            Self::format_number(entries.len()),
            Self::format_size(total_size)
        ));

        Ok(())
    }

    fn format_error(&self, _operation: &str, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:#}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:#}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("WARNING: {message}"));
        }
    }
}
