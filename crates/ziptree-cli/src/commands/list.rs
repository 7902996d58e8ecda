//! List command implementation

use crate::cli::ListArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use ziptree_core::list_entries;
use ziptree_core::list_entry_info;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    if args.long {
        let entries = add_archive_context(list_entry_info(&args.archive), &args.archive)?;
        formatter.format_entry_details(&entries, args.human_readable)
    } else {
        let names = add_archive_context(list_entries(&args.archive), &args.archive)?;
        formatter.format_entry_names(&names)
    }
}
