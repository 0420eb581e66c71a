//! `marq delete` command - delete a saved record by position
//!
//! Indices are positional against the current snapshot; use `marq list`
//! to find the right one immediately before deleting.

use marq_core::error::Result;
use marq_core::store::GradeStore;

use crate::cli::{Cli, OutputFormat};
use crate::commands::dispatch;

/// Execute the delete command
pub fn execute(cli: &Cli, index: usize) -> Result<()> {
    let store = dispatch::store(cli)?;
    let updated = store.delete_at(index)?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&updated)?),
        OutputFormat::Human => {
            if !cli.quiet {
                println!(
                    "Deleted record {} ({} record{} remain)",
                    index,
                    updated.len(),
                    if updated.len() == 1 { "" } else { "s" }
                );
            }
        }
    }

    Ok(())
}
