//! `marq export` command - dump the record collection as JSON
//!
//! Pretty-printed JSON of the full collection, to stdout by default or to
//! a file with `--output`. Pipe to a clipboard tool for the copy-paste
//! workflow.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use marq_core::error::{MarqError, Result};
use marq_core::store::GradeStore;

use crate::cli::Cli;
use crate::commands::dispatch;

/// Execute the export command
pub fn execute(cli: &Cli, output: Option<&Path>) -> Result<()> {
    let store = dispatch::store(cli)?;
    let records = store.list()?;
    let json = serde_json::to_string_pretty(&records)?;

    if let Some(output_path) = output {
        let mut file = File::create(output_path)
            .map_err(|e| MarqError::operation("create output file", e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| MarqError::operation("write output file", e))?;
        file.write_all(b"\n")
            .map_err(|e| MarqError::operation("write output file", e))?;

        if !cli.quiet {
            eprintln!(
                "exported {} records to {}",
                records.len(),
                output_path.display()
            );
        }
    } else {
        println!("{}", json);
    }

    Ok(())
}
