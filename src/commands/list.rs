//! `marq list` command - list saved grade records
//!
//! One row per record with its collection index, so the index can be fed
//! straight to `marq show` / `marq delete`. The `--course` filter hides
//! rows but keeps the original indices.

use marq_core::error::Result;
use marq_core::record::GradeRecord;
use marq_core::rubric::CourseVariant;
use marq_core::store::GradeStore;

use crate::cli::{Cli, OutputFormat};
use crate::commands::dispatch;

/// Execute the list command
pub fn execute(cli: &Cli, course: Option<CourseVariant>) -> Result<()> {
    let store = dispatch::store(cli)?;
    let records = store.list()?;

    let rows: Vec<(usize, &GradeRecord)> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| course.is_none_or(|c| r.draft.course == c))
        .collect();

    match cli.format {
        OutputFormat::Json => {
            let filtered: Vec<&GradeRecord> = rows.iter().map(|(_, r)| *r).collect();
            println!("{}", serde_json::to_string_pretty(&filtered)?);
        }
        OutputFormat::Human => {
            if rows.is_empty() {
                if !cli.quiet {
                    println!("No saved grades yet. Complete a grading checklist and save it.");
                }
                return Ok(());
            }
            for (index, record) in rows {
                println!(
                    "{:>3}  {:<16} {:<5} {:<18} {:>3}  {:<14} {}",
                    index,
                    placeholder(&record.draft.student_id),
                    placeholder(&record.draft.marker_initials),
                    record.draft.course.label(),
                    record.final_score,
                    record.band_label(),
                    record
                        .saved_at
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default()
                );
            }
        }
    }

    Ok(())
}

fn placeholder(value: &str) -> &str {
    if value.is_empty() {
        "—"
    } else {
        value
    }
}
