//! `marq show` command - full detail of one saved record

use marq_core::error::{MarqError, Result};
use marq_core::record::GradeRecord;
use marq_core::rubric::{self, PILLARS};
use marq_core::store::GradeStore;

use crate::cli::{Cli, OutputFormat};
use crate::commands::dispatch;

/// Execute the show command
pub fn execute(cli: &Cli, index: usize) -> Result<()> {
    let store = dispatch::store(cli)?;
    let records = store.list()?;
    let record = records
        .get(index)
        .ok_or(MarqError::InvalidIndex { index })?;

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(record)?),
        OutputFormat::Human => print_record(index, record),
    }

    Ok(())
}

fn print_record(index: usize, record: &GradeRecord) {
    let draft = &record.draft;
    println!("Record {}", index);
    println!("  Student:  {}", draft.student_id);
    println!("  Marker:   {}", record.marker_key());
    println!("  Variation: {}", draft.course.label());
    if let Some(saved) = record.saved_at {
        println!("  Saved:    {}", saved.format("%Y-%m-%d %H:%M:%S"));
    }
    if !draft.initial_band.is_empty() {
        let label = rubric::band(&draft.initial_band)
            .map(|b| b.label)
            .unwrap_or(draft.initial_band.as_str());
        println!("  Initial impression: {}", label);
    }

    println!();
    for pillar in &PILLARS {
        let score = draft.pillar_scores.get(pillar.id).copied().unwrap_or(0);
        let ticked = rubric::pillar_items(pillar.id)
            .iter()
            .filter(|i| draft.pillar_checks.get(i.id).copied().unwrap_or(false))
            .count();
        println!(
            "  {} ({}): {}/{} — {}/{} checks",
            pillar.label,
            pillar.weight_label,
            score,
            pillar.max_points,
            ticked,
            rubric::pillar_items(pillar.id).len()
        );
        if let Some(feedback) = draft.pillar_feedback.get(pillar.id) {
            if !feedback.is_empty() {
                println!("    {}", feedback);
            }
        }
    }

    let flagged: Vec<_> = rubric::all_red_flags()
        .filter(|rf| draft.red_flags.get(rf.id).copied().unwrap_or(false))
        .collect();
    if !flagged.is_empty() {
        println!();
        println!("  Red flags:");
        for rf in flagged {
            println!("    [cap {}] {}", rf.score_cap, rf.label);
        }
    }

    match draft.cross_pillar_adj.delta() {
        0 => {}
        delta => {
            println!();
            print!("  Holistic adjustment: {:+}", delta);
            if draft.adj_reason.is_empty() {
                println!();
            } else {
                println!(" ({})", draft.adj_reason);
            }
        }
    }

    if !draft.overall_comment.is_empty() {
        println!();
        println!("  Overall comment:");
        println!("    {}", draft.overall_comment);
    }

    println!();
    println!(
        "  Final: {}/100 — {}",
        record.final_score,
        record.band_label()
    );
}
