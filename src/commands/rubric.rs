//! `marq rubric` command - print the grading rubric
//!
//! Reference output for markers: pillars with their checklists, red flags
//! with their caps, and the band thresholds.

use marq_core::error::Result;
use marq_core::rubric::{
    pillar_items, RedFlag, BANDS, CRITICAL_RED_FLAGS, CROSS_PILLAR_CHECKS, INITIAL_CHECKS,
    MODERATE_RED_FLAGS, PILLARS,
};

use crate::cli::{Cli, OutputFormat};

/// Execute the rubric command
pub fn execute(cli: &Cli) -> Result<()> {
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&build_json())?),
        OutputFormat::Human => print_human(),
    }
    Ok(())
}

fn build_json() -> serde_json::Value {
    let pillars: Vec<_> = PILLARS
        .iter()
        .map(|p| {
            let items: Vec<_> = pillar_items(p.id)
                .iter()
                .map(|i| serde_json::json!({ "id": i.id, "label": i.label }))
                .collect();
            serde_json::json!({
                "id": p.id,
                "label": p.label,
                "max_points": p.max_points,
                "weight": p.weight_label,
                "items": items,
            })
        })
        .collect();

    let flag_json = |flags: &[RedFlag]| -> Vec<serde_json::Value> {
        flags
            .iter()
            .map(|rf| serde_json::json!({ "id": rf.id, "label": rf.label, "cap": rf.score_cap }))
            .collect()
    };

    serde_json::json!({
        "pillars": pillars,
        "red_flags": {
            "critical": flag_json(&CRITICAL_RED_FLAGS),
            "moderate": flag_json(&MODERATE_RED_FLAGS),
        },
        "cross_pillar_checks": CROSS_PILLAR_CHECKS
            .iter()
            .map(|c| serde_json::json!({ "id": c.id, "label": c.label }))
            .collect::<Vec<_>>(),
        "initial_checks": INITIAL_CHECKS
            .iter()
            .map(|c| serde_json::json!({ "id": c.id, "label": c.label }))
            .collect::<Vec<_>>(),
        "bands": BANDS
            .iter()
            .map(|b| serde_json::json!({ "id": b.id, "label": b.label, "range": b.range_label }))
            .collect::<Vec<_>>(),
    })
}

fn print_human() {
    println!("Pillars:");
    for pillar in &PILLARS {
        println!(
            "  {} ({}) — {} points",
            pillar.label, pillar.weight_label, pillar.max_points
        );
        for item in pillar_items(pillar.id) {
            println!("    - {}", item.label);
        }
    }

    println!();
    println!("Red flags (critical — cap at Satisfactory/Good):");
    for rf in &CRITICAL_RED_FLAGS {
        println!("  [cap {:>2}] {}", rf.score_cap, rf.label);
    }
    println!("Red flags (moderate — cap at Good/Excellent):");
    for rf in &MODERATE_RED_FLAGS {
        println!("  [cap {:>2}] {}", rf.score_cap, rf.label);
    }

    println!();
    println!("Cross-pillar checks (informational):");
    for check in &CROSS_PILLAR_CHECKS {
        println!("  - {}", check.label);
    }

    println!();
    println!("Bands:");
    for band in &BANDS {
        println!("  {:<14} {}", band.label, band.range_label);
    }
}
