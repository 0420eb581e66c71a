//! `marq overview` command - aggregate statistics over saved records
//!
//! Band distributions and summary statistics, overall and per marker,
//! with an optional course-variant filter.

use marq_core::error::Result;
use marq_core::overview::{
    band_distribution, filter_by_course, final_scores, markers, pillar_means, summarize,
    ScoreSummary,
};
use marq_core::record::GradeRecord;
use marq_core::rubric::CourseVariant;
use marq_core::store::GradeStore;

use crate::cli::{Cli, OutputFormat};
use crate::commands::dispatch;

/// Execute the overview command
pub fn execute(cli: &Cli, course: Option<CourseVariant>) -> Result<()> {
    let store = dispatch::store(cli)?;
    let records = store.list()?;
    let filtered = filter_by_course(&records, course);

    match cli.format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&build_json(&filtered, course))?
        ),
        OutputFormat::Human => print_human(cli, &filtered, course),
    }

    Ok(())
}

fn build_json(records: &[&GradeRecord], course: Option<CourseVariant>) -> serde_json::Value {
    let scores = final_scores(records);

    let distribution: Vec<_> = band_distribution(&scores)
        .iter()
        .map(|(band, count)| {
            serde_json::json!({
                "band": band.id,
                "label": band.label,
                "range": band.range_label,
                "count": count,
            })
        })
        .collect();

    let means: Vec<_> = pillar_means(records)
        .iter()
        .map(|(pillar, mean)| {
            serde_json::json!({
                "pillar": pillar.id,
                "mean": mean,
                "max": pillar.max_points,
            })
        })
        .collect();

    let by_marker: serde_json::Map<String, serde_json::Value> = markers(records)
        .into_iter()
        .map(|marker| {
            let marker_scores: Vec<i64> = records
                .iter()
                .filter(|r| r.marker_key() == marker)
                .map(|r| r.final_score)
                .collect();
            (marker, summary_json(summarize(&marker_scores)))
        })
        .collect();

    serde_json::json!({
        "course": course.map(|c| c.to_string()),
        "total": records.len(),
        "distribution": distribution,
        "summary": summary_json(summarize(&scores)),
        "pillar_means": means,
        "by_marker": by_marker,
    })
}

fn summary_json(summary: Option<ScoreSummary>) -> serde_json::Value {
    match summary {
        None => serde_json::Value::Null,
        Some(s) => serde_json::json!({
            "n": s.n,
            "mean": s.mean,
            "median": s.median,
            "std_dev": s.std_dev,
            "min": s.min,
            "max": s.max,
        }),
    }
}

fn print_human(cli: &Cli, records: &[&GradeRecord], course: Option<CourseVariant>) {
    if records.is_empty() {
        if !cli.quiet {
            match course {
                Some(c) => println!("No saved grades for {}.", c.label()),
                None => println!("No saved grades yet. Complete a grading checklist and save it."),
            }
        }
        return;
    }

    let scores = final_scores(records);

    println!("Overall distribution (n={})", records.len());
    for (band, count) in band_distribution(&scores) {
        println!(
            "  {:<14} {:<8} {:<20} {}",
            band.label,
            band.range_label,
            "#".repeat(count),
            count
        );
    }

    if let Some(s) = summarize(&scores) {
        println!();
        println!(
            "Summary: mean {:.1}  median {:.1}  std dev {:.1}  min {}  max {}",
            s.mean, s.median, s.std_dev, s.min, s.max
        );
    }

    println!();
    println!("Pillar means:");
    for (pillar, mean) in pillar_means(records) {
        println!("  {:<30} {:.1}/{}", pillar.label, mean, pillar.max_points);
    }

    let marker_keys = markers(records);
    if marker_keys.len() > 1 {
        println!();
        println!("By marker:");
        for marker in marker_keys {
            let marker_scores: Vec<i64> = records
                .iter()
                .filter(|r| r.marker_key() == marker)
                .map(|r| r.final_score)
                .collect();
            if let Some(s) = summarize(&marker_scores) {
                println!(
                    "  {:<5} n={:<3} mean {:.1}  median {:.1}  std dev {:.1}",
                    marker, s.n, s.mean, s.median, s.std_dev
                );
            }
        }
    }
}
