//! Aggregate statistics over saved grade records
//!
//! Backs the `marq overview` command: band distributions and summary
//! statistics, overall and per marker, with an optional course filter.

use crate::record::GradeRecord;
use crate::rubric::{Band, CourseVariant, Pillar, BANDS, PILLARS};
use crate::scoring;

/// Summary statistics for a set of final scores
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSummary {
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n−1); 0 for fewer than two scores
    pub std_dev: f64,
    pub min: i64,
    pub max: i64,
}

/// Summarize a set of scores; `None` when there are no records
pub fn summarize(scores: &[i64]) -> Option<ScoreSummary> {
    if scores.is_empty() {
        return None;
    }

    let n = scores.len();
    let mean = scores.iter().sum::<i64>() as f64 / n as f64;

    let mut sorted = scores.to_vec();
    sorted.sort_unstable();
    let mid = n / 2;
    let median = if n % 2 == 1 {
        sorted[mid] as f64
    } else {
        (sorted[mid - 1] + sorted[mid]) as f64 / 2.0
    };

    let std_dev = if n < 2 {
        0.0
    } else {
        let sum_sq: f64 = scores
            .iter()
            .map(|&s| {
                let d = s as f64 - mean;
                d * d
            })
            .sum();
        (sum_sq / (n - 1) as f64).sqrt()
    };

    Some(ScoreSummary {
        n,
        mean,
        median,
        std_dev,
        min: *sorted.first().unwrap_or(&0),
        max: *sorted.last().unwrap_or(&0),
    })
}

/// Count of scores falling in each band, in band order (highest first)
pub fn band_distribution(scores: &[i64]) -> Vec<(&'static Band, usize)> {
    BANDS
        .iter()
        .map(|band| {
            let count = scores
                .iter()
                .filter(|&&s| scoring::band_for_score(s).id == band.id)
                .count();
            (band, count)
        })
        .collect()
}

/// Records matching the course filter (all records when `None`)
pub fn filter_by_course(
    records: &[GradeRecord],
    course: Option<CourseVariant>,
) -> Vec<&GradeRecord> {
    records
        .iter()
        .filter(|r| course.is_none_or(|c| r.draft.course == c))
        .collect()
}

/// Distinct marker keys across the records, sorted
pub fn markers(records: &[&GradeRecord]) -> Vec<String> {
    let mut keys: Vec<String> = records.iter().map(|r| r.marker_key().to_string()).collect();
    keys.sort();
    keys.dedup();
    keys
}

/// Final scores of the given records
pub fn final_scores(records: &[&GradeRecord]) -> Vec<i64> {
    records.iter().map(|r| r.final_score).collect()
}

/// Mean score per pillar across the records
pub fn pillar_means(records: &[&GradeRecord]) -> Vec<(&'static Pillar, f64)> {
    PILLARS
        .iter()
        .map(|p| {
            let mean = if records.is_empty() {
                0.0
            } else {
                records
                    .iter()
                    .map(|r| r.draft.pillar_scores.get(p.id).copied().unwrap_or(0))
                    .sum::<i64>() as f64
                    / records.len() as f64
            };
            (p, mean)
        })
        .collect()
}
