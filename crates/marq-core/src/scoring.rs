//! Pure scoring functions over the rubric tables
//!
//! All functions here are deterministic and side-effect free. Per-pillar
//! scores are expected to arrive already clamped to `[0, max_points]` by
//! the draft's mutation surface; only the final sum is clamped here.

use std::collections::BTreeMap;

use crate::rubric::{self, Band, Pillar, BANDS};

/// Fraction of a pillar's maximum awarded when every checklist item is
/// ticked. Ticking everything lands at the top of the "excellent" band;
/// the "outstanding" band is reserved for deliberate manual judgment.
pub const SUGGESTED_CEILING: f64 = 0.84;

/// Marker-applied nudge to the raw pillar-score sum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HolisticAdjustment {
    Up,
    #[default]
    None,
    Down,
}

impl HolisticAdjustment {
    /// The score delta this adjustment applies
    pub fn delta(&self) -> i64 {
        match self {
            HolisticAdjustment::Up => 2,
            HolisticAdjustment::None => 0,
            HolisticAdjustment::Down => -2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HolisticAdjustment::Up => "Push up (+2)",
            HolisticAdjustment::None => "No change",
            HolisticAdjustment::Down => "Push down (−2)",
        }
    }
}

/// Suggested score for a pillar from its ticked checklist items.
///
/// Zero ticks suggest zero; otherwise the tick ratio is mapped onto
/// `[0, max_points × SUGGESTED_CEILING]` and rounded.
pub fn suggested_pillar_score(pillar: &Pillar, checks: &BTreeMap<String, bool>) -> i64 {
    let items = rubric::pillar_items(pillar.id);
    let ticked = items
        .iter()
        .filter(|item| checks.get(item.id).copied().unwrap_or(false))
        .count();
    if ticked == 0 {
        return 0;
    }
    let ratio = ticked as f64 / items.len() as f64;
    (ratio * pillar.max_points as f64 * SUGGESTED_CEILING).round() as i64
}

/// The strictest score cap among the red flags currently set, or 100 if
/// none are set. Caps compose by minimum, never additively.
pub fn active_score_cap(red_flags: &BTreeMap<String, bool>) -> i64 {
    rubric::all_red_flags()
        .filter(|rf| red_flags.get(rf.id).copied().unwrap_or(false))
        .map(|rf| rf.score_cap)
        .min()
        .unwrap_or(100)
}

/// Final score: sum the pillar scores, apply the holistic adjustment, then
/// clamp to `[0, cap]`. The cap is applied last, so a red flag can suppress
/// the adjustment but never the reverse.
pub fn final_score(
    pillar_scores: &BTreeMap<String, i64>,
    adjustment: HolisticAdjustment,
    red_flags: &BTreeMap<String, bool>,
) -> i64 {
    let raw: i64 = rubric::PILLARS
        .iter()
        .map(|p| pillar_scores.get(p.id).copied().unwrap_or(0))
        .sum();
    let cap = active_score_cap(red_flags);
    (raw + adjustment.delta()).clamp(0, cap)
}

/// Ordered threshold lookup over the five fixed bands
pub fn band_for_score(score: i64) -> &'static Band {
    BANDS
        .iter()
        .find(|b| score >= b.floor)
        .unwrap_or(&BANDS[BANDS.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rubric::{pillar, pillar_items, PILLARS};

    fn checks_with_first_n_ticked(pillar_id: &str, n: usize) -> BTreeMap<String, bool> {
        pillar_items(pillar_id)
            .iter()
            .enumerate()
            .map(|(i, item)| (item.id.to_string(), i < n))
            .collect()
    }

    fn flags(ids: &[&str]) -> BTreeMap<String, bool> {
        ids.iter().map(|id| (id.to_string(), true)).collect()
    }

    fn scores(values: &[(&str, i64)]) -> BTreeMap<String, i64> {
        values
            .iter()
            .map(|(id, v)| (id.to_string(), *v))
            .collect()
    }

    #[test]
    fn test_suggested_score_zero_ticks() {
        for p in &PILLARS {
            let checks = checks_with_first_n_ticked(p.id, 0);
            assert_eq!(suggested_pillar_score(p, &checks), 0);
        }
    }

    #[test]
    fn test_suggested_score_monotonic_and_capped() {
        for p in &PILLARS {
            let n = pillar_items(p.id).len();
            let ceiling = (p.max_points as f64 * SUGGESTED_CEILING).round() as i64;
            let mut prev = 0;
            for ticked in 0..=n {
                let score = suggested_pillar_score(p, &checks_with_first_n_ticked(p.id, ticked));
                assert!(score >= prev, "non-monotonic at {} ticks for {}", ticked, p.id);
                assert!(score <= ceiling, "score {} above ceiling for {}", score, p.id);
                prev = score;
            }
        }
    }

    #[test]
    fn test_suggested_score_all_ticked_tops_out_below_max() {
        let p = pillar("metacognitive").unwrap();
        let checks = checks_with_first_n_ticked(p.id, 7);
        assert_eq!(suggested_pillar_score(p, &checks), 25); // round(30 × 0.84)
        assert!(suggested_pillar_score(p, &checks) < p.max_points);
    }

    #[test]
    fn test_active_cap_no_flags() {
        assert_eq!(active_score_cap(&BTreeMap::new()), 100);
        // explicitly false flags count as unset
        let mut unset = BTreeMap::new();
        unset.insert("rf_generic".to_string(), false);
        assert_eq!(active_score_cap(&unset), 100);
    }

    #[test]
    fn test_active_cap_takes_minimum_never_stacks() {
        // caps 59 and 69 → 59, not 69 or 128
        let set = flags(&["rf_no_reflection", "rf_kts_not_analytical"]);
        assert_eq!(active_score_cap(&set), 59);
        assert_eq!(active_score_cap(&flags(&["rf_kts_label"])), 84);
        assert_eq!(
            active_score_cap(&flags(&["rf_kts_label", "rf_performed"])),
            74
        );
    }

    #[test]
    fn test_final_score_adjustment_applied_before_cap() {
        let ps = scores(&[
            ("metacognitive", 28),
            ("kts", 23),
            ("transformation", 23),
            ("pathway", 18),
        ]);
        // raw 92, up, no flags → 94
        assert_eq!(
            final_score(&ps, HolisticAdjustment::Up, &BTreeMap::new()),
            94
        );
        // raw 92, up, cap 59 → 59: cap dominates the adjustment
        assert_eq!(
            final_score(&ps, HolisticAdjustment::Up, &flags(&["rf_no_evidence"])),
            59
        );
    }

    #[test]
    fn test_final_score_clamps_at_zero_and_hundred() {
        let zero = scores(&[]);
        assert_eq!(
            final_score(&zero, HolisticAdjustment::Down, &BTreeMap::new()),
            0
        );
        let full = scores(&[
            ("metacognitive", 30),
            ("kts", 25),
            ("transformation", 25),
            ("pathway", 20),
        ]);
        assert_eq!(
            final_score(&full, HolisticAdjustment::Up, &BTreeMap::new()),
            100
        );
    }

    #[test]
    fn test_final_score_idempotent() {
        let ps = scores(&[("metacognitive", 15), ("kts", 20)]);
        let rf = flags(&["rf_vague_pathway"]);
        let first = final_score(&ps, HolisticAdjustment::Down, &rf);
        let second = final_score(&ps, HolisticAdjustment::Down, &rf);
        assert_eq!(first, second);
        assert!(first <= active_score_cap(&rf));
    }

    #[test]
    fn test_band_thresholds() {
        assert_eq!(band_for_score(0).id, "unsatisfactory");
        assert_eq!(band_for_score(49).id, "unsatisfactory");
        assert_eq!(band_for_score(50).id, "satisfactory");
        assert_eq!(band_for_score(59).id, "satisfactory");
        assert_eq!(band_for_score(60).id, "good");
        assert_eq!(band_for_score(69).id, "good");
        assert_eq!(band_for_score(70).id, "excellent");
        assert_eq!(band_for_score(84).id, "excellent");
        assert_eq!(band_for_score(85).id, "outstanding");
        assert_eq!(band_for_score(100).id, "outstanding");
    }

    #[test]
    fn test_bands_partition_entire_range() {
        // every score in [0,100] maps to exactly one band, and the only
        // discontinuities are at 50, 60, 70, 85
        let mut boundaries = Vec::new();
        for score in 1..=100 {
            if band_for_score(score).id != band_for_score(score - 1).id {
                boundaries.push(score);
            }
        }
        assert_eq!(boundaries, vec![50, 60, 70, 85]);
    }
}
