//! The in-progress grade for one student's grading session
//!
//! A single live [`GradeDraft`] is owned by the wizard for the lifetime of
//! a session and replaced wholesale after a successful save. Fields are
//! public (the record serialization reads them directly) but mutation
//! should go through the methods here: they are the clamp/normalization
//! surface the scoring formula assumes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MarqError, Result};
use crate::record::GradeRecord;
use crate::rubric::{self, CourseVariant, PILLARS};
use crate::scoring::{self, HolisticAdjustment};

/// Final sanity checks; informational only, never feed the formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolisticChecks {
    pub feels_right: bool,
    pub consistent: bool,
    pub no_red_flags: bool,
    pub moderation: bool,
}

/// Mutable form state for one grading session.
///
/// Serializes with camelCase field names to stay wire-compatible with the
/// persisted record collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeDraft {
    pub student_id: String,
    pub marker_initials: String,
    pub course: CourseVariant,
    pub initial_checks: BTreeMap<String, bool>,
    /// Band id from the first read-through, or empty when not yet chosen
    pub initial_band: String,
    pub pillar_checks: BTreeMap<String, bool>,
    pub pillar_scores: BTreeMap<String, i64>,
    pub pillar_feedback: BTreeMap<String, String>,
    pub red_flags: BTreeMap<String, bool>,
    pub cross_pillar: BTreeMap<String, bool>,
    pub cross_pillar_adj: HolisticAdjustment,
    pub adj_reason: String,
    pub overall_comment: String,
    pub holistic: HolisticChecks,
}

impl Default for GradeDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl GradeDraft {
    /// A fresh draft with every checklist key present and unticked, every
    /// pillar score at 0, and the default course variant
    pub fn new() -> Self {
        let mut pillar_checks = BTreeMap::new();
        let mut pillar_scores = BTreeMap::new();
        let mut pillar_feedback = BTreeMap::new();
        for p in &PILLARS {
            pillar_scores.insert(p.id.to_string(), 0);
            pillar_feedback.insert(p.id.to_string(), String::new());
            for item in rubric::pillar_items(p.id) {
                pillar_checks.insert(item.id.to_string(), false);
            }
        }

        GradeDraft {
            student_id: String::new(),
            marker_initials: String::new(),
            course: CourseVariant::default(),
            initial_checks: rubric::INITIAL_CHECKS
                .iter()
                .map(|c| (c.id.to_string(), false))
                .collect(),
            initial_band: String::new(),
            pillar_checks,
            pillar_scores,
            pillar_feedback,
            red_flags: rubric::all_red_flags()
                .map(|rf| (rf.id.to_string(), false))
                .collect(),
            cross_pillar: rubric::CROSS_PILLAR_CHECKS
                .iter()
                .map(|c| (c.id.to_string(), false))
                .collect(),
            cross_pillar_adj: HolisticAdjustment::None,
            adj_reason: String::new(),
            overall_comment: String::new(),
            holistic: HolisticChecks::default(),
        }
    }

    /// Discard all entered data and start over
    pub fn reset(&mut self) {
        *self = GradeDraft::new();
    }

    /// Marker initials are stored uppercased and truncated to 4 characters
    pub fn set_marker_initials(&mut self, raw: &str) {
        self.marker_initials = raw.trim().to_uppercase().chars().take(4).collect();
    }

    /// Set a pillar score, clamped to `[0, max_points]`
    pub fn set_pillar_score(&mut self, pillar_id: &str, value: i64) -> Result<()> {
        let pillar = rubric::pillar(pillar_id).ok_or_else(|| MarqError::UnknownPillar {
            id: pillar_id.to_string(),
        })?;
        self.pillar_scores
            .insert(pillar.id.to_string(), value.clamp(0, pillar.max_points));
        Ok(())
    }

    /// Toggle a pillar checklist item.
    ///
    /// When the pillar's score still matches the previous suggestion (or is
    /// untouched at 0), it follows the new suggestion; a manually adjusted
    /// score is left alone.
    pub fn toggle_pillar_check(&mut self, item_id: &str) -> Result<()> {
        let pillar = rubric::pillar_for_item(item_id).ok_or_else(|| MarqError::UnknownItem {
            id: item_id.to_string(),
        })?;
        let old_suggested = scoring::suggested_pillar_score(pillar, &self.pillar_checks);

        let entry = self.pillar_checks.entry(item_id.to_string()).or_insert(false);
        *entry = !*entry;

        let new_suggested = scoring::suggested_pillar_score(pillar, &self.pillar_checks);
        let current = self.pillar_scores.get(pillar.id).copied().unwrap_or(0);
        if current == old_suggested || current == 0 {
            self.pillar_scores
                .insert(pillar.id.to_string(), new_suggested);
        }
        Ok(())
    }

    pub fn toggle_initial_check(&mut self, check_id: &str) -> Result<()> {
        if !rubric::INITIAL_CHECKS.iter().any(|c| c.id == check_id) {
            return Err(MarqError::UnknownItem {
                id: check_id.to_string(),
            });
        }
        let entry = self.initial_checks.entry(check_id.to_string()).or_insert(false);
        *entry = !*entry;
        Ok(())
    }

    pub fn toggle_red_flag(&mut self, flag_id: &str) -> Result<()> {
        if !rubric::all_red_flags().any(|rf| rf.id == flag_id) {
            return Err(MarqError::UnknownItem {
                id: flag_id.to_string(),
            });
        }
        let entry = self.red_flags.entry(flag_id.to_string()).or_insert(false);
        *entry = !*entry;
        Ok(())
    }

    pub fn toggle_cross_check(&mut self, check_id: &str) -> Result<()> {
        if !rubric::CROSS_PILLAR_CHECKS.iter().any(|c| c.id == check_id) {
            return Err(MarqError::UnknownItem {
                id: check_id.to_string(),
            });
        }
        let entry = self.cross_pillar.entry(check_id.to_string()).or_insert(false);
        *entry = !*entry;
        Ok(())
    }

    /// Record the first-read band impression
    pub fn set_initial_band(&mut self, band_id: &str) -> Result<()> {
        let band = rubric::band(band_id)
            .ok_or_else(|| MarqError::invalid_value("band", band_id))?;
        self.initial_band = band.id.to_string();
        Ok(())
    }

    /// Sum of the pillar scores before adjustment and cap
    pub fn raw_total(&self) -> i64 {
        PILLARS
            .iter()
            .map(|p| self.pillar_scores.get(p.id).copied().unwrap_or(0))
            .sum()
    }

    /// The score this draft would save right now
    pub fn current_score(&self) -> i64 {
        scoring::final_score(&self.pillar_scores, self.cross_pillar_adj, &self.red_flags)
    }

    pub fn current_band(&self) -> &'static rubric::Band {
        scoring::band_for_score(self.current_score())
    }

    /// The active red-flag cap, 100 when no flag is set
    pub fn score_cap(&self) -> i64 {
        scoring::active_score_cap(&self.red_flags)
    }

    /// Snapshot this draft into an immutable record with the computed
    /// final score and band. `saved_at` is left unset; the store stamps it.
    pub fn finalize(&self) -> GradeRecord {
        let final_score = self.current_score();
        GradeRecord {
            draft: self.clone(),
            final_score,
            final_band: scoring::band_for_score(final_score).id.to_string(),
            saved_at: None,
        }
    }
}
