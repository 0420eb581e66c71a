//! Finalized grade records
//!
//! A [`GradeRecord`] is a snapshot of a completed draft plus the computed
//! final score and band. Records are immutable once created; the store only
//! ever appends them or deletes them by position.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::draft::GradeDraft;
use crate::rubric;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeRecord {
    #[serde(flatten)]
    pub draft: GradeDraft,
    pub final_score: i64,
    /// Band id derived from `final_score` at save time
    pub final_band: String,
    /// Stamped by the store on append; unset on an outgoing draft record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl GradeRecord {
    /// Display label for the final band
    pub fn band_label(&self) -> &'static str {
        rubric::band(&self.final_band)
            .map(|b| b.label)
            .unwrap_or("Unknown")
    }

    /// Marker initials for grouping, with a placeholder for blank ones
    pub fn marker_key(&self) -> &str {
        if self.draft.marker_initials.is_empty() {
            "—"
        } else {
            &self.draft.marker_initials
        }
    }
}
