//! Wizard flow over the in-progress grade
//!
//! A fixed 6-stage linear flow with free backward/forward navigation. The
//! only guard is on leaving Setup: both identity fields must be filled.
//! Entering the final stage regenerates feedback as a side effect, but a
//! text the marker has hand-edited is never silently overwritten; only an
//! explicit regenerate does that.

use std::collections::BTreeSet;

use crate::draft::GradeDraft;
use crate::error::{MarqError, Result};
use crate::feedback;
use crate::record::GradeRecord;
use crate::rubric::PILLARS;
use crate::store::GradeStore;

/// The six stages, in flow order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Setup,
    InitialRead,
    PillarScoring,
    RedFlags,
    CrossPillar,
    ScoreAndFeedback,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Setup,
        Stage::InitialRead,
        Stage::PillarScoring,
        Stage::RedFlags,
        Stage::CrossPillar,
        Stage::ScoreAndFeedback,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Stage::Setup => "Setup",
            Stage::InitialRead => "Initial Read",
            Stage::PillarScoring => "Pillar Scoring",
            Stage::RedFlags => "Red Flags",
            Stage::CrossPillar => "Cross-Pillar",
            Stage::ScoreAndFeedback => "Score & Feedback",
        }
    }

    pub fn next(&self) -> Option<Stage> {
        let idx = Stage::ALL.iter().position(|s| s == self)?;
        Stage::ALL.get(idx + 1).copied()
    }

    pub fn prev(&self) -> Option<Stage> {
        let idx = Stage::ALL.iter().position(|s| s == self)?;
        idx.checked_sub(1).and_then(|i| Stage::ALL.get(i)).copied()
    }
}

/// Owns the single live draft for a grading session and orchestrates the
/// stage flow around it
pub struct Wizard {
    draft: GradeDraft,
    stage: Stage,
    edited_pillars: BTreeSet<String>,
    edited_overall: bool,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Wizard {
            draft: GradeDraft::new(),
            stage: Stage::Setup,
            edited_pillars: BTreeSet::new(),
            edited_overall: false,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn draft(&self) -> &GradeDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut GradeDraft {
        &mut self.draft
    }

    /// Both identity fields filled: the precondition for leaving Setup
    pub fn setup_complete(&self) -> bool {
        !self.draft.student_id.is_empty() && !self.draft.marker_initials.is_empty()
    }

    /// Move to any stage. Leaving Setup (in any direction) requires the
    /// identity fields; all other transitions are unguarded.
    pub fn goto(&mut self, target: Stage) -> Result<()> {
        if target != Stage::Setup && !self.setup_complete() {
            return Err(MarqError::UsageError(
                "student ID and marker initials are required before leaving setup".to_string(),
            ));
        }
        tracing::debug!(from = self.stage.label(), to = target.label(), "wizard_goto");
        if target == Stage::ScoreAndFeedback {
            self.regenerate_unedited();
        }
        self.stage = target;
        Ok(())
    }

    /// Store pillar feedback text. Text that differs from what the
    /// generator would produce is treated as hand-edited.
    pub fn set_pillar_feedback(&mut self, pillar_id: &str, text: String) -> Result<()> {
        if !PILLARS.iter().any(|p| p.id == pillar_id) {
            return Err(MarqError::UnknownPillar {
                id: pillar_id.to_string(),
            });
        }
        let generated = feedback::pillar_feedback(pillar_id, &self.draft.pillar_checks);
        if text == generated {
            self.edited_pillars.remove(pillar_id);
        } else {
            self.edited_pillars.insert(pillar_id.to_string());
        }
        self.draft.pillar_feedback.insert(pillar_id.to_string(), text);
        Ok(())
    }

    /// Store the overall comment, tracking hand-edits the same way
    pub fn set_overall_comment(&mut self, text: String) {
        self.edited_overall = text != self.generated_overall();
        self.draft.overall_comment = text;
    }

    /// Regenerate every feedback text, discarding manual edits
    pub fn regenerate_all(&mut self) {
        for p in &PILLARS {
            let generated = feedback::pillar_feedback(p.id, &self.draft.pillar_checks);
            self.draft.pillar_feedback.insert(p.id.to_string(), generated);
        }
        self.draft.overall_comment = self.generated_overall();
        self.edited_pillars.clear();
        self.edited_overall = false;
    }

    fn regenerate_unedited(&mut self) {
        for p in &PILLARS {
            if self.edited_pillars.contains(p.id) {
                continue;
            }
            let generated = feedback::pillar_feedback(p.id, &self.draft.pillar_checks);
            self.draft.pillar_feedback.insert(p.id.to_string(), generated);
        }
        if !self.edited_overall {
            self.draft.overall_comment = self.generated_overall();
        }
    }

    fn generated_overall(&self) -> String {
        feedback::overall_comment(
            &self.draft.pillar_scores,
            &self.draft.pillar_checks,
            &self.draft.red_flags,
            &self.draft.cross_pillar,
            self.draft.course,
        )
    }

    /// Finalize the draft, append it to the store, and reset for the next
    /// student. Returns the updated record collection.
    pub fn save(&mut self, store: &dyn GradeStore) -> Result<Vec<GradeRecord>> {
        let record = self.draft.finalize();
        tracing::info!(
            student = %record.draft.student_id,
            score = record.final_score,
            band = %record.final_band,
            "save_grade"
        );
        let updated = store.append(&record)?;
        self.draft.reset();
        self.edited_pillars.clear();
        self.edited_overall = false;
        self.stage = Stage::Setup;
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryGradeStore;

    fn ready_wizard() -> Wizard {
        let mut wizard = Wizard::new();
        wizard.draft_mut().student_id = "STU-2024-001".to_string();
        wizard.draft_mut().set_marker_initials("dk");
        wizard
    }

    #[test]
    fn test_setup_guard_blocks_until_identity_filled() {
        let mut wizard = Wizard::new();
        assert!(wizard.goto(Stage::InitialRead).is_err());

        wizard.draft_mut().student_id = "STU-1".to_string();
        assert!(wizard.goto(Stage::PillarScoring).is_err());

        wizard.draft_mut().set_marker_initials("ab");
        wizard.goto(Stage::PillarScoring).unwrap();
        assert_eq!(wizard.stage(), Stage::PillarScoring);
    }

    #[test]
    fn test_navigation_is_free_once_setup_complete() {
        let mut wizard = ready_wizard();
        wizard.goto(Stage::CrossPillar).unwrap();
        wizard.goto(Stage::InitialRead).unwrap();
        wizard.goto(Stage::ScoreAndFeedback).unwrap();
        wizard.goto(Stage::Setup).unwrap();
        assert_eq!(wizard.stage(), Stage::Setup);
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::Setup.next(), Some(Stage::InitialRead));
        assert_eq!(Stage::ScoreAndFeedback.next(), None);
        assert_eq!(Stage::Setup.prev(), None);
        assert_eq!(Stage::RedFlags.prev(), Some(Stage::PillarScoring));
    }

    #[test]
    fn test_entering_final_stage_generates_feedback() {
        let mut wizard = ready_wizard();
        wizard.draft_mut().toggle_pillar_check("meta_specific").unwrap();
        wizard.goto(Stage::ScoreAndFeedback).unwrap();

        let fb = &wizard.draft().pillar_feedback["metacognitive"];
        assert!(fb.starts_with("Strong use of specific, concrete examples"));
        assert!(!wizard.draft().overall_comment.is_empty());
    }

    #[test]
    fn test_manual_edits_survive_reentry() {
        let mut wizard = ready_wizard();
        wizard.goto(Stage::ScoreAndFeedback).unwrap();
        wizard
            .set_pillar_feedback("kts", "Discussed in person.".to_string())
            .unwrap();
        wizard.set_overall_comment("See emailed comments.".to_string());

        // changing state elsewhere and coming back must not clobber edits
        wizard.goto(Stage::PillarScoring).unwrap();
        wizard.draft_mut().toggle_pillar_check("kts_lens").unwrap();
        wizard.goto(Stage::ScoreAndFeedback).unwrap();

        assert_eq!(wizard.draft().pillar_feedback["kts"], "Discussed in person.");
        assert_eq!(wizard.draft().overall_comment, "See emailed comments.");
        // untouched pillars were regenerated with the new checks
        assert!(!wizard.draft().pillar_feedback["metacognitive"].is_empty());
    }

    #[test]
    fn test_explicit_regenerate_overwrites_edits() {
        let mut wizard = ready_wizard();
        wizard.goto(Stage::ScoreAndFeedback).unwrap();
        wizard
            .set_pillar_feedback("kts", "Discussed in person.".to_string())
            .unwrap();
        wizard.regenerate_all();
        assert_ne!(wizard.draft().pillar_feedback["kts"], "Discussed in person.");
    }

    #[test]
    fn test_unchanged_text_does_not_count_as_edit() {
        let mut wizard = ready_wizard();
        wizard.goto(Stage::ScoreAndFeedback).unwrap();
        let generated = wizard.draft().pillar_feedback["pathway"].clone();
        wizard.set_pillar_feedback("pathway", generated).unwrap();

        wizard.goto(Stage::PillarScoring).unwrap();
        wizard.draft_mut().toggle_pillar_check("path_moves").unwrap();
        wizard.goto(Stage::ScoreAndFeedback).unwrap();

        // still tracked as generated, so the new checks flowed through
        assert!(wizard.draft().pillar_feedback["pathway"]
            .starts_with("Identifies specific kinetic moves"));
    }

    #[test]
    fn test_save_appends_resets_and_returns_to_setup() {
        let store = MemoryGradeStore::new();
        let mut wizard = ready_wizard();
        wizard.draft_mut().set_pillar_score("metacognitive", 25).unwrap();
        wizard.goto(Stage::ScoreAndFeedback).unwrap();

        let updated = wizard.save(&store).unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].draft.student_id, "STU-2024-001");
        assert_eq!(updated[0].final_score, 25);
        assert!(updated[0].saved_at.is_some());

        assert_eq!(wizard.stage(), Stage::Setup);
        assert_eq!(*wizard.draft(), GradeDraft::new());
    }

    #[test]
    fn test_failed_save_keeps_draft() {
        struct FailingStore;
        impl GradeStore for FailingStore {
            fn list(&self) -> crate::error::Result<Vec<GradeRecord>> {
                Err(MarqError::StoreTransport("down".to_string()))
            }
            fn append(&self, _: &GradeRecord) -> crate::error::Result<Vec<GradeRecord>> {
                Err(MarqError::StoreTransport("down".to_string()))
            }
            fn delete_at(&self, _: usize) -> crate::error::Result<Vec<GradeRecord>> {
                Err(MarqError::StoreTransport("down".to_string()))
            }
        }

        let mut wizard = ready_wizard();
        wizard.goto(Stage::ScoreAndFeedback).unwrap();
        assert!(wizard.save(&FailingStore).is_err());
        // in-memory state is left as-is; nothing was reset
        assert_eq!(wizard.draft().student_id, "STU-2024-001");
        assert_eq!(wizard.stage(), Stage::ScoreAndFeedback);
    }
}
