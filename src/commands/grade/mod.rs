//! `marq grade` command - interactive grading wizard
//!
//! Drives the six-stage flow (Setup → Initial Read → Pillar Scoring →
//! Red Flags → Cross-Pillar → Score & Feedback) over a single in-progress
//! grade, with free navigation between stages once setup is complete.
//! Requires an interactive terminal.

mod stages;

use inquire::{Confirm, InquireError, Select};

use marq_core::error::{MarqError, Result};
use marq_core::rubric::CourseVariant;
use marq_core::store::GradeStore;
use marq_core::wizard::{Stage, Wizard};

use crate::cli::Cli;
use crate::commands::dispatch;

/// Outcome of one round of prompts
enum Flow {
    Continue,
    Done,
    Abort,
}

enum NavAction {
    Goto(Stage),
    Jump,
    Save,
    Abandon,
}

/// Execute the grade command
pub fn execute(
    cli: &Cli,
    student: Option<&str>,
    marker: Option<&str>,
    course: Option<CourseVariant>,
) -> Result<()> {
    if !atty::is(atty::Stream::Stdin) {
        return Err(MarqError::NotInteractive {
            reason: "marq grade reads answers from a terminal (stdin is not a TTY)".to_string(),
        });
    }

    // Resolve the store up front so a missing URL fails before any typing
    let store = dispatch::store(cli)?;

    let mut wizard = Wizard::new();
    if let Some(student) = student {
        wizard.draft_mut().student_id = student.trim().to_string();
    }
    if let Some(marker) = marker {
        wizard.draft_mut().set_marker_initials(marker);
    }
    if let Some(course) = course {
        wizard.draft_mut().course = course;
    }

    run_loop(cli, &mut wizard, &store)
}

fn run_loop(cli: &Cli, wizard: &mut Wizard, store: &dyn GradeStore) -> Result<()> {
    loop {
        println!();
        println!("── {} ──", wizard.stage().label());
        if wizard.stage() != Stage::Setup {
            stages::print_live_score(wizard);
        }

        let flow = match wizard.stage() {
            Stage::Setup => stages::setup(wizard)?,
            Stage::InitialRead => stages::initial_read(wizard)?,
            Stage::PillarScoring => stages::pillar_scoring(wizard)?,
            Stage::RedFlags => stages::red_flags(wizard)?,
            Stage::CrossPillar => stages::cross_pillar(wizard)?,
            Stage::ScoreAndFeedback => stages::score_and_feedback(wizard)?,
        };

        let flow = match flow {
            Flow::Continue => navigate(cli, wizard, store)?,
            other => other,
        };

        match flow {
            Flow::Continue => {}
            Flow::Done => return Ok(()),
            Flow::Abort => {
                if !cli.quiet {
                    println!("Abandoned — nothing saved.");
                }
                return Ok(());
            }
        }
    }
}

/// Post-stage navigation menu
fn navigate(cli: &Cli, wizard: &mut Wizard, store: &dyn GradeStore) -> Result<Flow> {
    let stage = wizard.stage();
    let mut labels = Vec::new();
    let mut actions = Vec::new();

    if stage == Stage::ScoreAndFeedback {
        labels.push("Save & next student".to_string());
        actions.push(NavAction::Save);
    }
    if let Some(next) = stage.next() {
        labels.push(format!("Continue → {}", next.label()));
        actions.push(NavAction::Goto(next));
    }
    if let Some(prev) = stage.prev() {
        labels.push(format!("Back → {}", prev.label()));
        actions.push(NavAction::Goto(prev));
    }
    labels.push("Jump to stage…".to_string());
    actions.push(NavAction::Jump);
    labels.push("Abandon session".to_string());
    actions.push(NavAction::Abandon);

    let Some(choice) = prompt(Select::new("Next:", labels.clone()).prompt())? else {
        return Ok(Flow::Abort);
    };
    let index = labels.iter().position(|l| *l == choice).unwrap_or(0);

    match &actions[index] {
        NavAction::Goto(target) => {
            goto_checked(wizard, *target);
            Ok(Flow::Continue)
        }
        NavAction::Jump => {
            let options: Vec<(String, Stage)> = Stage::ALL
                .iter()
                .map(|s| (s.label().to_string(), *s))
                .collect();
            if let Some(target) = select_one("Jump to:", options)? {
                goto_checked(wizard, target);
            }
            Ok(Flow::Continue)
        }
        NavAction::Save => save(cli, wizard, store),
        NavAction::Abandon => Ok(Flow::Abort),
    }
}

/// Move stages, reporting (not propagating) the setup guard
fn goto_checked(wizard: &mut Wizard, target: Stage) {
    if let Err(e) = wizard.goto(target) {
        println!("{}", e);
    }
}

fn save(cli: &Cli, wizard: &mut Wizard, store: &dyn GradeStore) -> Result<Flow> {
    let student = wizard.draft().student_id.clone();
    let score = wizard.draft().current_score();
    let band = wizard.draft().current_band();

    // No automatic retry; the draft stays loaded so the marker can try
    // again or abandon deliberately.
    let updated = match wizard.save(store) {
        Ok(updated) => updated,
        Err(e) => {
            println!("Save failed: {}", e);
            println!("The session is still loaded; save again or abandon.");
            return Ok(Flow::Continue);
        }
    };
    if !cli.quiet {
        println!(
            "✓ Saved {} — {}/100 ({}). {} record{} on file.",
            student,
            score,
            band.label,
            updated.len(),
            if updated.len() == 1 { "" } else { "s" }
        );
    }

    match prompt(
        Confirm::new("Grade another student?")
            .with_default(true)
            .prompt(),
    )? {
        Some(true) => Ok(Flow::Continue),
        _ => Ok(Flow::Done),
    }
}

/// Map inquire results: Esc/Ctrl-C become a graceful `None`
fn prompt<T>(result: std::result::Result<T, InquireError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(MarqError::operation("read interactive input", e)),
    }
}

/// Single choice from labeled options
fn select_one<T: Clone>(title: &str, options: Vec<(String, T)>) -> Result<Option<T>> {
    let labels: Vec<String> = options.iter().map(|(label, _)| label.clone()).collect();
    match prompt(Select::new(title, labels.clone()).prompt())? {
        None => Ok(None),
        Some(choice) => {
            let index = labels.iter().position(|l| *l == choice).unwrap_or(0);
            Ok(Some(options[index].1.clone()))
        }
    }
}
