//! Prompt sequences for the six wizard stages

use std::collections::BTreeMap;

use inquire::{CustomType, MultiSelect, Text};

use marq_core::error::Result;
use marq_core::rubric::{
    self, CourseVariant, SimpleCheck, BANDS, CRITICAL_RED_FLAGS, CROSS_PILLAR_CHECKS,
    INITIAL_CHECKS, MODERATE_RED_FLAGS, PILLARS,
};
use marq_core::scoring::{self, HolisticAdjustment};
use marq_core::wizard::Wizard;

use super::{prompt, select_one, Flow};

pub(super) fn print_live_score(wizard: &Wizard) {
    let draft = wizard.draft();
    let cap = draft.score_cap();
    let cap_note = if cap < 100 {
        format!(" — cap {}%", cap)
    } else {
        String::new()
    };
    println!(
        "Live score: {}/100 ({}){}",
        draft.current_score(),
        draft.current_band().label,
        cap_note
    );
}

pub(super) fn setup(wizard: &mut Wizard) -> Result<Flow> {
    let student = loop {
        let initial = wizard.draft().student_id.clone();
        let Some(value) = prompt(Text::new("Student ID:").with_initial_value(&initial).prompt())?
        else {
            return Ok(Flow::Abort);
        };
        let trimmed = value.trim().to_string();
        if !trimmed.is_empty() {
            break trimmed;
        }
        println!("Student ID is required.");
    };
    wizard.draft_mut().student_id = student;

    let marker = loop {
        let initial = wizard.draft().marker_initials.clone();
        let Some(value) = prompt(
            Text::new("Marker initials:")
                .with_initial_value(&initial)
                .with_help_message("stored uppercased, max 4 characters")
                .prompt(),
        )?
        else {
            return Ok(Flow::Abort);
        };
        if !value.trim().is_empty() {
            break value;
        }
        println!("Marker initials are required.");
    };
    wizard.draft_mut().set_marker_initials(&marker);

    let options = vec![
        (
            CourseVariant::ModuleJourney.option_label().to_string(),
            CourseVariant::ModuleJourney,
        ),
        (
            CourseVariant::ChallengeFocused.option_label().to_string(),
            CourseVariant::ChallengeFocused,
        ),
    ];
    let Some(course) = select_one("Reflection variation:", options)? else {
        return Ok(Flow::Abort);
    };
    wizard.draft_mut().course = course;

    println!();
    println!("Calibration reminders:");
    println!(
        "  Grade what is present and genuine, not what is absent. These are \
         mid-career professionals — read as a mentor, not an examiner. \
         Authentic reflection deserves full credit; feedback develops what's missing."
    );
    println!("  {}", course.calibration_note());

    Ok(Flow::Continue)
}

pub(super) fn initial_read(wizard: &mut Wizard) -> Result<Flow> {
    println!("Read once without scoring. Tick the quality indicators you observe.");

    let Some(ticked) = checklist(
        "Initial read checks:",
        &INITIAL_CHECKS,
        &wizard.draft().initial_checks,
    )?
    else {
        return Ok(Flow::Abort);
    };
    for check in &INITIAL_CHECKS {
        let was = wizard
            .draft()
            .initial_checks
            .get(check.id)
            .copied()
            .unwrap_or(false);
        if was != ticked.contains(&check.id) {
            wizard.draft_mut().toggle_initial_check(check.id)?;
        }
    }

    let mut options: Vec<(String, Option<&'static str>)> = BANDS
        .iter()
        .map(|b| (format!("{} ({})", b.label, b.range_label), Some(b.id)))
        .collect();
    options.push(("(skip)".to_string(), None));
    let Some(choice) = select_one("Initial impression band:", options)? else {
        return Ok(Flow::Abort);
    };
    if let Some(band_id) = choice {
        wizard.draft_mut().set_initial_band(band_id)?;
    }

    Ok(Flow::Continue)
}

pub(super) fn pillar_scoring(wizard: &mut Wizard) -> Result<Flow> {
    for pillar in &PILLARS {
        let items = rubric::pillar_items(pillar.id);
        println!();
        println!("{} ({})", pillar.label, pillar.weight_label);

        let current: BTreeMap<String, bool> = items
            .iter()
            .map(|item| {
                let ticked = wizard
                    .draft()
                    .pillar_checks
                    .get(item.id)
                    .copied()
                    .unwrap_or(false);
                (item.id.to_string(), ticked)
            })
            .collect();
        let options: Vec<(&'static str, &'static str)> =
            items.iter().map(|i| (i.id, i.label)).collect();
        let Some(ticked) = checklist_raw("Checks:", &options, &current)? else {
            return Ok(Flow::Abort);
        };
        for (id, _) in &options {
            let was = current.get(*id).copied().unwrap_or(false);
            if was != ticked.contains(id) {
                wizard.draft_mut().toggle_pillar_check(id)?;
            }
        }

        let suggested = scoring::suggested_pillar_score(pillar, &wizard.draft().pillar_checks);
        let current_score = wizard
            .draft()
            .pillar_scores
            .get(pillar.id)
            .copied()
            .unwrap_or(0);
        let Some(score) = prompt(
            CustomType::<i64>::new(&format!("Score (0–{}):", pillar.max_points))
                .with_default(current_score)
                .with_help_message(&format!("suggested from checks: {}", suggested))
                .prompt(),
        )?
        else {
            return Ok(Flow::Abort);
        };
        wizard.draft_mut().set_pillar_score(pillar.id, score)?;
    }

    Ok(Flow::Continue)
}

pub(super) fn red_flags(wizard: &mut Wizard) -> Result<Flow> {
    println!("Tick any that apply. These cap the maximum achievable score.");

    for (title, flags) in [
        ("Critical (cap at Satisfactory/Good):", &CRITICAL_RED_FLAGS),
        ("Moderate (cap at Good/Excellent):", &MODERATE_RED_FLAGS),
    ] {
        let options: Vec<(&'static str, String)> = flags
            .iter()
            .map(|rf| (rf.id, format!("{} (cap {}%)", rf.label, rf.score_cap)))
            .collect();
        let current: BTreeMap<String, bool> = flags
            .iter()
            .map(|rf| {
                let set = wizard
                    .draft()
                    .red_flags
                    .get(rf.id)
                    .copied()
                    .unwrap_or(false);
                (rf.id.to_string(), set)
            })
            .collect();
        let labeled: Vec<(&'static str, &str)> = options
            .iter()
            .map(|(id, label)| (*id, label.as_str()))
            .collect();
        let Some(ticked) = checklist_raw(title, &labeled, &current)? else {
            return Ok(Flow::Abort);
        };
        for (id, _) in &labeled {
            let was = current.get(*id).copied().unwrap_or(false);
            if was != ticked.contains(id) {
                wizard.draft_mut().toggle_red_flag(id)?;
            }
        }
    }

    let cap = wizard.draft().score_cap();
    if cap < 100 {
        println!("Active score cap: {}%", cap);
    }

    Ok(Flow::Continue)
}

pub(super) fn cross_pillar(wizard: &mut Wizard) -> Result<Flow> {
    println!("Not separately weighted — these push borderline scores up or down.");

    let Some(ticked) = checklist(
        "Cross-pillar checks:",
        &CROSS_PILLAR_CHECKS,
        &wizard.draft().cross_pillar,
    )?
    else {
        return Ok(Flow::Abort);
    };
    for check in &CROSS_PILLAR_CHECKS {
        let was = wizard
            .draft()
            .cross_pillar
            .get(check.id)
            .copied()
            .unwrap_or(false);
        if was != ticked.contains(&check.id) {
            wizard.draft_mut().toggle_cross_check(check.id)?;
        }
    }

    let options = vec![
        (
            HolisticAdjustment::Up.label().to_string(),
            HolisticAdjustment::Up,
        ),
        (
            HolisticAdjustment::None.label().to_string(),
            HolisticAdjustment::None,
        ),
        (
            HolisticAdjustment::Down.label().to_string(),
            HolisticAdjustment::Down,
        ),
    ];
    println!(
        "Up: exceptional integration, unusual honesty, original metaphors, vivid writing. \
         Down: significant disconnect between parts, performed reflection, missing engagement with themes."
    );
    let Some(adjustment) = select_one("Holistic adjustment:", options)? else {
        return Ok(Flow::Abort);
    };
    wizard.draft_mut().cross_pillar_adj = adjustment;

    if adjustment != HolisticAdjustment::None {
        let initial = wizard.draft().adj_reason.clone();
        let Some(reason) = prompt(
            Text::new("Brief reason for adjustment:")
                .with_initial_value(&initial)
                .prompt(),
        )?
        else {
            return Ok(Flow::Abort);
        };
        wizard.draft_mut().adj_reason = reason;
    }

    Ok(Flow::Continue)
}

pub(super) fn score_and_feedback(wizard: &mut Wizard) -> Result<Flow> {
    print_score_summary(wizard);

    if holistic_checks(wizard)?.is_none() {
        return Ok(Flow::Abort);
    }

    loop {
        print_feedback(wizard);

        let mut options: Vec<(String, Option<&'static str>)> = vec![
            ("Done — keep feedback as shown".to_string(), Some("done")),
            ("Edit overall comment".to_string(), Some("overall")),
        ];
        for pillar in &PILLARS {
            options.push((format!("Edit {} feedback", pillar.label), Some(pillar.id)));
        }
        options.push(("Regenerate all from checks".to_string(), Some("regen")));

        let Some(choice) = select_one("Feedback:", options)? else {
            return Ok(Flow::Abort);
        };
        match choice {
            Some("done") => break,
            Some("regen") => wizard.regenerate_all(),
            Some("overall") => {
                let initial = wizard.draft().overall_comment.clone();
                let Some(text) = prompt(
                    Text::new("Overall comment:")
                        .with_initial_value(&initial)
                        .prompt(),
                )?
                else {
                    return Ok(Flow::Abort);
                };
                wizard.set_overall_comment(text);
            }
            Some(pillar_id) => {
                let initial = wizard
                    .draft()
                    .pillar_feedback
                    .get(pillar_id)
                    .cloned()
                    .unwrap_or_default();
                let Some(text) = prompt(
                    Text::new("Pillar feedback:")
                        .with_initial_value(&initial)
                        .prompt(),
                )?
                else {
                    return Ok(Flow::Abort);
                };
                wizard.set_pillar_feedback(pillar_id, text)?;
            }
            None => break,
        }
    }

    Ok(Flow::Continue)
}

fn print_score_summary(wizard: &Wizard) {
    let draft = wizard.draft();
    for pillar in &PILLARS {
        let score = draft.pillar_scores.get(pillar.id).copied().unwrap_or(0);
        println!("  {:<30} {:>2}/{}", pillar.label, score, pillar.max_points);
    }
    match draft.cross_pillar_adj.delta() {
        0 => {}
        delta => println!("  Holistic adjustment: {:+}", delta),
    }
    let cap = draft.score_cap();
    if cap < 100 {
        println!("  Red flag cap active: max {}%", cap);
    }
    println!(
        "  Final: {}/100 — {}",
        draft.current_score(),
        draft.current_band().label
    );
}

fn holistic_checks(wizard: &mut Wizard) -> Result<Option<()>> {
    let holistic = wizard.draft().holistic;
    let options = [
        ("feelsRight", "Score feels right holistically", holistic.feels_right),
        (
            "consistent",
            "Consistent with other submissions I've graded",
            holistic.consistent,
        ),
        (
            "noRedFlags",
            "No red flags overriding this score",
            holistic.no_red_flags,
        ),
        (
            "moderation",
            "Score would hold up if challenged by moderation",
            holistic.moderation,
        ),
    ];
    let labels: Vec<String> = options.iter().map(|(_, label, _)| label.to_string()).collect();
    let defaults: Vec<usize> = options
        .iter()
        .enumerate()
        .filter(|(_, (_, _, set))| *set)
        .map(|(i, _)| i)
        .collect();

    let Some(selected) = prompt(
        MultiSelect::new("Holistic sanity check:", labels.clone())
            .with_default(&defaults)
            .prompt(),
    )?
    else {
        return Ok(None);
    };

    let holistic = &mut wizard.draft_mut().holistic;
    holistic.feels_right = selected.contains(&labels[0]);
    holistic.consistent = selected.contains(&labels[1]);
    holistic.no_red_flags = selected.contains(&labels[2]);
    holistic.moderation = selected.contains(&labels[3]);
    Ok(Some(()))
}

fn print_feedback(wizard: &Wizard) {
    let draft = wizard.draft();
    println!();
    println!("Overall comment:");
    println!("  {}", draft.overall_comment);
    for pillar in &PILLARS {
        println!("{}:", pillar.label);
        println!(
            "  {}",
            draft.pillar_feedback.get(pillar.id).cloned().unwrap_or_default()
        );
    }
}

/// Multi-select over a fixed checklist, pre-selecting what is already
/// ticked. Returns the new ticked id set, or `None` on cancel.
fn checklist(
    title: &str,
    checks: &[SimpleCheck],
    current: &BTreeMap<String, bool>,
) -> Result<Option<Vec<&'static str>>> {
    let options: Vec<(&'static str, &'static str)> =
        checks.iter().map(|c| (c.id, c.label)).collect();
    checklist_raw(title, &options, current)
}

fn checklist_raw(
    title: &str,
    options: &[(&'static str, &str)],
    current: &BTreeMap<String, bool>,
) -> Result<Option<Vec<&'static str>>> {
    let labels: Vec<String> = options.iter().map(|(_, label)| label.to_string()).collect();
    let defaults: Vec<usize> = options
        .iter()
        .enumerate()
        .filter(|(_, (id, _))| current.get(*id).copied().unwrap_or(false))
        .map(|(i, _)| i)
        .collect();

    let Some(selected) = prompt(
        MultiSelect::new(title, labels.clone())
            .with_default(&defaults)
            .with_page_size(12)
            .prompt(),
    )?
    else {
        return Ok(None);
    };

    let ticked = options
        .iter()
        .zip(labels.iter())
        .filter(|(_, label)| selected.contains(label))
        .map(|((id, _), _)| *id)
        .collect();
    Ok(Some(ticked))
}
