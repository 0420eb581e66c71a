//! Static rubric definition for the reflection grading checklist
//!
//! The rubric is fixed at compile time: four weighted pillars (summing to
//! 100 points), a per-pillar checklist whose items carry the positive and
//! negative feedback fragments, two tiers of red flags with score caps,
//! informational cross-pillar and initial-read checklists, and the five
//! grade bands. All tables are `'static` leaf data; behavior lives in
//! [`crate::scoring`] and [`crate::feedback`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MarqError;

/// A weighted rubric dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pillar {
    pub id: &'static str,
    pub label: &'static str,
    pub max_points: i64,
    pub weight_label: &'static str,
}

/// A checklist item belonging to exactly one pillar, carrying the feedback
/// fragments used when the item is ticked (positive) or left unticked
/// (negative)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistItem {
    pub id: &'static str,
    pub label: &'static str,
    pub positive_text: &'static str,
    pub negative_text: &'static str,
}

/// A quality concern that caps the achievable final score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedFlag {
    pub id: &'static str,
    pub label: &'static str,
    pub score_cap: i64,
}

/// A label-only boolean check (initial read and cross-pillar lists)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleCheck {
    pub id: &'static str,
    pub label: &'static str,
}

/// One of the five qualitative score tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub id: &'static str,
    pub label: &'static str,
    /// Lowest score (inclusive) that falls in this band
    pub floor: i64,
    pub range_label: &'static str,
}

/// Which of the two reflection variations is being graded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseVariant {
    #[default]
    ModuleJourney,
    ChallengeFocused,
}

impl CourseVariant {
    /// Short display label, as used in record listings
    pub fn label(&self) -> &'static str {
        match self {
            CourseVariant::ModuleJourney => "Module Journey",
            CourseVariant::ChallengeFocused => "Challenge-Focused",
        }
    }

    /// Full option label, as presented during setup
    pub fn option_label(&self) -> &'static str {
        match self {
            CourseVariant::ModuleJourney => "Module Journey (1,500 words)",
            CourseVariant::ChallengeFocused => "Challenge-Focused (1,500 words)",
        }
    }

    /// Variation-specific calibration reminder shown at setup
    pub fn calibration_note(&self) -> &'static str {
        match self {
            CourseVariant::ModuleJourney => {
                "Module Journey: look for a coherent retrospective arc across the three-part structure (starting point → shifts → pathway), grounded in module themes."
            }
            CourseVariant::ChallengeFocused => {
                "Challenge-Focused: this variation naturally produces stronger emotional grounding — look for metacognitive depth to match the emotional honesty."
            }
        }
    }
}

impl fmt::Display for CourseVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseVariant::ModuleJourney => write!(f, "module_journey"),
            CourseVariant::ChallengeFocused => write!(f, "challenge_focused"),
        }
    }
}

impl FromStr for CourseVariant {
    type Err = MarqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "module_journey" => Ok(CourseVariant::ModuleJourney),
            "challenge_focused" => Ok(CourseVariant::ChallengeFocused),
            other => Err(MarqError::invalid_value(
                "course variant (expected: module_journey or challenge_focused)",
                other,
            )),
        }
    }
}

/// The four pillars, in declaration order. Max points sum to 100.
pub const PILLARS: [Pillar; 4] = [
    Pillar {
        id: "metacognitive",
        label: "Metacognitive Self-Awareness",
        max_points: 30,
        weight_label: "30%",
    },
    Pillar {
        id: "kts",
        label: "KTS Framework Application",
        max_points: 25,
        weight_label: "25%",
    },
    Pillar {
        id: "transformation",
        label: "Cognitive Transformation",
        max_points: 25,
        weight_label: "25%",
    },
    Pillar {
        id: "pathway",
        label: "Development Pathway",
        max_points: 20,
        weight_label: "20%",
    },
];

/// The five bands, highest first. Thresholds are inclusive-lower,
/// exclusive-upper except the top band which includes 100.
pub const BANDS: [Band; 5] = [
    Band {
        id: "outstanding",
        label: "Outstanding",
        floor: 85,
        range_label: "85–100%",
    },
    Band {
        id: "excellent",
        label: "Excellent",
        floor: 70,
        range_label: "70–84%",
    },
    Band {
        id: "good",
        label: "Good",
        floor: 60,
        range_label: "60–69%",
    },
    Band {
        id: "satisfactory",
        label: "Satisfactory",
        floor: 50,
        range_label: "50–59%",
    },
    Band {
        id: "unsatisfactory",
        label: "Unsatisfactory",
        floor: 0,
        range_label: "0–49%",
    },
];

/// Quality indicators ticked during the first read-through
pub const INITIAL_CHECKS: [SimpleCheck; 6] = [
    SimpleCheck {
        id: "personal",
        label: "Reads as personal reflection (first-person, genuine voice)",
    },
    SimpleCheck {
        id: "kts_engage",
        label: "Engages with KTS framework substantively",
    },
    SimpleCheck {
        id: "specific_exp",
        label: "References specific experiences (module experiences or challenge details)",
    },
    SimpleCheck {
        id: "futures_depth",
        label: "Addresses futures themes or challenge context with depth",
    },
    SimpleCheck {
        id: "word_count",
        label: "Within word count range (~1500 ±10%)",
    },
    SimpleCheck {
        id: "kts_appendix",
        label: "Includes KTS assessment appendix",
    },
];

const METACOGNITIVE_ITEMS: [ChecklistItem; 7] = [
    ChecklistItem {
        id: "meta_specific",
        label: "Specific examples from actual experience (not generic)",
        positive_text: "Strong use of specific, concrete examples drawn from genuine experience — this grounds the reflection.",
        negative_text: "The reflection would benefit from more specific examples from your actual experience rather than generic observations about thinking.",
    },
    ChecklistItem {
        id: "meta_honest",
        label: "Honest acknowledgment of both growth and resistance",
        positive_text: "There is honest acknowledgment of both growth and the resistance encountered along the way.",
        negative_text: "Consider acknowledging not just what shifted but also where you experienced resistance or where growth was incomplete.",
    },
    ChecklistItem {
        id: "meta_invisible",
        label: "Recognition of invisible cognitive habits/defaults",
        positive_text: "Good recognition of cognitive habits that normally operate below the surface.",
        negative_text: "The reflection stays at the level of visible actions rather than examining the invisible cognitive habits that drive them.",
    },
    ChecklistItem {
        id: "meta_connection",
        label: "Connection between past experiences and current thinking patterns",
        positive_text: "Effective connection between past experiences and how they shaped current thinking patterns.",
        negative_text: "The link between prior experiences (career, education) and current cognitive defaults could be drawn more explicitly.",
    },
    ChecklistItem {
        id: "meta_futures",
        label: "Examines what futures were easy/hard to imagine and why",
        positive_text: "Thoughtful examination of which futures came easily and which were harder to imagine — and why.",
        negative_text: "Consider which futures you found easy or hard to imagine, and what that reveals about your cognitive defaults.",
    },
    ChecklistItem {
        id: "meta_process",
        label: "Analyses thinking process, not just description of actions",
        positive_text: "The reflection genuinely analyses the thinking process rather than describing actions.",
        negative_text: "The writing describes what was done rather than examining the thinking process behind those actions — move from narration to metacognition.",
    },
    ChecklistItem {
        id: "meta_background",
        label: "Identifies how education/career background shaped cognitive defaults",
        positive_text: "Clear identification of how professional and educational background has shaped cognitive defaults.",
        negative_text: "How has your career or educational background shaped the cognitive defaults you bring to futures thinking? This context would deepen the reflection.",
    },
];

const KTS_ITEMS: [ChecklistItem; 7] = [
    ChecklistItem {
        id: "kts_dimensions",
        label: "Accurate understanding of both KTS dimensions demonstrated",
        positive_text: "Demonstrates accurate understanding of both KTS dimensions (possibility and uncertainty).",
        negative_text: "The KTS framework has two dimensions — possibility (structure ↔ openness) and uncertainty (reason ↔ play) — and both need to be engaged.",
    },
    ChecklistItem {
        id: "kts_lens",
        label: "Uses KTS as analytical lens, not just self-labelling",
        positive_text: "KTS is used as a genuine analytical lens for understanding cognitive patterns — not just a label.",
        negative_text: "The KTS framework is mentioned but used primarily as a label rather than an analytical tool for examining specific moments.",
    },
    ChecklistItem {
        id: "kts_demanded",
        label: "Identifies thinking styles demanded by different situations",
        positive_text: "Good identification of which thinking styles different situations demanded.",
        negative_text: "Consider what thinking style each situation actually demanded — the gap between demanded and deployed style is where the insight lies.",
    },
    ChecklistItem {
        id: "kts_gaps",
        label: "Analyses gaps between demanded and deployed styles",
        positive_text: "Effective analysis of the gaps between what was demanded and what was actually deployed.",
        negative_text: "The reflection would benefit from analysing the gap between the thinking style a situation demanded and the one you actually used.",
    },
    ChecklistItem {
        id: "kts_malleable",
        label: "Treats thinking style as situational and malleable",
        positive_text: "Thinking style is treated as situational and malleable rather than a fixed trait.",
        negative_text: "The reflection treats thinking style as relatively fixed — consider how the same person can deploy different styles across different situations.",
    },
    ChecklistItem {
        id: "kts_futures",
        label: "Connects KTS analysis meaningfully to futures themes",
        positive_text: "KTS analysis is meaningfully connected to futures thinking themes.",
        negative_text: "The KTS analysis could be more explicitly connected to the futures thinking challenges encountered in the module.",
    },
    ChecklistItem {
        id: "kts_illuminates",
        label: "KTS illuminates specific difficulties or successes",
        positive_text: "The KTS lens illuminates why specific moments were difficult or successful — this is the framework working as intended.",
        negative_text: "The KTS framework is applied but doesn't quite illuminate why particular moments were challenging — push the analysis to show what the framework reveals.",
    },
];

const TRANSFORMATION_ITEMS: [ChecklistItem; 6] = [
    ChecklistItem {
        id: "trans_moves",
        label: "Specific examples of kinetic moves (style shifts)",
        positive_text: "Provides specific, convincing examples of kinetic moves — deliberate shifts between thinking styles.",
        negative_text: "The reflection claims cognitive shifts but doesn't provide specific examples of kinetic moves (deliberate style shifts).",
    },
    ChecklistItem {
        id: "trans_discomfort",
        label: "Honest description of cognitive discomfort during shifts",
        positive_text: "Honest description of the cognitive discomfort experienced during thinking style shifts — this authenticity matters.",
        negative_text: "Cognitive transformation involves discomfort — acknowledging this honestly would strengthen the reflection.",
    },
    ChecklistItem {
        id: "trans_emerging",
        label: "Evidence of new thinking patterns emerging",
        positive_text: "There is credible evidence of new thinking patterns beginning to emerge.",
        negative_text: "The reflection would benefit from showing what new thinking patterns are actually emerging, not just what was learned about.",
    },
    ChecklistItem {
        id: "trans_enablers",
        label: "Identifies what enabled or blocked shifts",
        positive_text: "Good identification of what enabled or blocked the cognitive shifts.",
        negative_text: "Consider what enabled or blocked your cognitive shifts — understanding the mechanisms matters as much as the shifts themselves.",
    },
    ChecklistItem {
        id: "trans_partial",
        label: "Distinguishes partial from complete shifts honestly",
        positive_text: "Honest distinction between partial and complete shifts — this nuanced view is more credible than claiming total transformation.",
        negative_text: "The reflection could be more honest about the difference between partial and complete cognitive shifts — claiming full transformation is less credible than acknowledging work in progress.",
    },
    ChecklistItem {
        id: "trans_metacog",
        label: "Shows understanding of futures mindset as metacognitive capability",
        positive_text: "Demonstrates understanding that futures mindset is a metacognitive capability — the ability to notice and shift one's own thinking.",
        negative_text: "Futures mindset is a metacognitive capability (the ability to notice and shift one's thinking), not just knowledge about the future — this distinction could be made clearer.",
    },
];

const PATHWAY_ITEMS: [ChecklistItem; 6] = [
    ChecklistItem {
        id: "path_moves",
        label: "Specific kinetic moves identified for development",
        positive_text: "Identifies specific kinetic moves targeted for further development.",
        negative_text: "The development pathway would be stronger with specific kinetic moves identified — which style shifts do you most need to develop?",
    },
    ChecklistItem {
        id: "path_realistic",
        label: "Realistic assessment of development challenges",
        positive_text: "Realistic assessment of the challenges that development will involve.",
        negative_text: "The pathway reads as aspirational without realistic assessment of the difficulties involved in changing cognitive habits.",
    },
    ChecklistItem {
        id: "path_context",
        label: "Connected to anticipated role/industry/organisational context",
        positive_text: "The pathway is grounded in the anticipated professional context — role, industry, organisational setting.",
        negative_text: "Consider how your development pathway connects to the specific demands of your role, industry, or organisational context.",
    },
    ChecklistItem {
        id: "path_responsible",
        label: "Integrates responsible/sustainability-aligned thinking",
        positive_text: "Development pathway integrates responsible and sustainability-aligned thinking.",
        negative_text: "The pathway could integrate how futures thinking connects to responsible practice and sustainability challenges.",
    },
    ChecklistItem {
        id: "path_concrete",
        label: "Concrete practices with plausible implementation",
        positive_text: "Concrete, implementable practices are identified — this pathway could actually be followed.",
        negative_text: "The development practices remain vague — what specifically will you do, how often, and in what contexts?",
    },
    ChecklistItem {
        id: "path_ongoing",
        label: "Commitment to ongoing metacognitive practice",
        positive_text: "Shows commitment to ongoing metacognitive practice, not just module completion.",
        negative_text: "The pathway ends with the module rather than showing commitment to ongoing metacognitive development beyond it.",
    },
];

/// Red flags that cap the score at Satisfactory/Good
pub const CRITICAL_RED_FLAGS: [RedFlag; 5] = [
    RedFlag {
        id: "rf_no_reflection",
        label: "No genuine self-reflection — describes actions, not thinking",
        score_cap: 59,
    },
    RedFlag {
        id: "rf_kts_not_analytical",
        label: "KTS mentioned but not used analytically",
        score_cap: 69,
    },
    RedFlag {
        id: "rf_no_evidence",
        label: "Claims transformation without specific evidence",
        score_cap: 59,
    },
    RedFlag {
        id: "rf_essay_not_reflection",
        label: "Reads as essay about futures thinking, not personal reflection",
        score_cap: 59,
    },
    RedFlag {
        id: "rf_conclusion_mismatch",
        label: "Conclusion contradicts or doesn't follow from analysis",
        score_cap: 69,
    },
];

/// Red flags that cap the score at Good/Excellent
pub const MODERATE_RED_FLAGS: [RedFlag; 5] = [
    RedFlag {
        id: "rf_kts_label",
        label: "Treats KTS as personality label rather than analytical tool",
        score_cap: 84,
    },
    RedFlag {
        id: "rf_generic",
        label: "Generic examples without specificity from lived experience",
        score_cap: 79,
    },
    RedFlag {
        id: "rf_vague_pathway",
        label: "Development pathway is vague aspirations without concrete plans",
        score_cap: 79,
    },
    RedFlag {
        id: "rf_performed",
        label: "Performed reflection rather than authentic reflection",
        score_cap: 74,
    },
    RedFlag {
        id: "rf_no_appendix",
        label: "Missing KTS appendix",
        score_cap: 79,
    },
];

/// Qualities spanning all pillars; informational only, never scored
pub const CROSS_PILLAR_CHECKS: [SimpleCheck; 7] = [
    SimpleCheck {
        id: "cp_specificity",
        label: "Specificity over generality throughout",
    },
    SimpleCheck {
        id: "cp_honesty",
        label: "Honesty over performance throughout",
    },
    SimpleCheck {
        id: "cp_analysis",
        label: "Analysis over description throughout",
    },
    SimpleCheck {
        id: "cp_integration",
        label: "Integration across parts (not disconnected sections)",
    },
    SimpleCheck {
        id: "cp_voice",
        label: "First-person ownership and authentic voice",
    },
    SimpleCheck {
        id: "cp_themes",
        label: "Grounded in module themes",
    },
    SimpleCheck {
        id: "cp_narrative",
        label: "Coherent development narrative (start → shifts → pathway)",
    },
];

/// Look up a pillar by id
pub fn pillar(id: &str) -> Option<&'static Pillar> {
    PILLARS.iter().find(|p| p.id == id)
}

/// The checklist items belonging to a pillar, in declaration order
pub fn pillar_items(pillar_id: &str) -> &'static [ChecklistItem] {
    match pillar_id {
        "metacognitive" => &METACOGNITIVE_ITEMS,
        "kts" => &KTS_ITEMS,
        "transformation" => &TRANSFORMATION_ITEMS,
        "pathway" => &PATHWAY_ITEMS,
        _ => &[],
    }
}

/// The pillar a checklist item belongs to, if any
pub fn pillar_for_item(item_id: &str) -> Option<&'static Pillar> {
    PILLARS
        .iter()
        .find(|p| pillar_items(p.id).iter().any(|i| i.id == item_id))
}

/// All red flags, critical tier first, each tier in declaration order
pub fn all_red_flags() -> impl Iterator<Item = &'static RedFlag> {
    CRITICAL_RED_FLAGS.iter().chain(MODERATE_RED_FLAGS.iter())
}

/// Look up a band by id
pub fn band(id: &str) -> Option<&'static Band> {
    BANDS.iter().find(|b| b.id == id)
}
