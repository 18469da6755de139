use crate::types::{ActivityMetrics, CoachingLevel, WorkPhase};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Level detection
// ---------------------------------------------------------------------------

pub const PETER_PRS_MERGED_PER_WEEK: u32 = 3;
pub const PETER_PRS_REVIEWED_PER_WEEK: u32 = 5;
pub const PETER_ANNOTATION_RATE: f64 = 0.8;

/// `Peter` only when every weekly threshold is met; there is no partial
/// credit and no memory of previous results.
pub fn detect_coaching_level(activity: &ActivityMetrics) -> CoachingLevel {
    if activity.prs_merged_7d >= PETER_PRS_MERGED_PER_WEEK
        && activity.prs_reviewed_7d >= PETER_PRS_REVIEWED_PER_WEEK
        && activity.annotation_rate >= PETER_ANNOTATION_RATE
    {
        CoachingLevel::Peter
    } else {
        CoachingLevel::Ransom
    }
}

// ---------------------------------------------------------------------------
// Prompt gate
// ---------------------------------------------------------------------------

/// Idle minutes after which a `Peter` developer in an active phase is
/// considered stuck.
pub const PETER_STUCK_AFTER_MINUTES: u32 = 15;
/// Length of a pomodoro cycle; `Ransom` developers get a nudge at each
/// boundary.
pub const POMODORO_MINUTES: u32 = 25;

/// Decide whether to send an unsolicited coaching message right now.
///
/// `idle_minutes == 0` is read as "the phase just changed", so `Ransom`
/// always prompts at zero regardless of phase.
pub fn should_prompt(level: CoachingLevel, idle_minutes: u32, phase: &str) -> bool {
    match level {
        CoachingLevel::Peter => {
            let active = phase
                .parse::<WorkPhase>()
                .map(WorkPhase::is_active)
                .unwrap_or(false);
            active && idle_minutes > PETER_STUCK_AFTER_MINUTES
        }
        CoachingLevel::Ransom => idle_minutes == 0 || idle_minutes % POMODORO_MINUTES == 0,
    }
}

// ---------------------------------------------------------------------------
// Nudges
// ---------------------------------------------------------------------------

const RANSOM_PLANNING: &[&str] = &[
    "Let's set a clear intention for this block. What's the one thing you want to accomplish?",
    "Before you dive in, can you describe the expected outcome in one sentence?",
];

const RANSOM_CODING: &[&str] = &[
    "Great progress! Remember to commit small and often.",
    "How's it going? If you're stuck, try explaining the problem out loud.",
    "Consider writing a quick comment about what you're building while it's fresh in your mind.",
];

const RANSOM_REVIEW: &[&str] = &[
    "Take a moment to read through your changes before requesting a review.",
    "Check: does every changed line have a clear reason for existing?",
];

const RANSOM_IDLE: &[&str] = &[
    "Looks like you've been quiet for a bit. Still making progress?",
    "Sometimes a short walk helps when you're stuck. Back in 5?",
];

const RANSOM_DEFAULT: &[&str] = &[
    "You're doing great. Keep going!",
    "Every line of code is a step forward.",
];

const PETER_STUCK: &[&str] = &[
    "Looks like you might be blocked. What's the crux of the problem?",
    "Have you tried rubber-duck debugging? Sometimes writing it out is enough.",
];

const PETER_PRE_MERGE: &[&str] =
    &["Before you merge: tests green, changelog updated, reviewer comments addressed?"];

/// Canned nudges for the given level and context key.
///
/// `Ransom` keys on the work phase and falls back to general encouragement.
/// `Peter` only has messages for the `stuck` and `pre_merge` triggers.
pub fn coaching_prompts(level: CoachingLevel, context: &str) -> &'static [&'static str] {
    match level {
        CoachingLevel::Peter => match context {
            "stuck" => PETER_STUCK,
            "pre_merge" => PETER_PRE_MERGE,
            _ => &[],
        },
        CoachingLevel::Ransom => match context {
            "planning" => RANSOM_PLANNING,
            "coding" => RANSOM_CODING,
            "review" => RANSOM_REVIEW,
            "idle" => RANSOM_IDLE,
            _ => RANSOM_DEFAULT,
        },
    }
}

/// Nudges to send once [`should_prompt`] said yes.
///
/// `Peter` is only ever interrupted for being stuck, so the phase is not
/// consulted for that level.
pub fn prompt_nudges(level: CoachingLevel, phase: &str) -> &'static [&'static str] {
    match level {
        CoachingLevel::Peter => coaching_prompts(level, "stuck"),
        CoachingLevel::Ransom => coaching_prompts(level, phase),
    }
}

// ---------------------------------------------------------------------------
// Stuck check
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Stuck,
    PhaseTransition,
}

/// Idle minutes after which the suggested trigger flips to `Stuck`.
pub const STUCK_TRIGGER_AFTER_MINUTES: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StuckCheck {
    pub should_prompt: bool,
    pub coaching_level: CoachingLevel,
    pub phase: String,
    pub suggested_trigger: Trigger,
}

/// Poll-time check. `phase` is `None` when no work block is open, which
/// counts as idle.
pub fn stuck_check(level: CoachingLevel, idle_minutes: u32, phase: Option<&str>) -> StuckCheck {
    let phase = phase
        .filter(|p| !p.is_empty())
        .unwrap_or(WorkPhase::Idle.as_str());
    let suggested_trigger = if idle_minutes > STUCK_TRIGGER_AFTER_MINUTES {
        Trigger::Stuck
    } else {
        Trigger::PhaseTransition
    };
    StuckCheck {
        should_prompt: should_prompt(level, idle_minutes, phase),
        coaching_level: level,
        phase: phase.to_string(),
        suggested_trigger,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
