//! Habit signals derived from a developer's recent work blocks, plus the
//! suggestions shown next to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const ANNOTATION_RATE_TARGET: f64 = 0.7;
pub const FOCUS_SCORE_TARGET: f64 = 0.4;
pub const CONSISTENCY_SCORE_TARGET: f64 = 0.6;
pub const WEEKLY_PUZZLE_TARGET: u32 = 3;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoachingSignals {
    pub annotation_rate: Option<f64>,
    pub focus_score: f64,
    pub consistency_score: f64,
    pub weekly_puzzle_streak: u32,
}

fn round3(value: f64) -> f64 {
    (value * 1_000.0).round() / 1_000.0
}

/// Share of block time spent in the address (hands-on) phase.
pub fn focus_score(address_minutes: f64, total_minutes: f64) -> f64 {
    if total_minutes <= 0.0 {
        return 0.0;
    }
    round3(address_minutes / total_minutes)
}

/// Share of recent weekdays that had at least one session.
pub fn consistency_score(active_weekdays: usize, weekdays: usize) -> f64 {
    if weekdays == 0 {
        return 0.0;
    }
    round3(active_weekdays as f64 / weekdays as f64)
}

/// A closed (or still open) work block, as far as time accounting goes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockSpan {
    pub phase: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl BlockSpan {
    /// Zero unless both ends are known.
    pub fn minutes(&self) -> f64 {
        match (self.started_at, self.ended_at) {
            (Some(start), Some(end)) => (end - start).num_milliseconds() as f64 / 60_000.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseBalance {
    pub phase: String,
    pub total_minutes: f64,
    pub block_count: u32,
}

/// Time spent per phase, sorted by phase name. Blocks without a phase are
/// counted under `unknown`.
pub fn phase_balance(blocks: &[BlockSpan]) -> Vec<PhaseBalance> {
    let mut totals: BTreeMap<&str, (f64, u32)> = BTreeMap::new();
    for block in blocks {
        let phase = block
            .phase
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or("unknown");
        let entry = totals.entry(phase).or_default();
        entry.0 += block.minutes();
        entry.1 += 1;
    }
    totals
        .into_iter()
        .map(|(phase, (minutes, count))| PhaseBalance {
            phase: phase.to_string(),
            total_minutes: (minutes * 100.0).round() / 100.0,
            block_count: count,
        })
        .collect()
}

pub fn build_recommendations(signals: &CoachingSignals) -> Vec<String> {
    let mut recs = Vec::new();
    if signals
        .annotation_rate
        .is_some_and(|rate| rate < ANNOTATION_RATE_TARGET)
    {
        recs.push(
            "Comment on issues when you finish a work block — it builds team trust.".to_string(),
        );
    }
    if signals.focus_score < FOCUS_SCORE_TARGET {
        recs.push(
            "More time in the Address phase means less context-switching. Try the full Pomodoro."
                .to_string(),
        );
    }
    if signals.consistency_score < CONSISTENCY_SCORE_TARGET {
        recs.push(
            "Showing up consistently beats long irregular sessions. Aim for daily commits."
                .to_string(),
        );
    }
    if signals.weekly_puzzle_streak < WEEKLY_PUZZLE_TARGET {
        recs.push(
            "Daily puzzle warm-ups sharpen pattern recognition — try to hit 5 this week."
                .to_string(),
        );
    }
    recs
}
