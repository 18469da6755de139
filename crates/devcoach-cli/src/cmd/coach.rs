use crate::output::{print_json, print_table};
use anyhow::Context;
use devcoach_core::coaching::{self, Trigger};
use devcoach_core::io::read_input;
use devcoach_core::signals::{self, BlockSpan, CoachingSignals};
use devcoach_core::types::{ActivityMetrics, CoachingLevel};
use std::path::Path;

pub fn level(merged: u32, reviewed: u32, annotation_rate: f64, json: bool) -> anyhow::Result<()> {
    let activity = ActivityMetrics {
        prs_merged_7d: merged,
        prs_reviewed_7d: reviewed,
        annotation_rate,
        ..Default::default()
    };
    let level = coaching::detect_coaching_level(&activity);
    if json {
        return print_json(&serde_json::json!({
            "activity": activity,
            "coaching_level": level,
        }));
    }
    println!("{level}");
    Ok(())
}

pub fn prompt(level: &str, idle: u32, phase: &str, json: bool) -> anyhow::Result<()> {
    let level: CoachingLevel = level.parse()?;
    let should = coaching::should_prompt(level, idle, phase);
    let prompts: &[&str] = if should {
        coaching::prompt_nudges(level, phase)
    } else {
        &[]
    };

    if json {
        return print_json(&serde_json::json!({
            "should_prompt": should,
            "coaching_level": level,
            "phase": phase,
            "prompts": prompts,
        }));
    }
    println!("{}", if should { "prompt" } else { "stay quiet" });
    for p in prompts {
        println!("  - {p}");
    }
    Ok(())
}

pub fn stuck(level: &str, idle: u32, phase: Option<&str>, json: bool) -> anyhow::Result<()> {
    let level: CoachingLevel = level.parse()?;
    let check = coaching::stuck_check(level, idle, phase);
    if json {
        return print_json(&check);
    }

    let trigger = match check.suggested_trigger {
        Trigger::Stuck => "stuck",
        Trigger::PhaseTransition => "phase_transition",
    };
    println!(
        "{} ({} in {}, trigger: {trigger})",
        if check.should_prompt { "prompt" } else { "stay quiet" },
        check.coaching_level,
        check.phase,
    );
    if check.should_prompt {
        for p in coaching::prompt_nudges(level, &check.phase) {
            println!("  - {p}");
        }
    }
    Ok(())
}

pub fn advise(
    annotation_rate: Option<f64>,
    focus: f64,
    consistency: f64,
    streak: u32,
    json: bool,
) -> anyhow::Result<()> {
    let signals = CoachingSignals {
        annotation_rate,
        focus_score: focus,
        consistency_score: consistency,
        weekly_puzzle_streak: streak,
    };
    let recs = signals::build_recommendations(&signals);
    if json {
        return print_json(&serde_json::json!({
            "signals": signals,
            "recommendations": recs,
        }));
    }
    if recs.is_empty() {
        println!("All habits on track.");
    }
    for r in &recs {
        println!("- {r}");
    }
    Ok(())
}

pub fn balance(file: &Path, json: bool) -> anyhow::Result<()> {
    let data =
        read_input(file).with_context(|| format!("failed to read {}", file.display()))?;
    let blocks: Vec<BlockSpan> = serde_json::from_str(&data)
        .with_context(|| format!("{} is not a JSON array of work blocks", file.display()))?;
    let balance = signals::phase_balance(&blocks);

    if json {
        return print_json(&balance);
    }
    if balance.is_empty() {
        println!("No work blocks.");
        return Ok(());
    }
    let rows = balance
        .iter()
        .map(|b| {
            vec![
                b.phase.clone(),
                format!("{:.2}", b.total_minutes),
                b.block_count.to_string(),
            ]
        })
        .collect();
    print_table(&["PHASE", "MINUTES", "BLOCKS"], rows);
    Ok(())
}
