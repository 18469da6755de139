use crate::output::{print_json, print_table};
use anyhow::Context;
use devcoach_core::io::read_input;
use devcoach_core::scoring;
use devcoach_core::types::{EnrichedItem, QueueItem};
use std::path::Path;

fn load_queue(file: &Path) -> anyhow::Result<Vec<QueueItem>> {
    let data =
        read_input(file).with_context(|| format!("failed to read {}", file.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("{} is not a JSON array of queue items", file.display()))
}

fn sp_cell(story_points: Option<i64>) -> String {
    story_points.map_or_else(|| "-".to_string(), |sp| sp.to_string())
}

// ---------------------------------------------------------------------------
// tier
// ---------------------------------------------------------------------------

pub fn tier(story_points: Option<i64>, json: bool) -> anyhow::Result<()> {
    let tier = scoring::story_points_to_tier(story_points);
    if json {
        return print_json(&serde_json::json!({
            "story_points": story_points,
            "tier": tier,
        }));
    }
    println!("{tier}");
    Ok(())
}

// ---------------------------------------------------------------------------
// score
// ---------------------------------------------------------------------------

pub fn score(root: &Path, file: &Path, user: Option<&str>, json: bool) -> anyhow::Result<()> {
    let items = load_queue(file)?;
    let username = super::resolve_user(root, user)?.unwrap_or_default();
    let scored = scoring::score_queue(&items, &username);
    tracing::debug!(items = scored.len(), "scored queue");

    if json {
        return print_json(&scored);
    }
    if scored.is_empty() {
        println!("Queue is empty.");
        return Ok(());
    }
    print_table(&["#", "TYPE", "SCORE", "SP", "PRIORITY", "TITLE"], rows(&scored));
    Ok(())
}

fn rows(scored: &[EnrichedItem]) -> Vec<Vec<String>> {
    scored
        .iter()
        .map(|e| {
            vec![
                e.item.number.to_string(),
                e.item.kind.as_str().to_string(),
                format!("{:.4}", e.score),
                sp_cell(e.item.story_points),
                e.item.priority.as_str().to_string(),
                e.item.title.clone(),
            ]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// recommend
// ---------------------------------------------------------------------------

pub fn recommend(root: &Path, file: &Path, user: Option<&str>, json: bool) -> anyhow::Result<()> {
    let items = load_queue(file)?;
    let username = super::resolve_user(root, user)?.unwrap_or_default();
    let recs = scoring::recommend_top_three(&items, &username);

    if json {
        return print_json(&recs);
    }
    if recs.is_empty() {
        println!("Nothing to recommend: the queue is empty.");
        return Ok(());
    }
    for (rank, rec) in recs.iter().enumerate() {
        println!(
            "{}. #{} {} (score {:.4})",
            rank + 1,
            rec.item.number,
            rec.item.title,
            rec.score
        );
        println!("   {}", rec.explanation);
    }
    Ok(())
}
