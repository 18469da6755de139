use crate::output::{print_json, print_table};
use anyhow::Context;
use chrono::{DateTime, Utc};
use devcoach_core::io::read_input;
use devcoach_core::normalize::{self, RawIssue, RawPull};
use devcoach_core::types::QueueItem;
use serde::de::DeserializeOwned;
use std::path::Path;

fn load_payload<T: DeserializeOwned>(file: Option<&Path>) -> anyhow::Result<Vec<T>> {
    let Some(file) = file else {
        return Ok(Vec::new());
    };
    let data =
        read_input(file).with_context(|| format!("failed to read {}", file.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("{} is not a GitHub list payload", file.display()))
}

fn require_user(root: &Path, user: Option<&str>) -> anyhow::Result<String> {
    match super::resolve_user(root, user)? {
        Some(username) => Ok(username),
        None => {
            anyhow::bail!("no GitHub username: pass --user or run `devcoach init --user NAME`")
        }
    }
}

pub fn run(
    root: &Path,
    user: Option<&str>,
    issues: Option<&Path>,
    pulls: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    if issues.is_none() && pulls.is_none() {
        anyhow::bail!("nothing to normalize: pass --issues and/or --pulls");
    }
    let username = require_user(root, user)?;

    let issues: Vec<RawIssue> = load_payload(issues)?;
    let pulls: Vec<RawPull> = load_payload(pulls)?;
    let queue = normalize::normalize_queue(&issues, &pulls, &username);

    if json {
        return print_json(&queue);
    }
    let rows = queue
        .iter()
        .map(|item| {
            vec![
                item.number.to_string(),
                item.kind.as_str().to_string(),
                item.story_points
                    .map_or_else(|| "-".to_string(), |sp| sp.to_string()),
                item.priority.as_str().to_string(),
                if item.is_assigned_to_user || item.awaiting_review_from_user {
                    "yes".to_string()
                } else {
                    String::new()
                },
                item.title.clone(),
            ]
        })
        .collect();
    print_table(&["#", "TYPE", "SP", "PRIORITY", "MINE", "TITLE"], rows);
    Ok(())
}

// ---------------------------------------------------------------------------
// health
// ---------------------------------------------------------------------------

pub fn health(
    root: &Path,
    user: Option<&str>,
    issues: Option<&Path>,
    pulls: Option<&Path>,
    now: Option<DateTime<Utc>>,
    json: bool,
) -> anyhow::Result<()> {
    let username = require_user(root, user)?;
    let issues: Vec<RawIssue> = load_payload(issues)?;
    let pulls: Vec<RawPull> = load_payload(pulls)?;
    let now = now.unwrap_or_else(Utc::now);
    let report = normalize::repo_health(&issues, &pulls, &username, now);

    if json {
        return print_json(&report);
    }
    let sections: [(&str, &[QueueItem]); 4] = [
        ("Issues without PRs", &report.issues_without_prs),
        ("PRs without issues", &report.prs_without_issues),
        ("PRs awaiting your review", &report.prs_awaiting_review),
        ("Stale issues", &report.stale_issues),
    ];
    for (heading, items) in sections {
        println!("{heading} ({})", items.len());
        for item in items {
            println!("  #{} {}", item.number, item.title);
        }
    }
    println!("Total hygiene issues: {}", report.total_hygiene_issues);
    Ok(())
}
