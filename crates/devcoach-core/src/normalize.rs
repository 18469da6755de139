//! Turn raw GitHub REST payloads into [`QueueItem`]s.
//!
//! Only the fields the scorer needs are read; everything else in the payload
//! is ignored. Fetching the payloads is the caller's job.

use crate::types::{ItemKind, Priority, QueueItem};
use chrono::{DateTime, Duration, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Raw payload shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLabel {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawUser {
    pub login: String,
}

/// An entry of `GET /repos/{owner}/{repo}/issues`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawIssue {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub state: Option<String>,
    pub body: Option<String>,
    pub labels: Vec<RawLabel>,
    pub assignees: Vec<RawUser>,
    /// RFC 3339 timestamp, e.g. `2024-05-01T12:00:00Z`.
    pub updated_at: Option<String>,
    /// Present when the "issue" is really a pull request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<serde_json::Value>,
}

/// An entry of `GET /repos/{owner}/{repo}/pulls`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPull {
    pub number: u64,
    pub title: String,
    pub html_url: String,
    pub state: Option<String>,
    pub body: Option<String>,
    pub labels: Vec<RawLabel>,
    pub assignees: Vec<RawUser>,
    pub requested_reviewers: Vec<RawUser>,
    pub draft: bool,
    pub updated_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Field extraction
// ---------------------------------------------------------------------------

fn sp_label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^sp:(\d+)$").expect("valid regex"))
}

fn issue_ref_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:closes?|fixe?s?|resolves?|refs?|references?|see)?\s*#(\d+)")
            .expect("valid regex")
    })
}

fn sp_body_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\*\*Story\s+Points:\*\*\s*(\d+)").expect("valid regex"))
}

/// Story points from an `sp:N` label, else from a `**Story Points:** N` line
/// in the body.
pub fn parse_story_points(labels: &[RawLabel], body: Option<&str>) -> Option<i64> {
    let from_labels = labels.iter().find_map(|label| {
        sp_label_re()
            .captures(&label.name)
            .and_then(|caps| caps[1].parse().ok())
    });
    from_labels.or_else(|| {
        body.and_then(|b| sp_body_re().captures(b))
            .and_then(|caps| caps[1].parse().ok())
    })
}

/// Issue numbers mentioned as `#N` (optionally after `closes`, `fixes`,
/// `resolves`, `refs` or `see`).
pub fn extract_issue_refs(text: Option<&str>) -> BTreeSet<u64> {
    let Some(text) = text else {
        return BTreeSet::new();
    };
    issue_ref_re()
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}

pub fn extract_priority(labels: &[RawLabel]) -> Priority {
    let names: Vec<String> = labels.iter().map(|l| l.name.to_lowercase()).collect();
    let has_any = |wanted: &[&str]| names.iter().any(|n| wanted.contains(&n.as_str()));
    if has_any(&["critical", "blocker", "p0"]) {
        Priority::Critical
    } else if has_any(&["high", "high-priority", "p1"]) {
        Priority::High
    } else {
        Priority::Normal
    }
}

fn logins(users: &[RawUser]) -> Vec<String> {
    users.iter().map(|u| u.login.clone()).collect()
}

fn label_names(labels: &[RawLabel]) -> Vec<String> {
    labels.iter().map(|l| l.name.clone()).collect()
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

pub fn normalize_issue(raw: &RawIssue, username: &str) -> QueueItem {
    let assignees = logins(&raw.assignees);
    QueueItem {
        kind: ItemKind::Issue,
        number: raw.number,
        title: raw.title.clone(),
        url: raw.html_url.clone(),
        state: raw.state.clone().unwrap_or_else(|| "open".to_string()),
        labels: label_names(&raw.labels),
        story_points: parse_story_points(&raw.labels, raw.body.as_deref()),
        priority: extract_priority(&raw.labels),
        is_assigned_to_user: assignees.iter().any(|a| a == username),
        assignees,
        user_commented: false,
        awaiting_review_from_user: false,
    }
}

pub fn normalize_pull(raw: &RawPull, username: &str) -> QueueItem {
    let assignees = logins(&raw.assignees);
    QueueItem {
        kind: ItemKind::PullRequest,
        number: raw.number,
        title: raw.title.clone(),
        url: raw.html_url.clone(),
        state: raw.state.clone().unwrap_or_else(|| "open".to_string()),
        labels: label_names(&raw.labels),
        story_points: parse_story_points(&raw.labels, raw.body.as_deref()),
        priority: extract_priority(&raw.labels),
        is_assigned_to_user: assignees.iter().any(|a| a == username),
        assignees,
        user_commented: false,
        awaiting_review_from_user: raw.requested_reviewers.iter().any(|r| r.login == username),
    }
}

/// Issues first, then pull requests. The issues endpoint also lists pull
/// requests; those entries are dropped in favour of the `pulls` payload.
pub fn normalize_queue(issues: &[RawIssue], pulls: &[RawPull], username: &str) -> Vec<QueueItem> {
    issues
        .iter()
        .filter(|raw| raw.pull_request.is_none())
        .map(|raw| normalize_issue(raw, username))
        .chain(pulls.iter().map(|raw| normalize_pull(raw, username)))
        .collect()
}

// ---------------------------------------------------------------------------
// Repo hygiene
// ---------------------------------------------------------------------------

/// Issues untouched for longer than this count as stale.
pub const STALE_AFTER_DAYS: i64 = 7;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoHealth {
    /// Open issues no open pull request refers to.
    pub issues_without_prs: Vec<QueueItem>,
    /// Non-draft pull requests that mention no issue.
    pub prs_without_issues: Vec<QueueItem>,
    pub prs_awaiting_review: Vec<QueueItem>,
    /// Stale issues assigned to the user or to nobody.
    pub stale_issues: Vec<QueueItem>,
    pub total_hygiene_issues: usize,
}

fn pull_refs(raw: &RawPull) -> BTreeSet<u64> {
    let mut refs = extract_issue_refs(raw.body.as_deref());
    refs.extend(extract_issue_refs(Some(&raw.title)));
    refs
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|t| t.with_timezone(&Utc))
}

/// Hygiene report over one snapshot of a repo's open issues and pulls.
///
/// `now` anchors the staleness cutoff. Issue entries that are really pull
/// requests are skipped, as in [`normalize_queue`]. Missing or malformed
/// `updated_at` values never count as stale.
pub fn repo_health(
    issues: &[RawIssue],
    pulls: &[RawPull],
    username: &str,
    now: DateTime<Utc>,
) -> RepoHealth {
    let referenced: BTreeSet<u64> = pulls.iter().flat_map(pull_refs).collect();
    let cutoff = now - Duration::days(STALE_AFTER_DAYS);

    let mut health = RepoHealth::default();

    for raw in issues.iter().filter(|raw| raw.pull_request.is_none()) {
        let item = normalize_issue(raw, username);
        if !referenced.contains(&raw.number) {
            health.issues_without_prs.push(item.clone());
        }
        let stale = parse_timestamp(raw.updated_at.as_deref()).is_some_and(|t| t < cutoff);
        if stale && (item.assignees.is_empty() || item.is_assigned_to_user) {
            health.stale_issues.push(item);
        }
    }

    for raw in pulls {
        let item = normalize_pull(raw, username);
        if !raw.draft && pull_refs(raw).is_empty() {
            health.prs_without_issues.push(item.clone());
        }
        if item.awaiting_review_from_user {
            health.prs_awaiting_review.push(item);
        }
    }

    health.total_hygiene_issues = health.issues_without_prs.len()
        + health.prs_without_issues.len()
        + health.prs_awaiting_review.len()
        + health.stale_issues.len();
    health
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
