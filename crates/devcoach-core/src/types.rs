use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ItemKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    #[default]
    Issue,
    PullRequest,
}

impl ItemKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Issue => "issue",
            ItemKind::PullRequest => "pull_request",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Priority label of a queue item.
///
/// Parsing is case-insensitive and never fails: anything that is not one of
/// the known labels (including `null`) reads as `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Priority {
    Critical,
    Blocker,
    High,
    #[default]
    Normal,
}

impl Priority {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Priority::Critical,
            "blocker" => Priority::Blocker,
            "high" => Priority::High,
            _ => Priority::Normal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::Blocker => "blocker",
            Priority::High => "high",
            Priority::Normal => "normal",
        }
    }

    /// Critical and blocker items share the top urgency band.
    pub fn is_urgent(self) -> bool {
        matches!(self, Priority::Critical | Priority::Blocker)
    }
}

impl From<Option<String>> for Priority {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Priority::parse).unwrap_or_default()
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// QueueItem
// ---------------------------------------------------------------------------

/// A GitHub issue or pull request normalized for scoring.
///
/// Every field has a default so partially populated records still score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueItem {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub state: String,
    pub labels: Vec<String>,
    pub story_points: Option<i64>,
    pub priority: Priority,
    pub assignees: Vec<String>,
    pub is_assigned_to_user: bool,
    pub user_commented: bool,
    pub awaiting_review_from_user: bool,
}

impl Default for QueueItem {
    fn default() -> Self {
        Self {
            kind: ItemKind::Issue,
            number: 0,
            title: String::new(),
            url: String::new(),
            state: "open".to_string(),
            labels: Vec::new(),
            story_points: None,
            priority: Priority::Normal,
            assignees: Vec::new(),
            is_assigned_to_user: false,
            user_commented: false,
            awaiting_review_from_user: false,
        }
    }
}

/// A queue item annotated with its rounded score and the reasons it ranks
/// where it does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedItem {
    #[serde(flatten)]
    pub item: QueueItem,
    pub score: f64,
    pub explanation: String,
}

// ---------------------------------------------------------------------------
// ActivityMetrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityMetrics {
    pub prs_merged_7d: u32,
    pub prs_reviewed_7d: u32,
    pub issue_comments_7d: u32,
    /// Fraction of work blocks closed with a comment, 0.0 to 1.0.
    #[serde(deserialize_with = "null_as_zero")]
    pub annotation_rate: f64,
    pub avg_review_latency_hours: Option<f64>,
}

fn null_as_zero<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

// ---------------------------------------------------------------------------
// CoachingLevel
// ---------------------------------------------------------------------------

/// `Peter` is the autonomous, experienced mode; `Ransom` is the nurturing
/// mode for developers still building habits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachingLevel {
    Peter,
    #[default]
    Ransom,
}

impl CoachingLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            CoachingLevel::Peter => "peter",
            CoachingLevel::Ransom => "ransom",
        }
    }
}

impl fmt::Display for CoachingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CoachingLevel {
    type Err = crate::error::CoachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "peter" => Ok(CoachingLevel::Peter),
            "ransom" => Ok(CoachingLevel::Ransom),
            _ => Err(crate::error::CoachError::InvalidLevel(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// WorkPhase
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkPhase {
    Planning,
    Coding,
    Debugging,
    Review,
    Idle,
}

impl WorkPhase {
    pub fn all() -> &'static [WorkPhase] {
        &[
            WorkPhase::Planning,
            WorkPhase::Coding,
            WorkPhase::Debugging,
            WorkPhase::Review,
            WorkPhase::Idle,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkPhase::Planning => "planning",
            WorkPhase::Coding => "coding",
            WorkPhase::Debugging => "debugging",
            WorkPhase::Review => "review",
            WorkPhase::Idle => "idle",
        }
    }

    /// Hands-on phases where a long silence likely means the developer is stuck.
    pub fn is_active(self) -> bool {
        matches!(
            self,
            WorkPhase::Coding | WorkPhase::Debugging | WorkPhase::Review
        )
    }
}

impl fmt::Display for WorkPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorkPhase {
    type Err = crate::error::CoachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planning" => Ok(WorkPhase::Planning),
            "coding" => Ok(WorkPhase::Coding),
            "debugging" => Ok(WorkPhase::Debugging),
            "review" => Ok(WorkPhase::Review),
            "idle" => Ok(WorkPhase::Idle),
            _ => Err(crate::error::CoachError::InvalidPhase(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
