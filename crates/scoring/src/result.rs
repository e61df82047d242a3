//! Score results.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use taskrank_core::{InvalidTaskData, TaskInput};

/// Fields a [`ScoreResult`] contributes when merged into a task record.
const SCORE_FIELDS: [&str; 4] = ["priority_score", "priority_level", "explanation", "breakdown"];

/// Coarse priority bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PriorityLevel {
    /// Score of 80 or more
    High,
    /// Score of 50 or more
    Medium,
    /// Anything lower
    Low,
}

impl PriorityLevel {
    /// Bucket a final score.
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            PriorityLevel::High
        } else if score >= 50.0 {
            PriorityLevel::Medium
        } else {
            PriorityLevel::Low
        }
    }

    /// Display name.
    pub fn as_str(self) -> &'static str {
        match self {
            PriorityLevel::High => "High",
            PriorityLevel::Medium => "Medium",
            PriorityLevel::Low => "Low",
        }
    }
}

impl std::fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Component scores behind a final score, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    /// Urgency sub-score
    pub urgency: f64,
    /// Importance sub-score
    pub importance: f64,
    /// Effort sub-score
    pub effort: f64,
    /// Dependency boost before the strategy multiplier
    pub dependency_boost: f64,
}

/// Outcome of scoring one task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Final score, rounded to two decimals
    pub priority_score: f64,
    /// Bucket of the unrounded score
    pub priority_level: PriorityLevel,
    /// Reasons joined by " • "
    pub explanation: String,
    /// Component scores; `None` when the task data was invalid
    #[serde(serialize_with = "serialize_breakdown")]
    pub breakdown: Option<ScoreBreakdown>,
}

impl ScoreResult {
    /// Lowest-priority result standing in for a task that failed coercion.
    pub fn invalid(reason: &InvalidTaskData) -> Self {
        Self {
            priority_score: 0.0,
            priority_level: PriorityLevel::Low,
            explanation: format!("Invalid task data: {}", reason),
            breakdown: None,
        }
    }

    /// Whether this result came from the invalid-data path.
    pub fn is_invalid(&self) -> bool {
        self.breakdown.is_none()
    }
}

/// Serialize a missing breakdown as an empty map.
fn serialize_breakdown<S: Serializer>(
    breakdown: &Option<ScoreBreakdown>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match breakdown {
        Some(b) => b.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

/// A caller's task merged with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzedTask {
    /// The task as supplied
    #[serde(flatten)]
    pub task: TaskInput,

    /// Its score
    #[serde(flatten)]
    pub score: ScoreResult,
}

impl AnalyzedTask {
    /// Merge a task with its score; score fields replace same-named extras.
    pub fn new(mut task: TaskInput, score: ScoreResult) -> Self {
        task.extra.retain(|key, _| !SCORE_FIELDS.contains(&key.as_str()));
        Self { task, score }
    }
}
