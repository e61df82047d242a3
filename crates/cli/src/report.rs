//! Command output documents and task file input.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use serde_json::Value;
use taskrank_core::TaskInput;
use taskrank_scoring::{AnalyzedTask, Strategy};

/// Output of `analyze`.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    /// Tasks, highest score first
    pub tasks: Vec<AnalyzedTask>,
    /// Strategy applied
    pub strategy_used: Strategy,
    /// Number of tasks
    pub total_tasks: usize,
}

impl AnalysisReport {
    /// Wrap an analysis.
    pub fn new(tasks: Vec<AnalyzedTask>, strategy_used: Strategy) -> Self {
        Self { total_tasks: tasks.len(), tasks, strategy_used }
    }
}

/// Output of `suggest`.
#[derive(Debug, Serialize)]
pub struct SuggestionReport {
    /// Top tasks
    pub suggestions: Vec<AnalyzedTask>,
    /// Strategy applied
    pub strategy_used: Strategy,
    /// Number of suggestions
    pub suggestion_count: usize,
}

impl SuggestionReport {
    /// Wrap a suggestion list.
    pub fn new(suggestions: Vec<AnalyzedTask>, strategy_used: Strategy) -> Self {
        Self { suggestion_count: suggestions.len(), suggestions, strategy_used }
    }
}

/// Plain message output.
#[derive(Debug, Serialize)]
pub struct Message {
    /// Text
    pub message: String,
}

/// Accepted shapes of a task file.
#[derive(Debug)]
pub enum TaskFile {
    /// A bare array of tasks
    List(Vec<TaskInput>),
    /// `{ "tasks": [...], "strategy": "..." }`
    Request {
        /// Tasks to score
        tasks: Vec<TaskInput>,
        /// Optional strategy name
        strategy: Option<String>,
    },
}

impl TaskFile {
    /// Read and parse a task file.
    pub async fn read(path: &Path) -> Result<Self> {
        let text = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parse task file contents.
    ///
    /// Only the outer shape can fail. Each element becomes a [`TaskInput`]
    /// on its own, so a malformed record is scored as invalid data instead of
    /// rejecting the file.
    pub fn parse(text: &str) -> Result<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Array(items) => Ok(TaskFile::List(read_items(items))),
            Value::Object(mut doc) => {
                let tasks = match doc.remove("tasks") {
                    Some(Value::Array(items)) => read_items(items),
                    Some(other) => bail!("\"tasks\" must be an array, found {}", other),
                    None => bail!("expected an array of tasks or an object with a \"tasks\" array"),
                };
                let strategy = match doc.remove("strategy") {
                    None | Some(Value::Null) => None,
                    Some(Value::String(name)) => Some(name),
                    Some(other) => bail!("\"strategy\" must be a string, found {}", other),
                };
                Ok(TaskFile::Request { tasks, strategy })
            }
            other => bail!("expected an array of tasks or an object with a \"tasks\" array, found {}", other),
        }
    }

    /// Split into tasks and the strategy named in the file, if any.
    pub fn into_parts(self) -> (Vec<TaskInput>, Option<String>) {
        match self {
            TaskFile::List(tasks) => (tasks, None),
            TaskFile::Request { tasks, strategy } => (tasks, strategy),
        }
    }
}

fn read_items(items: Vec<Value>) -> Vec<TaskInput> {
    items.into_iter().map(TaskInput::from_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use taskrank_scoring::Scorer;

    #[test]
    fn test_parse_bare_list() {
        let file = TaskFile::parse(r#"[{ "title": "a", "due_date": "2024-06-10" }]"#).unwrap();
        let (tasks, strategy) = file.into_parts();
        assert_eq!(tasks.len(), 1);
        assert!(strategy.is_none());
    }

    #[test]
    fn test_parse_request() {
        let file = TaskFile::parse(
            r#"{ "tasks": [{ "title": "a" }, { "title": "b" }], "strategy": "fastest_wins" }"#,
        )
        .unwrap();
        let (tasks, strategy) = file.into_parts();
        assert_eq!(tasks.len(), 2);
        assert_eq!(strategy.as_deref(), Some("fastest_wins"));
    }

    #[test]
    fn test_malformed_record_keeps_the_rest() {
        let file = TaskFile::parse(
            r#"{ "tasks": [
                { "id": 1, "title": "good", "due_date": "2024-06-10" },
                { "id": 1.5, "title": null, "due_date": "2024-06-10", "dependencies": null },
                7
            ] }"#,
        )
        .unwrap();
        let (tasks, _) = file.into_parts();
        assert_eq!(tasks.len(), 3);

        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let scorer = Scorer::with_today("smart_balance", today).unwrap();
        let analyzed = scorer.analyze(&tasks);
        assert_eq!(analyzed[0].task.title, "good");
        assert!(!analyzed[0].score.is_invalid());
        assert!(analyzed[1].score.is_invalid());
        assert!(analyzed[2].score.is_invalid());
    }

    #[test]
    fn test_outer_shape_errors_are_specific() {
        let err = TaskFile::parse(r#"{ "items": [] }"#).unwrap_err();
        assert!(err.to_string().contains("\"tasks\" array"));

        let err = TaskFile::parse(r#"{ "tasks": [], "strategy": 3 }"#).unwrap_err();
        assert!(err.to_string().contains("\"strategy\" must be a string"));

        let file = TaskFile::parse(r#"{ "tasks": [], "strategy": null }"#).unwrap();
        assert!(file.into_parts().1.is_none());
    }

    #[test]
    fn test_analysis_report_shape() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let scorer = Scorer::with_today("high_impact", today).unwrap();
        let tasks = vec![TaskInput::new("a").with_id(1).with_due_date(today)];
        let report = AnalysisReport::new(scorer.analyze(&tasks), scorer.strategy());
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["strategy_used"], "high_impact");
        assert_eq!(value["total_tasks"], 1);
        assert_eq!(value["tasks"][0]["title"], "a");
        assert_eq!(value["tasks"][0]["priority_level"], "Medium");
    }
}
