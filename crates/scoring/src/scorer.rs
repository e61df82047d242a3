//! The task scorer.

use chrono::Local;
use taskrank_core::{Date, NormalizedTask, TaskInput};
use tracing::{debug, warn};

use crate::components::{days_until, effort_score, importance_score, urgency_score, DependencyContext};
use crate::explanation::explain;
use crate::result::{AnalyzedTask, PriorityLevel, ScoreBreakdown, ScoreResult};
use crate::strategy::{ScoringError, Strategy};

/// Number of suggestions returned when the caller does not ask for a count.
pub const DEFAULT_SUGGESTIONS: usize = 3;

/// Scores tasks under a fixed strategy and reference date.
///
/// A scorer holds no mutable state; one instance can serve any number of
/// threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Scorer {
    strategy: Strategy,
    today: Date,
}

impl Scorer {
    /// Create a scorer for a catalog strategy, dated today.
    ///
    /// The current date is read once here and reused for every call.
    pub fn new(strategy: &str) -> Result<Self, ScoringError> {
        Self::with_today(strategy, Local::now().date_naive())
    }

    /// Create a scorer with an explicit reference date.
    pub fn with_today(strategy: &str, today: Date) -> Result<Self, ScoringError> {
        Ok(Self::from_strategy(strategy.parse()?, today))
    }

    /// Create a scorer from an already parsed strategy.
    pub fn from_strategy(strategy: Strategy, today: Date) -> Self {
        Self { strategy, today }
    }

    /// The active strategy.
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The reference date.
    pub fn today(&self) -> Date {
        self.today
    }

    /// Score one task.
    ///
    /// `all_tasks` is the batch used for the dependency boost; when omitted the
    /// task is scored as a batch of one. Invalid task data never fails: it
    /// yields a zero, `Low` result explaining what was wrong.
    pub fn score(&self, task: &TaskInput, all_tasks: Option<&[TaskInput]>) -> ScoreResult {
        let batch = all_tasks.unwrap_or(std::slice::from_ref(task));
        self.score_in_context(task, &DependencyContext::from_tasks(batch))
    }

    /// Score one task against a precomputed dependency context.
    pub fn score_in_context(&self, task: &TaskInput, context: &DependencyContext) -> ScoreResult {
        match task.normalize() {
            Ok(normalized) => self.score_normalized(&normalized, context.boost()),
            Err(e) => {
                warn!(task = ?task.id, title = %task.title, error = %e, "Invalid task data");
                ScoreResult::invalid(&e)
            }
        }
    }

    fn score_normalized(&self, task: &NormalizedTask, dependency_boost: f64) -> ScoreResult {
        let days = days_until(task.due_date, self.today);
        let urgency = urgency_score(days);
        let importance = importance_score(task.importance);
        let effort = effort_score(task.estimated_hours);

        let w = self.strategy.weights();
        let base = urgency * w.urgency + importance * w.importance + effort * w.effort;
        let final_score = base + dependency_boost * w.dependency_multiplier;
        let level = PriorityLevel::from_score(final_score);

        debug!(
            task = ?task.id,
            strategy = %self.strategy,
            days_until = days,
            score = final_score,
            level = %level,
            "Scored task"
        );

        ScoreResult {
            priority_score: round2(final_score),
            priority_level: level,
            explanation: explain(task, days),
            breakdown: Some(ScoreBreakdown {
                urgency: round2(urgency),
                importance: round2(importance),
                effort: round2(effort),
                dependency_boost: round2(dependency_boost),
            }),
        }
    }

    /// Score every task against the whole batch, highest score first.
    ///
    /// The sort is stable: tasks with equal scores keep their input order.
    pub fn analyze(&self, tasks: &[TaskInput]) -> Vec<AnalyzedTask> {
        let context = DependencyContext::from_tasks(tasks);

        let mut analyzed: Vec<AnalyzedTask> = tasks
            .iter()
            .map(|task| AnalyzedTask::new(task.clone(), self.score_in_context(task, &context)))
            .collect();

        analyzed.sort_by(|a, b| b.score.priority_score.total_cmp(&a.score.priority_score));

        debug!(
            strategy = %self.strategy,
            tasks = analyzed.len(),
            linked = context.linked_tasks(),
            "Analyzed batch"
        );
        analyzed
    }

    /// The `n` highest-scoring tasks; fewer when the batch is smaller.
    pub fn suggest(&self, tasks: &[TaskInput], n: usize) -> Vec<AnalyzedTask> {
        let mut analyzed = self.analyze(tasks);
        analyzed.truncate(n);
        analyzed
    }

    /// [`Self::suggest`] with [`DEFAULT_SUGGESTIONS`].
    pub fn top_suggestions(&self, tasks: &[TaskInput]) -> Vec<AnalyzedTask> {
        self.suggest(tasks, DEFAULT_SUGGESTIONS)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn today() -> Date {
        Date::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn scorer() -> Scorer {
        Scorer::with_today("smart_balance", today()).unwrap()
    }

    fn task(id: i64, title: &str, days: i64, hours: f64, importance: i64) -> TaskInput {
        TaskInput::new(title)
            .with_id(id)
            .with_due_date(today() + Duration::days(days))
            .with_hours(hours)
            .with_importance(importance)
    }

    #[test]
    fn test_invalid_strategy_rejected() {
        let err = Scorer::new("invalid_strategy").unwrap_err();
        assert!(matches!(err, ScoringError::InvalidStrategy { .. }));
    }

    #[test]
    fn test_new_parses_strategy() {
        let scorer = Scorer::new("high_impact").unwrap();
        assert_eq!(scorer.strategy(), Strategy::HighImpact);
    }

    #[test]
    fn test_valid_task_scores() {
        let result = scorer().score(&task(1, "Test Task", 1, 2.0, 8), None);

        assert!(result.priority_score > 0.0);
        let breakdown = result.breakdown.unwrap();
        assert_eq!(breakdown.urgency, 90.0);
        assert_eq!(breakdown.importance, 80.0);
        assert_eq!(breakdown.effort, 40.0);
        assert_eq!(breakdown.dependency_boost, 0.0);
        // 90*0.4 + 80*0.35 + 40*0.2
        assert_eq!(result.priority_score, 72.0);
        assert_eq!(result.priority_level, PriorityLevel::Medium);
    }

    #[test]
    fn test_high_priority_task() {
        let result = scorer().score(&task(1, "Urgent Important Task", 0, 1.0, 10), None);

        assert!(result.priority_score >= 80.0);
        assert_eq!(result.priority_score, 86.33);
        assert_eq!(result.priority_level, PriorityLevel::High);
    }

    #[test]
    fn test_invalid_data_degrades() {
        let input: TaskInput = serde_json::from_value(json!({
            "title": "Invalid Task",
            "due_date": "invalid-date",
            "estimated_hours": "not-a-number",
            "importance": 5
        }))
        .unwrap();
        let result = scorer().score(&input, None);

        assert_eq!(result.priority_score, 0.0);
        assert_eq!(result.priority_level, PriorityLevel::Low);
        assert!(result.explanation.contains("Invalid task data"));
        assert!(result.breakdown.is_none());
    }

    #[test]
    fn test_invalid_hours_only() {
        let input: TaskInput = serde_json::from_value(json!({
            "title": "Bad hours",
            "due_date": "2024-06-10",
            "estimated_hours": "not-a-number"
        }))
        .unwrap();
        let result = scorer().score(&input, None);

        assert!(result.is_invalid());
        assert!(result.explanation.starts_with("Invalid task data: estimated hours"));
    }

    #[test]
    fn test_explanation_generation() {
        let result = scorer().score(&task(1, "Quick Important Task", 0, 1.0, 9), None);

        assert!(result.explanation.contains("Due today"));
        assert!(result.explanation.contains("High importance"));
        assert!(result.explanation.contains("Quick win"));
    }

    #[test]
    fn test_overdue_can_exceed_hundred() {
        let overdue = task(1, "Late", -30, 0.5, 10).with_dependencies([2]);
        let batch = vec![
            overdue.clone(),
            task(2, "Other", 5, 3.0, 5).with_dependencies([1]),
            task(3, "Third", 5, 3.0, 5).with_dependencies([1]),
            task(4, "Fourth", 5, 3.0, 5).with_dependencies([1]),
        ];
        let result = scorer().score(&overdue, Some(&batch));

        let breakdown = result.breakdown.unwrap();
        assert_eq!(breakdown.urgency, 150.0);
        assert_eq!(breakdown.dependency_boost, 50.0);
        // 150*0.4 + 100*0.35 + 100*0.2 + 50*1.0
        assert_eq!(result.priority_score, 165.0);
        assert_eq!(result.priority_level, PriorityLevel::High);
    }

    #[test]
    fn test_dependency_boost_scaled_by_strategy() {
        let batch = vec![task(1, "Base", 10, 4.0, 5), task(2, "Child", 10, 4.0, 5).with_dependencies([1])];
        let plain = Scorer::with_today("deadline_driven", today()).unwrap().score(&batch[0], None);
        let boosted = Scorer::with_today("deadline_driven", today()).unwrap().score(&batch[0], Some(&batch));

        assert_eq!(boosted.breakdown.unwrap().dependency_boost, 15.0);
        assert!((boosted.priority_score - plain.priority_score - 4.5).abs() < 0.011);
    }

    #[test]
    fn test_analyze_sorts_descending() {
        let tasks = vec![
            task(1, "Low Priority", 30, 10.0, 2),
            task(2, "High Priority", 0, 1.0, 10),
            task(3, "Medium Priority", 7, 5.0, 5),
        ];
        let analyzed = scorer().analyze(&tasks);

        assert_eq!(analyzed.len(), 3);
        assert!(analyzed[0].score.priority_score >= analyzed[1].score.priority_score);
        assert!(analyzed[1].score.priority_score >= analyzed[2].score.priority_score);
        assert_eq!(analyzed[0].task.title, "High Priority");
        assert_eq!(analyzed[1].task.title, "Medium Priority");
        assert_eq!(analyzed[2].task.title, "Low Priority");
    }

    #[test]
    fn test_analyze_keeps_input_order_on_ties() {
        let tasks = vec![
            task(1, "First", 5, 2.0, 6),
            task(2, "Second", 5, 2.0, 6),
            task(3, "Third", 5, 2.0, 6),
        ];
        let titles: Vec<_> = scorer().analyze(&tasks).into_iter().map(|a| a.task.title).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_analyze_survives_bad_record() {
        let mut bad = TaskInput::new("Broken").with_id(9);
        bad.due_date = Some(json!("31/12/2024"));
        let tasks = vec![bad, task(1, "Fine", 3, 1.0, 6)];
        let analyzed = scorer().analyze(&tasks);

        assert_eq!(analyzed.len(), 2);
        assert_eq!(analyzed[0].task.title, "Fine");
        assert!(analyzed[1].score.is_invalid());
    }

    #[test]
    fn test_top_suggestions() {
        let tasks: Vec<_> = (1..=5)
            .map(|i| task(i, &format!("Task {}", i), i, i as f64, 10 - i))
            .collect();
        let suggestions = scorer().suggest(&tasks, 3);

        assert_eq!(suggestions.len(), 3);
        assert!(suggestions[0].score.priority_score >= suggestions[1].score.priority_score);
        assert_eq!(scorer().top_suggestions(&tasks), suggestions);
    }

    #[test]
    fn test_suggestions_not_padded() {
        let tasks = vec![task(1, "One", 1, 1.0, 5), task(2, "Two", 2, 1.0, 5)];
        assert_eq!(scorer().top_suggestions(&tasks).len(), 2);
        assert!(scorer().top_suggestions(&[]).is_empty());
    }

    #[test]
    fn test_strategies_differ() {
        let t = task(1, "Test Task", 7, 5.0, 7);
        let mut scores: Vec<f64> = Strategy::ALL
            .into_iter()
            .map(|s| Scorer::from_strategy(s, today()).score(&t, None).priority_score)
            .collect();
        scores.sort_by(f64::total_cmp);
        scores.dedup();

        assert!(scores.len() > 1);
    }

    #[test]
    fn test_scorer_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Scorer>();
    }

    #[test]
    fn test_missing_hours_and_importance_use_defaults() {
        let input = TaskInput::new("Bare").with_id(1).with_due_date(today());
        let result = scorer().score(&input, None);

        let breakdown = result.breakdown.unwrap();
        assert_eq!(breakdown.importance, 50.0);
        assert_eq!(breakdown.effort, 66.67);
        assert!(result.explanation.contains("Quick win"));
        assert!(!result.explanation.contains("High importance"));
    }

    #[test]
    fn test_null_hours_is_invalid() {
        let input: TaskInput = serde_json::from_value(json!({
            "title": "Null hours",
            "due_date": "2024-06-10",
            "estimated_hours": null
        }))
        .unwrap();
        let result = scorer().score(&input, None);

        assert!(result.is_invalid());
        assert_eq!(result.explanation, "Invalid task data: estimated hours null is not a number");
    }

    #[test]
    fn test_malformed_record_does_not_sink_batch() {
        let tasks: Vec<TaskInput> = serde_json::from_value(json!([
            { "id": 1, "title": "Fine", "due_date": "2024-06-10" },
            { "id": 1.5, "title": null, "due_date": "2024-06-10", "dependencies": null }
        ]))
        .unwrap();
        let analyzed = scorer().analyze(&tasks);

        assert_eq!(analyzed.len(), 2);
        assert_eq!(analyzed[0].task.title, "Fine");
        assert!(!analyzed[0].score.is_invalid());
        assert!(analyzed[1].score.is_invalid());
        assert!(analyzed[1].score.explanation.starts_with("Invalid task data: id 1.5"));
    }
}
