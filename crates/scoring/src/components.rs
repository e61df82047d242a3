//! Component scores.
//!
//! Each function here computes one factor of the priority score in isolation:
//! - urgency from the days remaining until the due date
//! - importance from the user rating
//! - effort from the estimated hours (inverse)
//! - dependency boost from the whole batch

use std::collections::HashSet;

use taskrank_core::{Date, TaskInput, TaskKey};

/// Points added per task counted by the dependency boost.
const POINTS_PER_DEPENDENT: f64 = 15.0;

/// Upper bound of the dependency boost.
const MAX_DEPENDENCY_BOOST: f64 = 50.0;

/// Whole calendar days from `today` to `due`; negative when overdue.
pub fn days_until(due: Date, today: Date) -> i64 {
    (due - today).num_days()
}

/// Urgency score for a task due in `days` days.
///
/// Step function: overdue tasks score `100 + 5` per day late (capped at 150),
/// then 95 today, 90 tomorrow, 75 within 3 days, 50 within a week, 30 within
/// two weeks and 10 beyond.
pub fn urgency_score(days: i64) -> f64 {
    match days {
        d if d < 0 => d.saturating_abs().saturating_mul(5).saturating_add(100).min(150) as f64,
        0 => 95.0,
        1 => 90.0,
        2..=3 => 75.0,
        4..=7 => 50.0,
        8..=14 => 30.0,
        _ => 10.0,
    }
}

/// Importance rating mapped onto a 0-100 scale.
pub fn importance_score(importance: i64) -> f64 {
    importance as f64 * 10.0
}

/// Effort score: fewer hours score higher, capped at 100.
pub fn effort_score(estimated_hours: f64) -> f64 {
    (100.0 / (estimated_hours + 0.5)).min(100.0)
}

/// Dependency boost for a batch of tasks.
///
/// Counts the tasks in `all_tasks` whose dependency list names any identifier
/// present in the batch, at 15 points each and at most 50. Blank identifiers
/// (`0` and `""`) are never matched. The count is the
/// same for every task of the batch: it does not look at which task is being
/// depended on.
pub fn dependency_boost(all_tasks: &[TaskInput]) -> f64 {
    DependencyContext::from_tasks(all_tasks).boost()
}

/// Dependency facts about a batch, computed once and shared by every task
/// scored against it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DependencyContext {
    linked_tasks: usize,
}

impl DependencyContext {
    /// Scan a batch.
    pub fn from_tasks(all_tasks: &[TaskInput]) -> Self {
        let known: HashSet<&TaskKey> = all_tasks
            .iter()
            .filter_map(|t| t.id.as_ref())
            .filter(|id| !id.is_blank())
            .collect();
        let linked_tasks = all_tasks
            .iter()
            .filter(|t| t.dependencies.iter().any(|dep| known.contains(dep)))
            .count();

        Self { linked_tasks }
    }

    /// Number of tasks referencing a known identifier.
    pub fn linked_tasks(&self) -> usize {
        self.linked_tasks
    }

    /// Boost derived from [`Self::linked_tasks`].
    pub fn boost(&self) -> f64 {
        (self.linked_tasks as f64 * POINTS_PER_DEPENDENT).min(MAX_DEPENDENCY_BOOST)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(offset: i64) -> (Date, Date) {
        let today = Date::from_ymd_opt(2024, 6, 10).unwrap();
        (today + chrono::Duration::days(offset), today)
    }

    #[test]
    fn test_days_until() {
        let (due, today) = day(-3);
        assert_eq!(days_until(due, today), -3);
        let (due, today) = day(14);
        assert_eq!(days_until(due, today), 14);
    }

    #[test]
    fn test_urgency_breakpoints() {
        assert_eq!(urgency_score(0), 95.0);
        assert_eq!(urgency_score(1), 90.0);
        assert_eq!(urgency_score(2), 75.0);
        assert_eq!(urgency_score(3), 75.0);
        assert_eq!(urgency_score(4), 50.0);
        assert_eq!(urgency_score(7), 50.0);
        assert_eq!(urgency_score(8), 30.0);
        assert_eq!(urgency_score(14), 30.0);
        assert_eq!(urgency_score(15), 10.0);
        assert_eq!(urgency_score(365), 10.0);
    }

    #[test]
    fn test_urgency_overdue() {
        assert_eq!(urgency_score(-1), 105.0);
        assert_eq!(urgency_score(-2), 110.0);
        assert_eq!(urgency_score(-10), 150.0);
        assert_eq!(urgency_score(-30), 150.0);
    }

    #[test]
    fn test_importance_scale() {
        assert_eq!(importance_score(1), 10.0);
        assert_eq!(importance_score(5), 50.0);
        assert_eq!(importance_score(10), 100.0);
    }

    #[test]
    fn test_effort_decreasing() {
        let hours = [0.6, 1.0, 2.0, 5.0, 10.0, 40.0];
        for pair in hours.windows(2) {
            assert!(effort_score(pair[0]) > effort_score(pair[1]));
        }
    }

    #[test]
    fn test_effort_small_hours() {
        let score = effort_score(0.1);
        assert!(score > 0.0 && score <= 100.0);
        assert_eq!(effort_score(0.5), 100.0);
        assert_eq!(effort_score(1.5), 50.0);
    }

    #[test]
    fn test_dependency_boost_counts_linked_tasks() {
        let tasks = vec![
            TaskInput::new("a").with_id(1),
            TaskInput::new("b").with_id(2).with_dependencies([1]),
            TaskInput::new("c").with_id(3).with_dependencies([1, 99]),
            TaskInput::new("d").with_id(4).with_dependencies([99]),
        ];
        let context = DependencyContext::from_tasks(&tasks);

        assert_eq!(context.linked_tasks(), 2);
        assert_eq!(context.boost(), 30.0);
        assert_eq!(dependency_boost(&tasks), 30.0);
    }

    #[test]
    fn test_dependency_boost_capped() {
        let mut tasks = vec![TaskInput::new("root").with_id("root")];
        for i in 0..5 {
            tasks.push(TaskInput::new(format!("leaf {}", i)).with_dependencies(["root"]));
        }
        assert_eq!(dependency_boost(&tasks), 50.0);
    }

    #[test]
    fn test_dependency_boost_ignores_unknown_ids() {
        let tasks = vec![TaskInput::new("lonely").with_dependencies([7])];
        assert_eq!(dependency_boost(&tasks), 0.0);
        assert_eq!(dependency_boost(&[]), 0.0);
    }

    #[test]
    fn test_dependency_boost_ignores_blank_ids() {
        let tasks = vec![
            TaskInput::new("zero").with_id(0),
            TaskInput::new("a").with_id(1).with_dependencies([0]),
            TaskInput::new("empty").with_id(""),
            TaskInput::new("b").with_id(2).with_dependencies([""]),
        ];
        let context = DependencyContext::from_tasks(&tasks);

        assert_eq!(context.linked_tasks(), 0);
        assert_eq!(context.boost(), 0.0);
    }
}
