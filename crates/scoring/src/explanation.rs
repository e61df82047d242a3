//! Human-readable score explanations.

use taskrank_core::NormalizedTask;

const SEPARATOR: &str = " • ";
const FALLBACK: &str = "Standard priority task";

/// Explain why a task ranks where it does.
///
/// Fragments are checked independently, in a fixed order: due date, high
/// importance, low effort, then the task's own dependency count. The last one
/// reports the length of the task's dependency list, which is not the quantity
/// the dependency boost is computed from.
pub fn explain(task: &NormalizedTask, days_until: i64) -> String {
    let mut reasons = Vec::new();

    match days_until {
        d if d < 0 => reasons.push(format!("Overdue by {} day(s)", d.unsigned_abs())),
        0 => reasons.push("Due today".to_string()),
        1 => reasons.push("Due tomorrow".to_string()),
        2..=3 => reasons.push("Due very soon".to_string()),
        _ => {}
    }

    if task.importance >= 8 {
        reasons.push("High importance rating".to_string());
    }

    if task.estimated_hours <= 2.0 {
        reasons.push("Quick win (low effort)".to_string());
    }

    if !task.dependencies.is_empty() {
        reasons.push(format!("Blocks {} other task(s)", task.dependencies.len()));
    }

    if reasons.is_empty() {
        return FALLBACK.to_string();
    }
    reasons.join(SEPARATOR)
}
