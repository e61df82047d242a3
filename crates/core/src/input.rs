//! Loosely typed task input and its coercion into a typed record.
//!
//! Callers hand over tasks as JSON-ish records where the due date is a string
//! and numbers may arrive as strings. [`TaskInput::normalize`] performs every
//! conversion in one place so the scoring formulas only see typed values.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::TaskKey;
use crate::Date;

/// Format accepted for due dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Effort assumed when a task carries no estimate.
const DEFAULT_HOURS: f64 = 1.0;

/// Importance assumed when a task carries no rating.
const DEFAULT_IMPORTANCE: i64 = 5;

/// A task as received from a caller, before any coercion.
///
/// Deserialization never fails on an object: fields with the wrong shape are
/// recorded and reported by [`TaskInput::normalize`], so one malformed record
/// cannot take down the batch it arrived in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTaskInput")]
pub struct TaskInput {
    /// Optional caller-supplied identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<TaskKey>,

    /// Title (not used for scoring)
    pub title: String,

    /// Due date, expected as a `YYYY-MM-DD` string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Value>,

    /// Effort in hours, number or numeric string. `Some(Value::Null)` is an
    /// explicit null and does not coerce.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<Value>,

    /// Importance, integer or integer string. `Some(Value::Null)` is an
    /// explicit null and does not coerce.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub importance: Option<Value>,

    /// Identifiers this task references
    pub dependencies: Vec<TaskKey>,

    /// Any other fields, echoed back untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// First shape problem found while reading the record
    #[serde(skip)]
    pub(crate) shape_error: Option<InvalidTaskData>,
}

/// Wire form of [`TaskInput`]: every field kept as raw JSON.
#[derive(Deserialize)]
struct RawTaskInput {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    title: Value,
    #[serde(default, deserialize_with = "present")]
    due_date: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    estimated_hours: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    importance: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    dependencies: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Keeps an explicit `null` as `Some(Value::Null)`; absent fields fall back
/// to `None` through `#[serde(default)]`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl From<RawTaskInput> for TaskInput {
    fn from(raw: RawTaskInput) -> Self {
        let mut shape_error = None;

        let id = match raw.id {
            Value::Null => None,
            other => match key_from_value(&other) {
                Some(key) => Some(key),
                None => {
                    shape_error = Some(InvalidTaskData::Id(other.to_string()));
                    None
                }
            },
        };

        let title = match raw.title {
            Value::Null => String::new(),
            Value::String(s) => s,
            other => other.to_string(),
        };

        let dependencies = match raw.dependencies {
            None => Vec::new(),
            Some(Value::Array(items)) if items.iter().all(|v| key_from_value(v).is_some()) => {
                items.iter().filter_map(key_from_value).collect()
            }
            Some(other) => {
                if shape_error.is_none() {
                    shape_error = Some(InvalidTaskData::Dependencies(other.to_string()));
                }
                Vec::new()
            }
        };

        Self {
            id,
            title,
            due_date: raw.due_date,
            estimated_hours: raw.estimated_hours,
            importance: raw.importance,
            dependencies,
            extra: raw.extra,
            shape_error,
        }
    }
}

fn key_from_value(value: &Value) -> Option<TaskKey> {
    match value {
        Value::Number(n) => n.as_i64().map(TaskKey::Int),
        Value::String(s) => Some(TaskKey::Text(s.clone())),
        _ => None,
    }
}

impl TaskInput {
    /// Read one record out of a batch. A value that is not an object still
    /// yields a task, one that fails [`TaskInput::normalize`].
    pub fn from_value(value: Value) -> Self {
        match serde_json::from_value(value.clone()) {
            Ok(task) => task,
            Err(_) => Self {
                shape_error: Some(InvalidTaskData::Record(value.to_string())),
                ..Default::default()
            },
        }
    }

    /// Start a task with only a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<TaskKey>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set a typed due date.
    pub fn with_due_date(mut self, due_date: Date) -> Self {
        self.due_date = Some(Value::String(due_date.format(DATE_FORMAT).to_string()));
        self
    }

    /// Set the effort estimate.
    pub fn with_hours(mut self, hours: f64) -> Self {
        self.estimated_hours = Some(hours.into());
        self
    }

    /// Set the importance rating.
    pub fn with_importance(mut self, importance: i64) -> Self {
        self.importance = Some(importance.into());
        self
    }

    /// Set the dependency list.
    pub fn with_dependencies<K: Into<TaskKey>>(mut self, deps: impl IntoIterator<Item = K>) -> Self {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    /// Coerce every loosely typed field.
    ///
    /// Missing effort and importance fall back to 1 hour and 5. A missing or
    /// malformed due date, an explicit null, a badly shaped id or dependency
    /// list, or any value that does not coerce, is an error.
    pub fn normalize(&self) -> Result<NormalizedTask, InvalidTaskData> {
        if let Some(e) = &self.shape_error {
            return Err(e.clone());
        }
        let due_date = coerce_date(self.due_date.as_ref())?;
        let estimated_hours = match &self.estimated_hours {
            Some(v) => coerce_hours(v)?,
            None => DEFAULT_HOURS,
        };
        let importance = match &self.importance {
            Some(v) => coerce_importance(v)?,
            None => DEFAULT_IMPORTANCE,
        };

        Ok(NormalizedTask {
            id: self.id.clone(),
            title: self.title.clone(),
            due_date,
            estimated_hours,
            importance,
            dependencies: self.dependencies.clone(),
        })
    }
}

/// Typed view of a [`TaskInput`] after coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTask {
    /// Optional identifier
    pub id: Option<TaskKey>,
    /// Title
    pub title: String,
    /// Due date
    pub due_date: Date,
    /// Effort in hours
    pub estimated_hours: f64,
    /// Importance rating, not clamped
    pub importance: i64,
    /// Referenced identifiers
    pub dependencies: Vec<TaskKey>,
}

/// Reason a task could not be coerced.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidTaskData {
    /// No due date supplied
    #[error("missing due date")]
    MissingDueDate,

    /// Due date present but not `YYYY-MM-DD`
    #[error("due date {0} does not match format YYYY-MM-DD")]
    DueDate(String),

    /// Effort is not a finite number
    #[error("estimated hours {0} is not a number")]
    EstimatedHours(String),

    /// Importance is not an integer
    #[error("importance {0} is not an integer")]
    Importance(String),

    /// Identifier is neither an integer nor a string
    #[error("id {0} is not an integer or string")]
    Id(String),

    /// Dependencies are not a list of integers and strings
    #[error("dependencies {0} is not a list of ids")]
    Dependencies(String),

    /// Record is not a JSON object
    #[error("task {0} is not an object")]
    Record(String),
}

fn coerce_date(value: Option<&Value>) -> Result<Date, InvalidTaskData> {
    match value {
        None | Some(Value::Null) => Err(InvalidTaskData::MissingDueDate),
        Some(Value::String(s)) => Date::parse_from_str(s, DATE_FORMAT)
            .map_err(|_| InvalidTaskData::DueDate(format!("'{}'", s))),
        Some(other) => Err(InvalidTaskData::DueDate(other.to_string())),
    }
}

fn coerce_hours(value: &Value) -> Result<f64, InvalidTaskData> {
    let hours = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match hours {
        Some(h) if h.is_finite() => Ok(h),
        _ => Err(InvalidTaskData::EstimatedHours(value.to_string())),
    }
}

fn coerce_importance(value: &Value) -> Result<i64, InvalidTaskData> {
    let importance = match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    importance.ok_or_else(|| InvalidTaskData::Importance(value.to_string()))
}
