//! Priority scoring for to-do items.
//!
//! A [`Scorer`] combines four sub-scores (urgency, importance, effort and a
//! batch-wide dependency boost) under a weighting [`Strategy`], then derives a
//! [`PriorityLevel`] and a short explanation.

#![warn(missing_docs)]

pub mod strategy;
pub mod components;
pub mod explanation;
pub mod result;
pub mod scorer;

pub use strategy::{Strategy, Weights, ScoringError};
pub use components::{
    days_until, urgency_score, importance_score, effort_score, dependency_boost, DependencyContext,
};
pub use explanation::explain;
pub use result::{ScoreResult, ScoreBreakdown, PriorityLevel, AnalyzedTask};
pub use scorer::{Scorer, DEFAULT_SUGGESTIONS};
