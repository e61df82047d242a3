//! Weighting strategies.

use serde::{Deserialize, Serialize};

const STRATEGY_NAMES: &str = "smart_balance, fastest_wins, high_impact, deadline_driven";

/// Errors raised while configuring a scorer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    /// Strategy name not in the catalog
    #[error("Invalid strategy. Choose from: [{}]", STRATEGY_NAMES)]
    InvalidStrategy {
        /// The rejected name
        name: String,
    },
}

/// Coefficients applied to the component scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    /// Weight of the urgency score
    pub urgency: f64,
    /// Weight of the importance score
    pub importance: f64,
    /// Weight of the effort score
    pub effort: f64,
    /// Multiplier applied to the dependency boost
    pub dependency_multiplier: f64,
}

/// Named weighting profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Balanced weighting of all factors
    #[default]
    SmartBalance,
    /// Favors low-effort tasks
    FastestWins,
    /// Favors importance
    HighImpact,
    /// Favors due dates
    DeadlineDriven,
}

impl Strategy {
    /// Every strategy in the catalog.
    pub const ALL: [Strategy; 4] = [
        Strategy::SmartBalance,
        Strategy::FastestWins,
        Strategy::HighImpact,
        Strategy::DeadlineDriven,
    ];

    /// Weights for this strategy.
    pub fn weights(self) -> Weights {
        let (urgency, importance, effort, dependency_multiplier) = match self {
            Strategy::SmartBalance => (0.40, 0.35, 0.20, 1.0),
            Strategy::FastestWins => (0.20, 0.10, 0.60, 0.5),
            Strategy::HighImpact => (0.20, 0.60, 0.10, 0.5),
            Strategy::DeadlineDriven => (0.60, 0.25, 0.10, 0.3),
        };
        Weights { urgency, importance, effort, dependency_multiplier }
    }

    /// Catalog name.
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::SmartBalance => "smart_balance",
            Strategy::FastestWins => "fastest_wins",
            Strategy::HighImpact => "high_impact",
            Strategy::DeadlineDriven => "deadline_driven",
        }
    }

    /// One-line summary for listings.
    pub fn description(self) -> &'static str {
        match self {
            Strategy::SmartBalance => "Balanced weighting of all factors",
            Strategy::FastestWins => "Prioritizes low-effort tasks",
            Strategy::HighImpact => "Prioritizes importance",
            Strategy::DeadlineDriven => "Prioritizes due dates",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Strategy {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == s)
            .ok_or_else(|| ScoringError::InvalidStrategy { name: s.to_string() })
    }
}
