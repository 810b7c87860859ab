use crate::r#match::phase::MatchPhase;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

/// What happens when the score is level at the end of the second half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieBreaker {
    AllowTie,
    #[default]
    ExtraTimeThenPenalties,
    PenaltiesOnly,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("outcome probabilities must sum to 1.0, but they sum to {actual}")]
    OutcomeProbabilitiesSum { actual: f64 },
    #[error("'{name}' must lie within [0.0, 1.0], but it is {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    #[error("team '{team}' needs at least {required} players, it has {actual}")]
    RosterTooSmall {
        team: String,
        required: usize,
        actual: usize,
    },
}

/// Tunable parameters of the simulation. All probabilities are per-minute
/// or per-action Bernoulli weights; the four outcome weights must sum to
/// one. Stoppage-time ranges are expressed in (fractional) minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub tie_breaker: TieBreaker,
    pub start_from_phase: MatchPhase,
    pub goal_added_time_min: f64,
    pub goal_added_time_max: f64,
    pub penalty_added_time_min: f64,
    pub penalty_added_time_max: f64,
    pub var_added_time_min: f64,
    pub var_added_time_max: f64,
    pub standard_action_probability: f64,
    pub extra_time_action_probability: f64,
    pub added_time_action_probability: f64,
    pub no_goal_probability: f64,
    pub goal_probability: f64,
    pub own_goal_probability: f64,
    pub penalty_probability: f64,
    pub var_probability: f64,
    pub penalties_shoot_count: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            tie_breaker: TieBreaker::ExtraTimeThenPenalties,
            start_from_phase: MatchPhase::FirstHalf,
            goal_added_time_min: 0.5,
            goal_added_time_max: 1.5,
            penalty_added_time_min: 0.75,
            penalty_added_time_max: 1.75,
            var_added_time_min: 1.0,
            var_added_time_max: 2.0,
            standard_action_probability: 0.15,
            extra_time_action_probability: 0.30,
            added_time_action_probability: 0.45,
            no_goal_probability: 0.72,
            goal_probability: 0.18,
            own_goal_probability: 0.02,
            penalty_probability: 0.08,
            var_probability: 0.1,
            penalties_shoot_count: 5,
        }
    }
}

impl MatchConfig {
    /// Checks the invariants that must hold before a simulation starts.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let outcome_sum = self.no_goal_probability
            + self.goal_probability
            + self.own_goal_probability
            + self.penalty_probability;

        if (outcome_sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(ConfigurationError::OutcomeProbabilitiesSum {
                actual: outcome_sum,
            });
        }

        for (name, value) in self.probabilities() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigurationError::ProbabilityOutOfRange { name, value });
            }
        }

        Ok(())
    }

    pub fn validated(self) -> Result<Self, ConfigurationError> {
        self.validate()?;
        Ok(self)
    }

    fn probabilities(&self) -> [(&'static str, f64); 8] {
        [
            (
                "standard_action_probability",
                self.standard_action_probability,
            ),
            (
                "extra_time_action_probability",
                self.extra_time_action_probability,
            ),
            (
                "added_time_action_probability",
                self.added_time_action_probability,
            ),
            ("no_goal_probability", self.no_goal_probability),
            ("goal_probability", self.goal_probability),
            ("own_goal_probability", self.own_goal_probability),
            ("penalty_probability", self.penalty_probability),
            ("var_probability", self.var_probability),
        ]
    }
}
