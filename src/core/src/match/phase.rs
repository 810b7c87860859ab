use crate::r#match::error::InvalidPhaseTransitionError;
use serde::{Deserialize, Serialize};

/// The ordered phases a match can move through. Phases only advance
/// forward; the shootout is terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum MatchPhase {
    #[default]
    FirstHalf,
    SecondHalf,
    FirstExtraTime,
    SecondExtraTime,
    Penalties,
}

impl MatchPhase {
    pub const ALL: [MatchPhase; 5] = [
        MatchPhase::FirstHalf,
        MatchPhase::SecondHalf,
        MatchPhase::FirstExtraTime,
        MatchPhase::SecondExtraTime,
        MatchPhase::Penalties,
    ];

    /// Nominal duration, before any stoppage time is added.
    pub fn duration_minutes(&self) -> u32 {
        match self {
            MatchPhase::FirstHalf | MatchPhase::SecondHalf => 45,
            MatchPhase::FirstExtraTime | MatchPhase::SecondExtraTime => 15,
            MatchPhase::Penalties => 0,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<MatchPhase> {
        MatchPhase::ALL.get(index).copied()
    }

    pub fn next_phase(&self) -> Result<MatchPhase, InvalidPhaseTransitionError> {
        MatchPhase::from_index(self.index() + 1).ok_or(InvalidPhaseTransitionError)
    }

    pub fn is_extra_time(&self) -> bool {
        matches!(
            self,
            MatchPhase::FirstExtraTime | MatchPhase::SecondExtraTime
        )
    }
}
