use crate::r#match::error::InvalidPhaseTransitionError;
use crate::r#match::phase::MatchPhase;
use serde::{Deserialize, Serialize};

/// A point on the game clock: phase plus minute within the phase.
/// Ordering is phase-major. Minutes start at 1; rolling into the next
/// phase is an explicit transition, never an arithmetic side effect.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MatchTime {
    pub phase: MatchPhase,
    pub minute: u32,
}

impl Default for MatchTime {
    fn default() -> Self {
        MatchTime::kickoff()
    }
}

impl MatchTime {
    pub fn new(phase: MatchPhase, minute: u32) -> Self {
        MatchTime { phase, minute }
    }

    pub fn kickoff() -> Self {
        MatchTime::new(MatchPhase::FirstHalf, 1)
    }

    pub fn add_minutes(&self, minutes: u32) -> MatchTime {
        MatchTime::new(self.phase, self.minute + minutes)
    }

    pub fn next_phase(&self) -> Result<MatchTime, InvalidPhaseTransitionError> {
        Ok(MatchTime::new(self.phase.next_phase()?, 1))
    }

    /// True once the minute has moved past the phase's nominal duration
    /// plus the granted stoppage minutes.
    pub fn is_phase_expired(&self, stoppage_minutes: u32) -> bool {
        self.minute > self.phase.duration_minutes() + stoppage_minutes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_ordering_is_phase_major() {
        let late_first = MatchTime::new(MatchPhase::FirstHalf, 90);
        let early_second = MatchTime::new(MatchPhase::SecondHalf, 1);
        assert!(late_first < early_second);
        assert!(
            MatchTime::new(MatchPhase::SecondHalf, 3) < MatchTime::new(MatchPhase::SecondHalf, 4)
        );
    }

    #[test]
    fn test_add_minutes_keeps_phase() {
        let time = MatchTime::kickoff().add_minutes(44);
        assert_eq!(time.phase, MatchPhase::FirstHalf);
        assert_eq!(time.minute, 45);
    }

    #[test]
    fn test_next_phase_resets_minute() {
        let time = MatchTime::new(MatchPhase::FirstHalf, 47).next_phase().unwrap();
        assert_eq!(time, MatchTime::new(MatchPhase::SecondHalf, 1));
    }

    #[test]
    fn test_phase_expiry_honours_stoppage() {
        let time = MatchTime::new(MatchPhase::FirstHalf, 46);
        assert!(time.is_phase_expired(0));
        assert!(!time.is_phase_expired(1));
        assert!(time.add_minutes(1).is_phase_expired(1));
    }
}
