use crate::r#match::config::ConfigurationError;
use crate::r#match::provider::ProviderError;
use thiserror::Error;

/// The generic next-phase lookup has no successor for the shootout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no phase follows the penalty shootout")]
pub struct InvalidPhaseTransitionError;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("a penalty is pending, it must be kicked before advancing")]
    PenaltyPending,
    #[error("there is no pending penalty to kick")]
    NoPendingPenalty,
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error(transparent)]
    PhaseTransition(#[from] InvalidPhaseTransitionError),
}
