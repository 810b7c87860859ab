use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

/// How a goal attempt ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Goal,
    NoGoal,
    Penalty,
    OwnGoal,
}

impl ActionOutcome {
    pub const ALL: [ActionOutcome; 4] = [
        ActionOutcome::Goal,
        ActionOutcome::NoGoal,
        ActionOutcome::Penalty,
        ActionOutcome::OwnGoal,
    ];
}

/// What the simulation asks the content provider for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub outcome: ActionOutcome,
    pub use_var: bool,
}

pub const ATTACKING_FIELD_ROLES: [&str; 4] = ["atk_1", "atk_2", "atk_3", "atk_4"];
pub const DEFENDING_FIELD_ROLES: [&str; 4] = ["def_1", "def_2", "def_3", "def_4"];
pub const ATTACKING_GOALKEEPER_ROLE: &str = "atk_goalkeeper";
pub const DEFENDING_GOALKEEPER_ROLE: &str = "def_goalkeeper";
pub const SUPPORT_ROLES: [&str; 4] = ["referee", "stadium", "atk_team_name", "def_team_name"];

/// The ten player-role placeholders a blueprint may reference.
pub fn player_roles() -> impl Iterator<Item = &'static str> {
    ATTACKING_FIELD_ROLES
        .into_iter()
        .chain([ATTACKING_GOALKEEPER_ROLE])
        .chain(DEFENDING_FIELD_ROLES)
        .chain([DEFENDING_GOALKEEPER_ROLE])
}

pub fn is_player_role(role: &str) -> bool {
    player_roles().any(|known| known == role)
}

pub fn is_recognized_role(role: &str) -> bool {
    is_player_role(role) || SUPPORT_ROLES.contains(&role)
}

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]+)\}").unwrap());

/// Extracts every `{token}` from a phrase, braces stripped.
pub fn extract_placeholders(phrase: &str) -> Vec<&str> {
    PLACEHOLDER_RE
        .captures_iter(phrase)
        .filter_map(|captures| captures.get(1))
        .map(|token| token.as_str())
        .collect()
}

/// Accepts a role with or without braces and returns the bare name.
pub fn normalize_role(role: &str) -> &str {
    role.trim_start_matches('{').trim_end_matches('}')
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("phrase {phrase_index} contains unrecognized placeholders: {}", .placeholders.join(", "))]
    InvalidPlaceholder {
        phrase_index: usize,
        placeholders: Vec<String>,
    },
    #[error("outcome is a goal but no scorer is set")]
    MissingScorer,
    #[error("'{0}' is not a recognized player-role placeholder")]
    InvalidPlayerReference(String),
    #[error("evaluation for '{role}' is {value}, outside [-3, 3]")]
    EvaluationOutOfRange { role: String, value: i8 },
}

/// Unbound narration content for one action, exactly as returned by the
/// content provider. Roles are stored bare (`atk_1`), while phrases keep
/// their `{atk_1}` tokens for later formatting.
///
/// The provider is untrusted, so `validate` must pass before a blueprint
/// is bound to players.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionBlueprint {
    pub outcome: ActionOutcome,
    pub use_var: bool,
    pub phrases: Vec<String>,
    pub player_evaluation: HashMap<String, i8>,
    pub scorer: Option<String>,
    pub assist: Option<String>,
}

impl ActionBlueprint {
    /// The bare blueprint behind every shootout kick: no narration, no
    /// evaluations, outcome decided by the kick itself.
    pub fn shootout_kick() -> ActionBlueprint {
        ActionBlueprint {
            outcome: ActionOutcome::Penalty,
            use_var: false,
            phrases: Vec::new(),
            player_evaluation: HashMap::new(),
            scorer: None,
            assist: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.outcome == ActionOutcome::Goal && self.scorer.is_none() {
            return Err(ValidationError::MissingScorer);
        }

        for (phrase_index, phrase) in self.phrases.iter().enumerate() {
            let invalid: Vec<String> = extract_placeholders(phrase)
                .into_iter()
                .filter(|token| !is_recognized_role(token))
                .map(str::to_string)
                .collect();

            if !invalid.is_empty() {
                return Err(ValidationError::InvalidPlaceholder {
                    phrase_index,
                    placeholders: invalid,
                });
            }
        }

        for role in [&self.scorer, &self.assist].into_iter().flatten() {
            if !is_player_role(role) {
                return Err(ValidationError::InvalidPlayerReference(role.clone()));
            }
        }

        for (role, value) in &self.player_evaluation {
            if !is_player_role(role) {
                return Err(ValidationError::InvalidPlayerReference(role.clone()));
            }
            if !(-3..=3).contains(value) {
                return Err(ValidationError::EvaluationOutOfRange {
                    role: role.clone(),
                    value: *value,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goal_blueprint() -> ActionBlueprint {
        ActionBlueprint {
            outcome: ActionOutcome::Goal,
            use_var: false,
            phrases: vec![
                "{atk_1} slides the ball across to {atk_2}".to_string(),
                "{atk_2} beats {def_goalkeeper} at the near post!".to_string(),
                "The {referee} points to the centre circle at {stadium}".to_string(),
            ],
            player_evaluation: HashMap::from([
                ("atk_2".to_string(), 3),
                ("def_goalkeeper".to_string(), -1),
            ]),
            scorer: Some("atk_2".to_string()),
            assist: Some("atk_1".to_string()),
        }
    }

    #[test]
    fn test_well_formed_blueprint_passes() {
        assert!(goal_blueprint().validate().is_ok());
    }

    #[test]
    fn test_unrecognized_placeholder_is_named() {
        let mut blueprint = goal_blueprint();
        blueprint
            .phrases
            .push("{mascot} runs onto the pitch".to_string());

        match blueprint.validate() {
            Err(ValidationError::InvalidPlaceholder {
                phrase_index,
                placeholders,
            }) => {
                assert_eq!(phrase_index, 3);
                assert_eq!(placeholders, vec!["mascot".to_string()]);
            }
            other => panic!("expected InvalidPlaceholder, got {other:?}"),
        }
    }

    #[test]
    fn test_goal_without_scorer_is_rejected() {
        let mut blueprint = goal_blueprint();
        blueprint.scorer = None;
        assert_eq!(blueprint.validate(), Err(ValidationError::MissingScorer));
    }

    #[test]
    fn test_scorer_must_be_a_player_role() {
        let mut blueprint = goal_blueprint();
        blueprint.scorer = Some("referee".to_string());
        assert_eq!(
            blueprint.validate(),
            Err(ValidationError::InvalidPlayerReference("referee".to_string()))
        );
    }

    #[test]
    fn test_evaluation_range_is_enforced() {
        let mut blueprint = goal_blueprint();
        blueprint.player_evaluation.insert("atk_3".to_string(), 4);
        assert_eq!(
            blueprint.validate(),
            Err(ValidationError::EvaluationOutOfRange {
                role: "atk_3".to_string(),
                value: 4,
            })
        );
    }

    #[test]
    fn test_placeholder_extraction() {
        assert_eq!(
            extract_placeholders("{atk_1} feeds {atk_2} in front of {def_goalkeeper}"),
            vec!["atk_1", "atk_2", "def_goalkeeper"]
        );
        assert!(extract_placeholders("a quiet minute in midfield").is_empty());
    }

    #[test]
    fn test_normalize_role_strips_braces() {
        assert_eq!(normalize_role("{atk_1}"), "atk_1");
        assert_eq!(normalize_role("atk_1"), "atk_1");
    }
}
