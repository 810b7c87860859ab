use crate::r#match::action::blueprint::{
    ATTACKING_FIELD_ROLES, ATTACKING_GOALKEEPER_ROLE, ActionBlueprint, ActionOutcome,
    DEFENDING_FIELD_ROLES, DEFENDING_GOALKEEPER_ROLE, normalize_role,
};
use crate::r#match::config::ConfigurationError;
use crate::r#match::error::MatchError;
use crate::r#match::penalty::Penalty;
use crate::r#match::time::MatchTime;
use crate::stadium::Stadium;
use crate::team::{MIN_ROSTER_SIZE, Team};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which of the two rosters is attacking in an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub fn index(&self) -> usize {
        match self {
            TeamSide::Home => 0,
            TeamSide::Away => 1,
        }
    }

    pub fn opponent(&self) -> TeamSide {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }
}

/// One simulated goal attempt, bound to concrete players.
///
/// The action inherits its narration and evaluations from a validated
/// blueprint; binding assigns a fresh random set of players from both
/// rosters to the role placeholders. A penalty action starts without its
/// `penalty` resolution and is completed exactly once via `kick_penalty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAction {
    pub attacking_side: TeamSide,
    pub time: MatchTime,
    pub outcome: ActionOutcome,
    pub use_var: bool,
    scorer: Option<String>,
    assist: Option<String>,
    pub player_evaluation: HashMap<String, i8>,
    pub phrases: Vec<String>,
    pub player_assignments: HashMap<String, String>,
    pub support_assignments: HashMap<String, String>,
    penalty: Option<Penalty>,
}

impl MatchAction {
    /// Materializes a blueprint at a clock tick: shuffles four field
    /// players per side into the numbered roles and pins the goalkeepers
    /// and support placeholders.
    pub fn bind_blueprint(
        blueprint: ActionBlueprint,
        time: MatchTime,
        attacking_side: TeamSide,
        teams: &(Team, Team),
        referee: &str,
        stadium: &Stadium,
        rng: &mut impl Rng,
    ) -> Result<MatchAction, ConfigurationError> {
        let attacking = team_on(teams, attacking_side);
        let defending = team_on(teams, attacking_side.opponent());

        let mut player_assignments = HashMap::new();
        assign_side(
            &mut player_assignments,
            attacking,
            &ATTACKING_FIELD_ROLES,
            ATTACKING_GOALKEEPER_ROLE,
            rng,
        )?;
        assign_side(
            &mut player_assignments,
            defending,
            &DEFENDING_FIELD_ROLES,
            DEFENDING_GOALKEEPER_ROLE,
            rng,
        )?;

        let support_assignments = HashMap::from([
            ("referee".to_string(), referee.to_string()),
            ("stadium".to_string(), stadium.name.clone()),
            ("atk_team_name".to_string(), attacking.familiar_name.clone()),
            ("def_team_name".to_string(), defending.familiar_name.clone()),
        ]);

        let (scorer, assist) = match blueprint.outcome {
            // A penalty has no scorer until it is kicked, and never an assist.
            ActionOutcome::Penalty => (None, None),
            ActionOutcome::OwnGoal => (blueprint.scorer, None),
            _ => (blueprint.scorer, blueprint.assist),
        };

        Ok(MatchAction {
            attacking_side,
            time,
            outcome: blueprint.outcome,
            use_var: blueprint.use_var,
            scorer,
            assist,
            player_evaluation: blueprint.player_evaluation,
            phrases: blueprint.phrases,
            player_assignments,
            support_assignments,
            penalty: None,
        })
    }

    pub fn scorer(&self) -> Option<&str> {
        self.scorer.as_deref()
    }

    pub fn assist(&self) -> Option<&str> {
        self.assist.as_deref()
    }

    pub fn penalty(&self) -> Option<&Penalty> {
        self.penalty.as_ref()
    }

    pub fn is_goal(&self) -> bool {
        self.scorer.is_some()
    }

    pub fn is_own_goal(&self) -> bool {
        self.scorer
            .as_deref()
            .is_some_and(|role| role.starts_with("def_"))
    }

    pub fn is_penalty_pending(&self) -> bool {
        self.outcome == ActionOutcome::Penalty && self.penalty.is_none()
    }

    /// Attaches the resolved kick to a pending penalty action. The scorer
    /// becomes the kicker only if the kick went in; penalties never carry
    /// an assist.
    pub fn kick_penalty(&mut self, penalty: Penalty) -> Result<(), MatchError> {
        if !self.is_penalty_pending() {
            return Err(MatchError::NoPendingPenalty);
        }

        self.assist = None;
        self.scorer = penalty.is_goal().then(|| penalty.kicker.clone());
        self.penalty = Some(penalty);
        Ok(())
    }

    /// Resolves a role placeholder (with or without braces) to the player
    /// or support value bound in this action.
    pub fn role_to_name(&self, role: &str) -> Option<&str> {
        let role = normalize_role(role);
        self.player_assignments
            .get(role)
            .or_else(|| self.support_assignments.get(role))
            .map(String::as_str)
    }

    /// Attacking player assignments only, keyed by role.
    pub fn attacking_assignments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.player_assignments
            .iter()
            .filter(|(role, _)| role.starts_with("atk_"))
            .map(|(role, name)| (role.as_str(), name.as_str()))
    }
}

fn team_on(teams: &(Team, Team), side: TeamSide) -> &Team {
    match side {
        TeamSide::Home => &teams.0,
        TeamSide::Away => &teams.1,
    }
}

fn assign_side(
    assignments: &mut HashMap<String, String>,
    team: &Team,
    field_roles: &[&str],
    goalkeeper_role: &str,
    rng: &mut impl Rng,
) -> Result<(), ConfigurationError> {
    let order = team.random_order(false, &[], rng);

    if order.len() < field_roles.len() || team.goalkeeper().is_none() {
        return Err(ConfigurationError::RosterTooSmall {
            team: team.full_name.clone(),
            required: MIN_ROSTER_SIZE,
            actual: team.players.len(),
        });
    }

    for (role, name) in field_roles.iter().zip(order) {
        assignments.insert(role.to_string(), name);
    }

    if let Some(goalkeeper) = team.goalkeeper() {
        assignments.insert(goalkeeper_role.to_string(), goalkeeper.to_string());
    }

    Ok(())
}
