use crate::r#match::action::action::{MatchAction, TeamSide};
use crate::r#match::action::blueprint::ActionOutcome;
use crate::r#match::engine::Match;
use crate::r#match::phase::MatchPhase;
use crate::r#match::time::MatchTime;
use crate::team::Team;
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashMap;

/// Read-only aggregation over the action history: a pure projection,
/// recomputed on demand.
#[derive(Debug, Clone, Serialize)]
pub struct MatchStats {
    pub home: TeamStats,
    pub away: TeamStats,
}

impl MatchStats {
    pub fn from_match(game: &Match) -> MatchStats {
        MatchStats {
            home: TeamStats::from_match(game, TeamSide::Home),
            away: TeamStats::from_match(game, TeamSide::Away),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamStats {
    pub captured_at: MatchTime,
    pub team: Team,
    pub score: u32,
    pub attempts: u32,
    pub goals: Vec<GoalStats>,
    pub possession_pct: f64,
    pub player_evaluation: HashMap<String, i32>,
}

impl TeamStats {
    pub fn from_match(game: &Match, side: TeamSide) -> TeamStats {
        let actions: Vec<&MatchAction> = game.actions_up_to_now().collect();
        let team = game.team(side).clone();

        let attempts = actions
            .iter()
            .filter(|action| {
                action.attacking_side == side && action.time.phase != MatchPhase::Penalties
            })
            .count() as u32;

        let (score_home, score_away) = game.score();
        let score = match side {
            TeamSide::Home => score_home,
            TeamSide::Away => score_away,
        };

        let goals = actions
            .iter()
            .filter(|action| action.attacking_side == side)
            .filter_map(|action| GoalStats::from_action(action))
            .collect_vec();

        let possession_pct = if actions.is_empty() {
            0.0
        } else {
            f64::from(attempts) / actions.len() as f64 * 100.0
        };

        let mut player_evaluation: HashMap<String, i32> = team
            .players
            .iter()
            .map(|player| (player.clone(), 0))
            .collect();

        for action in &actions {
            let own_prefix = if action.attacking_side == side {
                "atk"
            } else {
                "def"
            };

            for (role, delta) in &action.player_evaluation {
                if !role.starts_with(own_prefix) {
                    continue;
                }
                if let Some(name) = action.player_assignments.get(role) {
                    *player_evaluation.entry(name.clone()).or_insert(0) += i32::from(*delta);
                }
            }
        }

        TeamStats {
            captured_at: game.time(),
            team,
            score,
            attempts,
            goals,
            possession_pct,
            player_evaluation,
        }
    }
}

/// One scored goal, with placeholders already resolved to player names.
/// Own goals are listed under the team they were awarded to, naming the
/// defender who turned the ball in.
#[derive(Debug, Clone, Serialize)]
pub struct GoalStats {
    pub scorer: String,
    pub time: MatchTime,
    pub assist: Option<String>,
    pub outcome: ActionOutcome,
}

impl GoalStats {
    pub fn from_action(action: &MatchAction) -> Option<GoalStats> {
        let scorer_role = action.scorer()?;
        let scorer = action
            .role_to_name(scorer_role)
            .unwrap_or(scorer_role)
            .to_string();
        let assist = action
            .assist()
            .map(|role| action.role_to_name(role).unwrap_or(role).to_string());

        Some(GoalStats {
            scorer,
            time: action.time,
            assist,
            outcome: action.outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#match::action::blueprint::ActionBlueprint;
    use crate::r#match::config::{MatchConfig, TieBreaker};
    use crate::r#match::provider::ScriptedProvider;
    use crate::stadium::Stadium;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn quiet_config() -> MatchConfig {
        MatchConfig {
            tie_breaker: TieBreaker::AllowTie,
            standard_action_probability: 0.0,
            extra_time_action_probability: 0.0,
            added_time_action_probability: 0.0,
            goal_added_time_min: 0.0,
            goal_added_time_max: 0.0,
            penalty_added_time_min: 0.0,
            penalty_added_time_max: 0.0,
            var_added_time_min: 0.0,
            var_added_time_max: 0.0,
            var_probability: 0.0,
            ..MatchConfig::default()
        }
    }

    fn evaluated_goal_blueprint() -> ActionBlueprint {
        ActionBlueprint {
            outcome: ActionOutcome::Goal,
            use_var: false,
            phrases: vec!["{atk_1} finishes low past {def_goalkeeper}".to_string()],
            player_evaluation: HashMap::from([
                ("atk_1".to_string(), 3),
                ("def_goalkeeper".to_string(), -2),
            ]),
            scorer: Some("atk_1".to_string()),
            assist: Some("atk_2".to_string()),
        }
    }

    fn no_goal_blueprint() -> ActionBlueprint {
        ActionBlueprint {
            outcome: ActionOutcome::NoGoal,
            use_var: false,
            phrases: vec!["{atk_3} drags it wide".to_string()],
            player_evaluation: HashMap::new(),
            scorer: None,
            assist: None,
        }
    }

    #[tokio::test]
    async fn test_stats_fold_scores_possession_and_evaluations() {
        let home = Team::new(
            "Harbour Rovers",
            "Rovers",
            "HRV",
            "blue",
            ["Gatti", "Bruno", "Calleri", "Donati", "Esposito"],
        );
        let away = Team::new(
            "Valle United",
            "Valle",
            "VAL",
            "red",
            ["Marino", "Pavan", "Riva", "Sala", "Tosi"],
        );
        let mut game = Match::new(
            home,
            away,
            Stadium::new("Stadio", "Delle Rose", 41000),
            "Moretti",
            quiet_config(),
        )
        .unwrap();

        let mut provider = ScriptedProvider::with_blueprints([
            evaluated_goal_blueprint(),
            no_goal_blueprint(),
        ]);
        let mut rng = StdRng::seed_from_u64(21);

        let mut guard = 0;
        while !game.finished() {
            game.advance(&mut provider, &mut rng).await.unwrap();
            guard += 1;
            assert!(guard < 200);
        }

        let stats = MatchStats::from_match(&game);
        let goal_action = &game.actions()[0];
        let (scoring, conceding) = match goal_action.attacking_side {
            TeamSide::Home => (&stats.home, &stats.away),
            TeamSide::Away => (&stats.away, &stats.home),
        };

        assert_eq!(scoring.score, 1);
        assert_eq!(conceding.score, 0);
        assert_eq!(scoring.attempts, 1);
        assert_eq!(conceding.attempts, 1);
        assert_eq!(scoring.possession_pct, 50.0);
        assert_eq!(conceding.possession_pct, 50.0);

        assert_eq!(scoring.goals.len(), 1);
        let goal = &scoring.goals[0];
        let scorer_name = &goal_action.player_assignments["atk_1"];
        assert_eq!(&goal.scorer, scorer_name);
        assert_eq!(goal.outcome, ActionOutcome::Goal);
        assert_eq!(
            goal.assist.as_ref(),
            Some(&goal_action.player_assignments["atk_2"])
        );

        assert_eq!(scoring.player_evaluation[scorer_name], 3);
        let conceding_goalkeeper = conceding.team.players[0].clone();
        assert_eq!(conceding.player_evaluation[&conceding_goalkeeper], -2);

        // Players untouched by any action stay at zero.
        let quiet_player = scoring
            .team
            .players
            .iter()
            .find(|player| *player != scorer_name && stats_zero(scoring, player.as_str()));
        assert!(quiet_player.is_some());
    }

    fn stats_zero(stats: &TeamStats, player: &str) -> bool {
        stats.player_evaluation.get(player) == Some(&0)
    }
}
