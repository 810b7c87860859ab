use crate::r#match::action::action::{MatchAction, TeamSide};
use crate::r#match::action::blueprint::{ActionBlueprint, ActionOutcome, ActionRequest};
use crate::r#match::config::{MatchConfig, TieBreaker};
use crate::r#match::error::MatchError;
use crate::r#match::penalty::Penalty;
use crate::r#match::phase::MatchPhase;
use crate::r#match::provider::{ActionProvider, ProviderError};
use crate::r#match::time::MatchTime;
use crate::stadium::Stadium;
use crate::team::Team;
use log::{debug, info};
use rand::Rng;
use rand::RngExt;
use serde::{Deserialize, Serialize};

/// Stoppage time accrued per phase, in fractional minutes. Granted
/// minutes are the rounded value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddedTime {
    minutes: [f64; MatchPhase::ALL.len()],
}

impl AddedTime {
    pub fn of(&self, phase: MatchPhase) -> f64 {
        self.minutes[phase.index()]
    }

    pub fn minutes_of(&self, phase: MatchPhase) -> u32 {
        self.of(phase).round() as u32
    }

    fn accrue(&mut self, phase: MatchPhase, amount: f64) {
        self.minutes[phase.index()] += amount;
    }
}

/// The aggregate root of a simulation. One `advance` call moves the game
/// clock by a minute (or by one shootout kick) and is the only
/// transition; all mutation happens from the single driving task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    teams: (Team, Team),
    stadium: Stadium,
    referee: String,
    time: MatchTime,
    actions: Vec<MatchAction>,
    added_time: AddedTime,
    finished: bool,
    config: MatchConfig,
}

impl Match {
    pub fn new(
        home: Team,
        away: Team,
        stadium: Stadium,
        referee: impl Into<String>,
        config: MatchConfig,
    ) -> Result<Match, MatchError> {
        let config = config.validated()?;
        let time = MatchTime::new(config.start_from_phase, 1);

        Ok(Match {
            teams: (home, away),
            stadium,
            referee: referee.into(),
            time,
            actions: Vec::new(),
            added_time: AddedTime::default(),
            finished: false,
            config,
        })
    }

    pub fn team(&self, side: TeamSide) -> &Team {
        match side {
            TeamSide::Home => &self.teams.0,
            TeamSide::Away => &self.teams.1,
        }
    }

    pub fn home_team(&self) -> &Team {
        &self.teams.0
    }

    pub fn away_team(&self) -> &Team {
        &self.teams.1
    }

    pub fn stadium(&self) -> &Stadium {
        &self.stadium
    }

    pub fn referee(&self) -> &str {
        &self.referee
    }

    pub fn time(&self) -> MatchTime {
        self.time
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn actions(&self) -> &[MatchAction] {
        &self.actions
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Granted stoppage minutes for the current phase.
    pub fn added_time_minutes(&self) -> u32 {
        self.added_time.minutes_of(self.time.phase)
    }

    pub fn added_time_minutes_for(&self, phase: MatchPhase) -> u32 {
        self.added_time.minutes_of(phase)
    }

    /// Score over the whole action history, shootout kicks included.
    /// During an action this spoils its ending; prefer
    /// `no_spoiler_score` while narrating.
    pub fn score(&self) -> (u32, u32) {
        self.score_excluding(None)
    }

    /// Score with the action at the current tick left out.
    pub fn no_spoiler_score(&self) -> (u32, u32) {
        self.score_excluding(Some(self.time))
    }

    fn score_excluding(&self, excluded_time: Option<MatchTime>) -> (u32, u32) {
        let mut score = (0, 0);

        for action in &self.actions {
            if !action.is_goal() || excluded_time == Some(action.time) {
                continue;
            }
            match action.attacking_side {
                TeamSide::Home => score.0 += 1,
                TeamSide::Away => score.1 += 1,
            }
        }

        score
    }

    /// The action happening at the current tick, if any.
    pub fn current_action(&self) -> Option<&MatchAction> {
        self.actions.iter().find(|action| action.time == self.time)
    }

    /// History up to and including the current tick, in play order.
    pub fn actions_up_to_now(&self) -> impl Iterator<Item = &MatchAction> {
        let now = self.time;
        self.actions.iter().filter(move |action| action.time <= now)
    }

    pub fn is_penalty_pending(&self) -> bool {
        self.current_action()
            .is_some_and(MatchAction::is_penalty_pending)
    }

    /// Queues `count` content requests, drawing the desired outcome and
    /// the review flag from the configured distributions. Called ahead of
    /// time so narration generation overlaps the advancing clock.
    pub fn prefetch<P: ActionProvider>(
        &self,
        count: usize,
        provider: &mut P,
        rng: &mut impl Rng,
    ) -> Result<(), ProviderError> {
        for _ in 0..count {
            let request = ActionRequest {
                outcome: self.draw_outcome(rng),
                use_var: rng.random::<f64>() < self.config.var_probability,
            };
            provider.request(request)?;
        }

        Ok(())
    }

    /// Advances the clock by one minute. Depending on where the clock
    /// lands this either plays a shootout kick, rolls the phase over, or
    /// plays a standard minute that may produce an action.
    pub async fn advance<P: ActionProvider>(
        &mut self,
        provider: &mut P,
        rng: &mut impl Rng,
    ) -> Result<(), MatchError> {
        if self.is_penalty_pending() {
            return Err(MatchError::PenaltyPending);
        }

        self.time = self.time.add_minutes(1);

        let (score_home, score_away) = self.score();
        let is_tie = score_home == score_away;

        if self.time.phase == MatchPhase::Penalties {
            self.advance_shootout(score_home, score_away, rng)?;
        } else if self.time.is_phase_expired(self.added_time_minutes()) {
            self.finish_phase(is_tie);
        } else {
            self.play_standard_minute(provider, rng, score_home, score_away)
                .await?;
        }

        Ok(())
    }

    /// One shootout kick per clock tick: sides alternate by minute
    /// parity, and the match ends as soon as the side about to kick can
    /// no longer catch up even by converting every remaining kick.
    ///
    /// Beyond the configured kick count the remaining-kick estimate is
    /// floored at one, so a sudden-death tie keeps alternating kicks
    /// until the margin reaches two. Proper sudden-death rules are a
    /// known gap.
    fn advance_shootout(
        &mut self,
        score_home: u32,
        score_away: u32,
        rng: &mut impl Rng,
    ) -> Result<(), MatchError> {
        let kicks_taken = (self.time.minute - 1) / 2;
        let kicks_remaining = self.config.penalties_shoot_count.saturating_sub(kicks_taken).max(1);

        let kicking_side = if self.time.minute % 2 == 0 {
            TeamSide::Away
        } else {
            TeamSide::Home
        };

        let (score_kicking, score_other) = match kicking_side {
            TeamSide::Home => (score_home, score_away),
            TeamSide::Away => (score_away, score_home),
        };

        if score_kicking + kicks_remaining < score_other {
            info!(
                "shootout decided, {} cannot catch up ({score_home}-{score_away})",
                self.team(kicking_side).familiar_name
            );
            self.finished = true;
            return Ok(());
        }

        let action = MatchAction::bind_blueprint(
            ActionBlueprint::shootout_kick(),
            self.time,
            kicking_side,
            &self.teams,
            &self.referee,
            &self.stadium,
            rng,
        )?;
        self.actions.push(action);

        Ok(())
    }

    fn finish_phase(&mut self, is_tie: bool) {
        match self.time.phase {
            MatchPhase::FirstHalf => {
                self.time = MatchTime::new(MatchPhase::SecondHalf, 1);
            }
            MatchPhase::SecondHalf => match self.config.tie_breaker {
                TieBreaker::AllowTie => self.finished = true,
                TieBreaker::ExtraTimeThenPenalties if is_tie => {
                    self.time = MatchTime::new(MatchPhase::FirstExtraTime, 1);
                }
                TieBreaker::PenaltiesOnly if is_tie => {
                    self.time = MatchTime::new(MatchPhase::Penalties, 1);
                }
                _ => self.finished = true,
            },
            MatchPhase::FirstExtraTime => {
                self.time = MatchTime::new(MatchPhase::SecondExtraTime, 1);
            }
            MatchPhase::SecondExtraTime => {
                if is_tie {
                    self.time = MatchTime::new(MatchPhase::Penalties, 1);
                } else {
                    self.finished = true;
                }
            }
            MatchPhase::Penalties => self.finished = true,
        }

        if self.finished {
            info!("full time, {:?} is over", self.time.phase);
        } else {
            debug!("moving on to {:?}", self.time.phase);
        }
    }

    async fn play_standard_minute<P: ActionProvider>(
        &mut self,
        provider: &mut P,
        rng: &mut impl Rng,
        score_home: u32,
        score_away: u32,
    ) -> Result<(), MatchError> {
        let phase = self.time.phase;
        let duration = phase.duration_minutes();
        let stoppage = self.added_time_minutes();

        let action_probability = if self.time.minute >= duration {
            self.config.added_time_action_probability
        } else if phase.is_extra_time() {
            self.config.extra_time_action_probability
        } else {
            self.config.standard_action_probability
        };

        let do_action = rng.random::<f64>() < action_probability;
        // The final possible minute of a phase always gets an action.
        let is_last_minute = self.time.minute == duration + stoppage;

        if !do_action && !is_last_minute {
            return Ok(());
        }

        self.prefetch(1, provider, rng)?;
        let blueprint = provider.get().await?;

        let is_tie = score_home == score_away;
        let attacking_side = if is_last_minute && !is_tie {
            // The forced late action goes to the trailing side.
            if score_home <= score_away {
                TeamSide::Home
            } else {
                TeamSide::Away
            }
        } else if rng.random::<f64>() <= 0.5 {
            TeamSide::Away
        } else {
            TeamSide::Home
        };

        // Only actions inside nominal time extend the phase.
        if self.time.minute <= duration {
            match blueprint.outcome {
                ActionOutcome::Goal => self.added_time.accrue(
                    phase,
                    uniform(
                        rng,
                        self.config.goal_added_time_min,
                        self.config.goal_added_time_max,
                    ),
                ),
                ActionOutcome::Penalty => self.added_time.accrue(
                    phase,
                    uniform(
                        rng,
                        self.config.penalty_added_time_min,
                        self.config.penalty_added_time_max,
                    ),
                ),
                _ => {}
            }

            if blueprint.use_var {
                self.added_time.accrue(
                    phase,
                    uniform(
                        rng,
                        self.config.var_added_time_min,
                        self.config.var_added_time_max,
                    ),
                );
            }
        }

        debug!(
            "minute {} of {:?}: {:?} action for {:?}",
            self.time.minute, phase, blueprint.outcome, attacking_side
        );

        let action = MatchAction::bind_blueprint(
            blueprint,
            self.time,
            attacking_side,
            &self.teams,
            &self.referee,
            &self.stadium,
            rng,
        )?;
        self.actions.push(action);

        Ok(())
    }

    /// Resolves the pending penalty at the current tick.
    pub fn kick_penalty(&mut self, penalty: Penalty) -> Result<(), MatchError> {
        let time = self.time;
        let Some(action) = self.actions.iter_mut().find(|action| action.time == time) else {
            return Err(MatchError::NoPendingPenalty);
        };

        action.kick_penalty(penalty)
    }

    fn draw_outcome(&self, rng: &mut impl Rng) -> ActionOutcome {
        let weights = [
            (ActionOutcome::Goal, self.config.goal_probability),
            (ActionOutcome::NoGoal, self.config.no_goal_probability),
            (ActionOutcome::Penalty, self.config.penalty_probability),
            (ActionOutcome::OwnGoal, self.config.own_goal_probability),
        ];

        let mut roll = rng.random::<f64>();
        for (outcome, weight) in weights {
            if roll < weight {
                return outcome;
            }
            roll -= weight;
        }

        // Numerical slack at the top of the range.
        ActionOutcome::NoGoal
    }
}

fn uniform(rng: &mut impl Rng, min: f64, max: f64) -> f64 {
    if max > min { rng.random_range(min..max) } else { min }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::r#match::penalty::PenaltyDirection;
    use crate::r#match::provider::ScriptedProvider;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn teams() -> (Team, Team) {
        (
            Team::new(
                "Harbour Rovers",
                "Rovers",
                "HRV",
                "blue",
                ["Gatti", "Bruno", "Calleri", "Donati", "Esposito"],
            ),
            Team::new(
                "Valle United",
                "Valle",
                "VAL",
                "red",
                ["Marino", "Pavan", "Riva", "Sala", "Tosi"],
            ),
        )
    }

    fn quiet_config() -> MatchConfig {
        // No random actions, no stoppage time: only the forced
        // final-minute action of each phase fires.
        MatchConfig {
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

    fn new_match(config: MatchConfig) -> Match {
        let (home, away) = teams();
        let stadium = Stadium::new("Stadio", "Delle Rose", 41000);
        Match::new(home, away, stadium, "Moretti", config).unwrap()
    }

    fn no_goal_blueprint() -> ActionBlueprint {
        ActionBlueprint {
            outcome: ActionOutcome::NoGoal,
            use_var: false,
            phrases: vec!["{atk_1} shoots wide".to_string()],
            player_evaluation: HashMap::new(),
            scorer: None,
            assist: None,
        }
    }

    fn goal_blueprint() -> ActionBlueprint {
        ActionBlueprint {
            outcome: ActionOutcome::Goal,
            use_var: false,
            phrases: vec!["{atk_1} scores!".to_string()],
            player_evaluation: HashMap::new(),
            scorer: Some("atk_1".to_string()),
            assist: None,
        }
    }

    fn goal_penalty(side_role: &str) -> Penalty {
        Penalty::resolved(
            side_role,
            "def_goalkeeper",
            PenaltyDirection::LeftTop,
            PenaltyDirection::RightLow,
            true,
            false,
        )
    }

    fn missed_penalty(side_role: &str) -> Penalty {
        Penalty::resolved(
            side_role,
            "def_goalkeeper",
            PenaltyDirection::LeftTop,
            PenaltyDirection::LeftTop,
            false,
            false,
        )
    }

    async fn run_to_finish(game: &mut Match, provider: &mut ScriptedProvider, rng: &mut StdRng) {
        let mut guard = 0;
        while !game.finished() {
            game.advance(provider, rng).await.unwrap();
            guard += 1;
            assert!(guard < 400, "match did not finish");
        }
    }

    #[tokio::test]
    async fn test_allow_tie_finishes_at_full_time() {
        let config = MatchConfig {
            tie_breaker: TieBreaker::AllowTie,
            ..quiet_config()
        };
        let mut game = new_match(config);
        let mut provider =
            ScriptedProvider::with_blueprints(vec![no_goal_blueprint(); 4]);
        let mut rng = StdRng::seed_from_u64(1);

        run_to_finish(&mut game, &mut provider, &mut rng).await;

        assert_eq!(game.score(), (0, 0));
        assert_eq!(game.time().phase, MatchPhase::SecondHalf);
        assert!(
            game.actions()
                .iter()
                .all(|action| action.time.phase <= MatchPhase::SecondHalf)
        );
    }

    #[tokio::test]
    async fn test_tie_with_penalties_only_skips_extra_time() {
        let config = MatchConfig {
            tie_breaker: TieBreaker::PenaltiesOnly,
            ..quiet_config()
        };
        let mut game = new_match(config);
        let mut provider =
            ScriptedProvider::with_blueprints(vec![no_goal_blueprint(); 4]);
        let mut rng = StdRng::seed_from_u64(2);

        let mut guard = 0;
        while game.time().phase != MatchPhase::Penalties {
            game.advance(&mut provider, &mut rng).await.unwrap();
            guard += 1;
            assert!(guard < 200, "shootout never reached");
            assert!(!game.finished());
        }

        assert_eq!(game.time(), MatchTime::new(MatchPhase::Penalties, 1));

        // The next tick is the first kick, by the away side.
        game.advance(&mut provider, &mut rng).await.unwrap();
        assert!(game.is_penalty_pending());
        assert_eq!(
            game.current_action().unwrap().attacking_side,
            TeamSide::Away
        );
    }

    #[tokio::test]
    async fn test_advance_with_pending_penalty_is_rejected() {
        let config = MatchConfig {
            start_from_phase: MatchPhase::Penalties,
            ..quiet_config()
        };
        let mut game = new_match(config);
        let mut provider = ScriptedProvider::new();
        let mut rng = StdRng::seed_from_u64(3);

        game.advance(&mut provider, &mut rng).await.unwrap();
        assert!(game.is_penalty_pending());

        let time_before = game.time();
        let actions_before = game.actions().len();

        let result = game.advance(&mut provider, &mut rng).await;
        assert!(matches!(result, Err(MatchError::PenaltyPending)));
        assert_eq!(game.time(), time_before);
        assert_eq!(game.actions().len(), actions_before);
    }

    #[tokio::test]
    async fn test_shootout_ends_when_catching_up_is_impossible() {
        let config = MatchConfig {
            start_from_phase: MatchPhase::Penalties,
            ..quiet_config()
        };
        let mut game = new_match(config);
        let mut provider = ScriptedProvider::new();
        let mut rng = StdRng::seed_from_u64(4);

        // Away converts three kicks, home misses twice. At the sixth
        // tick home is down 0-3 with two estimated kicks left and the
        // shootout ends without a new pending action.
        let script = [
            goal_penalty("atk_1"),
            missed_penalty("atk_1"),
            goal_penalty("atk_2"),
            missed_penalty("atk_2"),
            goal_penalty("atk_3"),
        ];

        for penalty in script {
            game.advance(&mut provider, &mut rng).await.unwrap();
            assert!(game.is_penalty_pending());
            game.kick_penalty(penalty).unwrap();
        }

        assert_eq!(game.score(), (0, 3));
        assert!(!game.finished());

        game.advance(&mut provider, &mut rng).await.unwrap();
        assert!(game.finished());
        assert!(!game.is_penalty_pending());
        assert_eq!(game.actions().len(), 5);
    }

    #[tokio::test]
    async fn test_forced_last_minute_action_goes_to_trailing_side() {
        let mut game = new_match(quiet_config());
        // First forced action (minute 45, first half) is a goal; second
        // forced action (minute 45, second half) must then attack with
        // the side that trails.
        let mut provider = ScriptedProvider::with_blueprints([
            goal_blueprint(),
            no_goal_blueprint(),
        ]);
        let mut rng = StdRng::seed_from_u64(5);

        run_to_finish(&mut game, &mut provider, &mut rng).await;

        let actions: Vec<_> = game.actions().iter().collect();
        assert_eq!(actions.len(), 2);

        let leading_side = actions[0].attacking_side;
        assert_eq!(actions[1].attacking_side, leading_side.opponent());
    }

    #[tokio::test]
    async fn test_goal_accrues_stoppage_only_inside_nominal_time() {
        let config = MatchConfig {
            tie_breaker: TieBreaker::AllowTie,
            goal_added_time_min: 1.0,
            goal_added_time_max: 1.0,
            ..quiet_config()
        };
        let mut game = new_match(config);
        // Minute 45 forced goal adds exactly one minute; the forced
        // action at 46 is already in stoppage time and must not extend
        // the half again.
        let mut provider = ScriptedProvider::with_blueprints([
            goal_blueprint(),
            goal_blueprint(),
            no_goal_blueprint(),
            no_goal_blueprint(),
        ]);
        let mut rng = StdRng::seed_from_u64(6);

        let mut previous_added = 0;
        let mut guard = 0;
        while game.time().phase == MatchPhase::FirstHalf && !game.finished() {
            game.advance(&mut provider, &mut rng).await.unwrap();
            let added = game.added_time_minutes_for(MatchPhase::FirstHalf);
            assert!(added >= previous_added, "stoppage time regressed");
            previous_added = added;
            guard += 1;
            assert!(guard < 100);
        }

        assert_eq!(game.added_time_minutes_for(MatchPhase::FirstHalf), 1);
        let first_half_actions: Vec<_> = game
            .actions()
            .iter()
            .filter(|action| action.time.phase == MatchPhase::FirstHalf)
            .collect();
        assert_eq!(first_half_actions.len(), 2);
        assert_eq!(first_half_actions[0].time.minute, 45);
        assert_eq!(first_half_actions[1].time.minute, 46);
    }

    #[tokio::test]
    async fn test_prefetch_records_requests_in_order() {
        let config = MatchConfig {
            no_goal_probability: 1.0,
            goal_probability: 0.0,
            own_goal_probability: 0.0,
            penalty_probability: 0.0,
            ..quiet_config()
        };
        let game = new_match(config);
        let mut provider = ScriptedProvider::new();
        let mut rng = StdRng::seed_from_u64(7);

        game.prefetch(3, &mut provider, &mut rng).unwrap();

        assert_eq!(provider.requests().len(), 3);
        for request in provider.requests() {
            assert_eq!(request.outcome, ActionOutcome::NoGoal);
            assert!(!request.use_var);
        }
    }

    #[tokio::test]
    async fn test_no_spoiler_score_hides_current_action() {
        let mut game = new_match(quiet_config());
        let mut provider = ScriptedProvider::with_blueprints([goal_blueprint()]);
        let mut rng = StdRng::seed_from_u64(8);

        // Run up to the forced minute-45 goal.
        let mut guard = 0;
        while game.actions().is_empty() {
            game.advance(&mut provider, &mut rng).await.unwrap();
            guard += 1;
            assert!(guard < 100);
        }

        assert_eq!(game.no_spoiler_score(), (0, 0));
        assert_ne!(game.score(), (0, 0));
    }

    #[test]
    fn test_invalid_config_is_rejected_at_kickoff() {
        let (home, away) = teams();
        let config = MatchConfig {
            goal_probability: 0.5,
            ..MatchConfig::default()
        };

        let result = Match::new(
            home,
            away,
            Stadium::new("Stadio", "Delle Rose", 41000),
            "Moretti",
            config,
        );
        assert!(matches!(result, Err(MatchError::Configuration(_))));
    }
}
