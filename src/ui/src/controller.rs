use crate::display;
use core::{
    ActionProvider, DEFENDING_GOALKEEPER_ROLE, Match, MatchError, MatchStats, Penalty,
    PenaltyDirection,
};
use itertools::Itertools;
use log::{info, warn};
use rand::Rng;
use rand::RngExt;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const PREFETCH_DEPTH: usize = 3;

type StdinLines = Lines<BufReader<Stdin>>;

#[derive(Debug, Clone, Copy)]
pub struct ControllerConfig {
    /// Resolve penalties with random picks instead of asking.
    pub auto_penalties: bool,
    /// Wait for Enter between narration phrases.
    pub step_through: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            auto_penalties: false,
            step_through: true,
        }
    }
}

/// The interactive driver: narrates each minute, collects penalty
/// choices, and advances the match until full time.
pub struct CliController<P: ActionProvider> {
    game: Match,
    provider: P,
    config: ControllerConfig,
}

impl<P: ActionProvider> CliController<P> {
    pub fn new(game: Match, provider: P, config: ControllerConfig) -> CliController<P> {
        CliController {
            game,
            provider,
            config,
        }
    }

    pub fn game(&self) -> &Match {
        &self.game
    }

    pub async fn run(&mut self) -> Result<(), MatchError> {
        let mut rng = rand::rng();
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        println!("{}", display::kickoff_banner(&self.game));
        println!();

        self.game
            .prefetch(PREFETCH_DEPTH, &mut self.provider, &mut rng)?;

        while !self.game.finished() {
            self.narrate_current_tick(&mut lines).await;

            if self.game.is_penalty_pending() {
                let penalty = self.resolve_penalty(&mut lines, &mut rng).await;
                self.game.kick_penalty(penalty)?;
                self.narrate_penalty_outcome();
            }

            if let Err(err) = self.game.advance(&mut self.provider, &mut rng).await {
                if let MatchError::Provider(provider_err) = &err {
                    warn!("narration pipeline failed: {provider_err}");
                    println!();
                    println!(
                        "Simulation halted: no narration content could be obtained ({provider_err})."
                    );
                }
                return Err(err);
            }
        }

        self.print_full_time_report();
        Ok(())
    }

    async fn narrate_current_tick(&self, lines: &mut StdinLines) {
        let Some(action) = self.game.current_action() else {
            return;
        };

        println!();
        println!("{}", display::minute_header(&self.game));

        for phrase in &action.phrases {
            println!("  {}", display::fill_placeholders(phrase, action));
            if self.config.step_through {
                wait_enter(lines).await;
            }
        }

        if let Some(verdict) = display::action_verdict(action) {
            println!("  {verdict}");
        }
    }

    fn narrate_penalty_outcome(&self) {
        if let Some(action) = self.game.current_action()
            && let Some(penalty) = action.penalty()
        {
            println!("  {}", display::penalty_verdict(action, penalty));
        }
    }

    async fn resolve_penalty(&self, lines: &mut StdinLines, rng: &mut impl Rng) -> Penalty {
        let Some(action) = self.game.current_action() else {
            // Unreachable while a penalty is pending; resolve blind.
            return Penalty::auto("atk_1", DEFENDING_GOALKEEPER_ROLE, rng);
        };

        let attackers: Vec<(String, String)> = action
            .attacking_assignments()
            .map(|(role, name)| (role.to_string(), name.to_string()))
            .sorted()
            .collect();

        if self.config.auto_penalties {
            let (role, name) = &attackers[rng.random_range(0..attackers.len())];
            info!("auto penalty: {name} steps up");
            return Penalty::auto(role.clone(), DEFENDING_GOALKEEPER_ROLE, rng);
        }

        let attacking_team = action.role_to_name("atk_team_name").unwrap_or("the attackers");
        println!();
        println!("  Penalty for {attacking_team}!");

        for (index, (_, name)) in attackers.iter().enumerate() {
            println!("  {} - {name}", index + 1);
        }
        println!("  0 - random");

        let choice = read_choice(lines, "Who takes it?", attackers.len()).await;
        let kicker_index = if choice == 0 {
            rng.random_range(0..attackers.len())
        } else {
            choice - 1
        };
        let (kicker_role, kicker_name) = attackers[kicker_index].clone();
        println!("  {kicker_name} steps up to the spot.");

        let defending_team = action.role_to_name("def_team_name").unwrap_or("the defenders");
        println!("  Everyone on the {defending_team} side, look away now!");
        let kick_direction = choose_direction(lines, "Where is the kick going?", rng).await;

        let goalkeeper_name = action
            .role_to_name(DEFENDING_GOALKEEPER_ROLE)
            .unwrap_or("the goalkeeper");
        println!("  Eyes back on the screen. {goalkeeper_name}, your turn: look away, attackers!");
        let dive_direction = choose_direction(lines, "Where does the goalkeeper dive?", rng).await;

        Penalty::kicked(
            kicker_role,
            DEFENDING_GOALKEEPER_ROLE,
            kick_direction,
            dive_direction,
            rng,
        )
    }

    fn print_full_time_report(&self) {
        let stats = MatchStats::from_match(&self.game);

        println!();
        println!("{}", display::final_result(&self.game));

        for team_stats in [&stats.home, &stats.away] {
            let goals = display::goal_list(team_stats);
            if !goals.is_empty() {
                println!("{}:", team_stats.team.familiar_name);
                for line in goals {
                    println!("  {line}");
                }
            }
        }

        println!();
        println!("{}", display::stats_table(&stats));
    }
}

async fn choose_direction(
    lines: &mut StdinLines,
    prompt: &str,
    rng: &mut impl Rng,
) -> PenaltyDirection {
    for (index, name) in display::DIRECTION_NAMES.iter().enumerate() {
        println!("  {} - {name}", index + 1);
    }
    println!("  0 - random");

    let choice = read_choice(lines, prompt, PenaltyDirection::ALL.len()).await;
    if choice == 0 {
        PenaltyDirection::random(rng)
    } else {
        PenaltyDirection::ALL[choice - 1]
    }
}

/// Reads a number in `0..=max`, re-prompting on invalid input. End of
/// input (a piped stdin running dry) falls back to 0, the random
/// option, so an unattended run still finishes.
async fn read_choice(lines: &mut StdinLines, prompt: &str, max: usize) -> usize {
    loop {
        println!("  {prompt} [0-{max}]");

        match lines.next_line().await {
            Ok(Some(line)) => match line.trim().parse::<usize>() {
                Ok(choice) if choice <= max => return choice,
                _ => println!("  Invalid choice."),
            },
            Ok(None) | Err(_) => return 0,
        }
    }
}

async fn wait_enter(lines: &mut StdinLines) {
    let _ = lines.next_line().await;
}
