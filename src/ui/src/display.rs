use core::{
    ActionOutcome, Match, MatchAction, MatchPhase, MatchStats, Penalty, PenaltyDirection,
    TeamStats, extract_placeholders,
};
use itertools::Itertools;
use stanza::renderer::Renderer;
use stanza::renderer::console::Console;
use stanza::style::{HAlign, Header, MinWidth, Styles};
use stanza::table::{Col, Row, Table};

/// Human-readable names for the six goal zones, in the same order as
/// `PenaltyDirection::ALL`.
pub const DIRECTION_NAMES: [&str; 6] = [
    "high to the left",
    "low to the left",
    "high in the centre",
    "low in the centre",
    "high to the right",
    "low to the right",
];

pub fn direction_name(direction: PenaltyDirection) -> &'static str {
    let index = PenaltyDirection::ALL
        .iter()
        .position(|candidate| *candidate == direction)
        .unwrap_or(0);
    DIRECTION_NAMES[index]
}

pub fn phase_name(phase: MatchPhase) -> &'static str {
    match phase {
        MatchPhase::FirstHalf => "first half",
        MatchPhase::SecondHalf => "second half",
        MatchPhase::FirstExtraTime => "first half of extra time",
        MatchPhase::SecondExtraTime => "second half of extra time",
        MatchPhase::Penalties => "penalty shootout",
    }
}

/// Substitutes every bound placeholder of an action into a phrase.
/// Unknown tokens are left untouched rather than guessed at.
pub fn fill_placeholders(phrase: &str, action: &MatchAction) -> String {
    let mut filled = phrase.to_string();

    for token in extract_placeholders(phrase).into_iter().unique() {
        if let Some(name) = action.role_to_name(token) {
            filled = filled.replace(&format!("{{{token}}}"), name);
        }
    }

    filled
}

/// The running scoreline header, without spoiling the current action.
pub fn minute_header(game: &Match) -> String {
    let (home, away) = game.no_spoiler_score();
    let time = game.time();

    format!(
        "{}' ({}) | {} {home} - {away} {}",
        time.minute,
        phase_name(time.phase),
        game.home_team().abbreviation,
        game.away_team().abbreviation,
    )
}

pub fn kickoff_banner(game: &Match) -> String {
    format!(
        "{} vs {} | {} | referee: {}",
        game.home_team().full_name,
        game.away_team().full_name,
        game.stadium().full_name(),
        game.referee(),
    )
}

/// One line that settles the action after its narration has run.
pub fn action_verdict(action: &MatchAction) -> Option<String> {
    match action.outcome {
        ActionOutcome::Goal => {
            let scorer = action.scorer()?;
            let name = action.role_to_name(scorer).unwrap_or(scorer);
            Some(format!("GOAL! {name} scores!"))
        }
        ActionOutcome::OwnGoal => {
            let scorer = action.scorer()?;
            let name = action.role_to_name(scorer).unwrap_or(scorer);
            Some(format!("OWN GOAL! A nightmare moment for {name}!"))
        }
        ActionOutcome::NoGoal => None,
        ActionOutcome::Penalty => None,
    }
}

/// Narrates a resolved penalty kick.
pub fn penalty_verdict(action: &MatchAction, penalty: &Penalty) -> String {
    let kicker = action
        .role_to_name(&penalty.kicker)
        .unwrap_or(&penalty.kicker);
    let goalkeeper = action
        .role_to_name(&penalty.goalkeeper)
        .unwrap_or(&penalty.goalkeeper);
    let kick = direction_name(penalty.kick_direction);
    let dive = direction_name(penalty.dive_direction);

    if penalty.is_out() {
        format!("{kicker} sends it {kick}... and drags it wide! No goal!")
    } else if penalty.is_goal() {
        format!("{kicker} sends it {kick}, {goalkeeper} dives {dive}... GOAL!")
    } else {
        format!("{kicker} sends it {kick}, {goalkeeper} dives {dive}... SAVED!")
    }
}

pub fn final_result(game: &Match) -> String {
    let (home, away) = game.score();
    let headline = if home == away {
        "It ends level.".to_string()
    } else {
        let winner = if home > away {
            game.home_team()
        } else {
            game.away_team()
        };
        format!("{} take it!", winner.familiar_name)
    };

    format!(
        "FULL TIME: {} {home} - {away} {}. {headline}",
        game.home_team().familiar_name,
        game.away_team().familiar_name,
    )
}

/// Renders the end-of-match statistics for both teams.
pub fn stats_table(stats: &MatchStats) -> String {
    let table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(18))),
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)),
            vec![
                "".into(),
                stats.home.team.abbreviation.clone().into(),
                stats.away.team.abbreviation.clone().into(),
            ],
        ))
        .with_row(Row::new(
            Styles::default(),
            vec![
                "Goals".into(),
                stats.home.score.to_string().into(),
                stats.away.score.to_string().into(),
            ],
        ))
        .with_row(Row::new(
            Styles::default(),
            vec![
                "Attempts".into(),
                stats.home.attempts.to_string().into(),
                stats.away.attempts.to_string().into(),
            ],
        ))
        .with_row(Row::new(
            Styles::default(),
            vec![
                "Possession %".into(),
                format!("{:.0}", stats.home.possession_pct).into(),
                format!("{:.0}", stats.away.possession_pct).into(),
            ],
        ))
        .with_row(Row::new(
            Styles::default(),
            vec![
                "Best player".into(),
                best_player(&stats.home).into(),
                best_player(&stats.away).into(),
            ],
        ));

    Console::default().render(&table).to_string()
}

pub fn goal_list(stats: &TeamStats) -> Vec<String> {
    stats
        .goals
        .iter()
        .map(|goal| {
            let minute = format!("{}' ({})", goal.time.minute, phase_name(goal.time.phase));
            match (&goal.assist, goal.outcome) {
                (_, ActionOutcome::OwnGoal) => format!("{minute} {} (og)", goal.scorer),
                (_, ActionOutcome::Penalty) => format!("{minute} {} (pen)", goal.scorer),
                (Some(assist), _) => format!("{minute} {} (assist {assist})", goal.scorer),
                (None, _) => format!("{minute} {}", goal.scorer),
            }
        })
        .collect()
}

fn best_player(stats: &TeamStats) -> String {
    stats
        .player_evaluation
        .iter()
        .sorted_by_key(|(name, _)| name.clone())
        .max_by_key(|(_, total)| **total)
        .map(|(name, total)| format!("{name} ({total:+})"))
        .unwrap_or_else(|| "-".to_string())
}
