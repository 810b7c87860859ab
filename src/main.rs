use game_core::{Match, MatchConfig, QueueActionProvider};
use database::{ConfigLoader, FlavorLoader, MatchArchive, TeamLoader};
use env_logger::Env;
use log::info;
use narrator::{AiGenerator, LocalGenerator};
use rand::seq::SliceRandom;
use std::env;
use ui::{CliController, ControllerConfig};

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install().unwrap();

    env_logger::Builder::from_env(Env::default()
        .default_filter_or("warn")
    ).init();

    let mut rng = rand::rng();

    let mut teams = TeamLoader::load();
    teams.shuffle(&mut rng);
    let mut picked = teams.into_iter();
    let home = picked.next().expect("teams.json holds at least two teams");
    let away = picked.next().expect("teams.json holds at least two teams");

    let flavors = FlavorLoader::load();
    let stadium = flavors.random_stadium(&mut rng);
    let referee = flavors.random_referee(&mut rng);

    let config = match env::var("MATCH_CONFIG") {
        Ok(path) => ConfigLoader::load(&path)?,
        Err(_) => MatchConfig::default(),
    };

    let game = Match::new(home, away, stadium, referee, config)?;
    info!("kickoff: {} vs {}", game.home_team().full_name, game.away_team().full_name);

    let provider = match AiGenerator::from_env() {
        Some(generator) => QueueActionProvider::start(generator),
        None => {
            info!("OPENAI_API_KEY not set, narrating from the local template bank");
            QueueActionProvider::start(LocalGenerator)
        }
    };

    let controller_config = ControllerConfig {
        auto_penalties: env::var("AUTO_PENALTIES").is_ok(),
        step_through: env::var("FREE_RUN").is_err(),
    };

    let mut controller = CliController::new(game, provider, controller_config);
    let outcome = controller.run().await;

    if let Ok(path) = env::var("SAVE_PATH") {
        MatchArchive::save(&path, controller.game())?;
    }

    outcome?;
    Ok(())
}
