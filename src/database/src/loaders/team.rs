use game_core::{MIN_ROSTER_SIZE, Team};
use log::debug;
use serde::Deserialize;

const STATIC_TEAMS_JSON: &str = include_str!("../data/teams.json");

#[derive(Deserialize)]
pub struct TeamEntity {
    pub full_name: String,
    pub familiar_name: String,
    pub abbreviation: String,
    pub color: String,
    pub players: Vec<String>,
}

impl TeamEntity {
    pub fn into_team(self) -> Team {
        Team {
            full_name: self.full_name,
            familiar_name: self.familiar_name,
            abbreviation: self.abbreviation,
            color: self.color,
            players: self.players,
        }
    }
}

pub struct TeamLoader;

impl TeamLoader {
    pub fn load() -> Vec<Team> {
        let entities: Vec<TeamEntity> =
            serde_json::from_str(STATIC_TEAMS_JSON).expect("embedded teams.json is well-formed");

        let teams: Vec<Team> = entities.into_iter().map(TeamEntity::into_team).collect();
        debug!("loaded {} teams", teams.len());
        teams
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_teams_parse() {
        let teams = TeamLoader::load();
        assert!(teams.len() >= 2, "need at least two teams for a match");
    }

    #[test]
    fn test_every_team_can_field_a_match() {
        for team in TeamLoader::load() {
            assert!(
                team.players.len() >= MIN_ROSTER_SIZE,
                "{} has only {} players",
                team.full_name,
                team.players.len()
            );
            assert!(team.goalkeeper().is_some());
        }
    }
}
