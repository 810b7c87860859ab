use game_core::Stadium;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Deserialize;

const STATIC_FLAVORS_JSON: &str = include_str!("../data/flavors.json");

#[derive(Deserialize)]
pub struct StadiumEntity {
    pub prefix: String,
    pub name: String,
    pub capacity: u32,
}

impl StadiumEntity {
    pub fn into_stadium(self) -> Stadium {
        Stadium {
            prefix: self.prefix,
            name: self.name,
            capacity: self.capacity,
        }
    }
}

#[derive(Deserialize)]
struct FlavorEntity {
    stadiums: Vec<StadiumEntity>,
    referees: Vec<String>,
}

/// Stadium and referee flavor data; one of each is drawn per match.
pub struct FlavorLoader {
    stadiums: Vec<Stadium>,
    referees: Vec<String>,
}

impl FlavorLoader {
    pub fn load() -> FlavorLoader {
        let entity: FlavorEntity =
            serde_json::from_str(STATIC_FLAVORS_JSON).expect("embedded flavors.json is well-formed");

        FlavorLoader {
            stadiums: entity
                .stadiums
                .into_iter()
                .map(StadiumEntity::into_stadium)
                .collect(),
            referees: entity.referees,
        }
    }

    pub fn stadiums(&self) -> &[Stadium] {
        &self.stadiums
    }

    pub fn referees(&self) -> &[String] {
        &self.referees
    }

    pub fn random_stadium(&self, rng: &mut impl Rng) -> Stadium {
        self.stadiums
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| Stadium::new("Stadio", "Comunale", 15000))
    }

    pub fn random_referee(&self, rng: &mut impl Rng) -> String {
        self.referees
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| "Bianchi".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_embedded_flavors_parse() {
        let flavors = FlavorLoader::load();
        assert!(!flavors.stadiums().is_empty());
        assert!(!flavors.referees().is_empty());
    }

    #[test]
    fn test_random_picks_come_from_the_lists() {
        let flavors = FlavorLoader::load();
        let mut rng = StdRng::seed_from_u64(13);

        let stadium = flavors.random_stadium(&mut rng);
        assert!(flavors.stadiums().contains(&stadium));

        let referee = flavors.random_referee(&mut rng);
        assert!(flavors.referees().contains(&referee));
    }
}
