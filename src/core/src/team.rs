use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Four field players plus the goalkeeper.
pub const MIN_ROSTER_SIZE: usize = 5;

/// Static team data. The roster is ordered and the first entry is the
/// goalkeeper by convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub full_name: String,
    pub familiar_name: String,
    pub abbreviation: String,
    pub color: String,
    pub players: Vec<String>,
}

impl Team {
    pub fn new(
        full_name: impl Into<String>,
        familiar_name: impl Into<String>,
        abbreviation: impl Into<String>,
        color: impl Into<String>,
        players: impl IntoIterator<Item = impl Into<String>>,
    ) -> Team {
        Team {
            full_name: full_name.into(),
            familiar_name: familiar_name.into(),
            abbreviation: abbreviation.into(),
            color: color.into(),
            players: players.into_iter().map(Into::into).collect(),
        }
    }

    pub fn goalkeeper(&self) -> Option<&str> {
        self.players.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// A fresh uniform permutation of the eligible players. Every action
    /// binding shuffles again, so role-to-player assignments never stick
    /// between actions.
    pub fn random_order(
        &self,
        include_goalkeeper: bool,
        exclude: &[String],
        rng: &mut impl Rng,
    ) -> Vec<String> {
        let pool = if include_goalkeeper {
            &self.players[..]
        } else {
            self.players.get(1..).unwrap_or(&[])
        };

        let mut order: Vec<String> = pool
            .iter()
            .filter(|player| !exclude.contains(player))
            .cloned()
            .collect();
        order.shuffle(rng);
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn team() -> Team {
        Team::new(
            "Harbour Rovers",
            "Rovers",
            "HRV",
            "blue",
            ["Gatti", "Bruno", "Calleri", "Donati", "Esposito", "Ferri"],
        )
    }

    #[test]
    fn test_goalkeeper_is_first_roster_entry() {
        assert_eq!(team().goalkeeper(), Some("Gatti"));
        let empty = Team::new("None FC", "None", "NON", "grey", Vec::<String>::new());
        assert_eq!(empty.goalkeeper(), None);
    }

    #[test]
    fn test_random_order_without_goalkeeper() {
        let mut rng = StdRng::seed_from_u64(9);
        let order = team().random_order(false, &[], &mut rng);

        assert_eq!(order.len(), 5);
        assert!(!order.contains(&"Gatti".to_string()));

        let unique: HashSet<_> = order.iter().collect();
        assert_eq!(unique.len(), order.len());
    }

    #[test]
    fn test_random_order_respects_exclusions() {
        let mut rng = StdRng::seed_from_u64(10);
        let excluded = ["Bruno".to_string(), "Ferri".to_string()];
        let order = team().random_order(true, &excluded, &mut rng);

        assert_eq!(order.len(), 4);
        assert!(!order.contains(&"Bruno".to_string()));
        assert!(!order.contains(&"Ferri".to_string()));
    }

    #[test]
    fn test_random_order_eventually_varies() {
        let mut rng = StdRng::seed_from_u64(11);
        let team = team();
        let first = team.random_order(false, &[], &mut rng);

        let varied = (0..20)
            .map(|_| team.random_order(false, &[], &mut rng))
            .any(|order| order != first);
        assert!(varied, "20 shuffles never changed the order");
    }
}
