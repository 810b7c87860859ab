use serde::{Deserialize, Serialize};

/// Flavor data about where the match is played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stadium {
    pub prefix: String,
    pub name: String,
    pub capacity: u32,
}

impl Stadium {
    pub fn new(prefix: impl Into<String>, name: impl Into<String>, capacity: u32) -> Stadium {
        Stadium {
            prefix: prefix.into(),
            name: name.into(),
            capacity,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.prefix, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_joins_prefix_and_name() {
        let stadium = Stadium::new("Stadio", "Delle Rose", 41000);
        assert_eq!(stadium.full_name(), "Stadio Delle Rose");
    }
}
