use game_core::MatchConfig;
use log::info;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("cannot read config file: {0}")]
    Io(#[from] io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] game_core::ConfigurationError),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates a match configuration from a JSON file.
    /// Missing fields fall back to the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<MatchConfig, ConfigLoadError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let config: MatchConfig = serde_json::from_str(&raw)?;
        let config = config.validated()?;

        info!("match config loaded from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"tie_breaker": "allow_tie", "penalties_shoot_count": 3}}"#).unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.tie_breaker, game_core::TieBreaker::AllowTie);
        assert_eq!(config.penalties_shoot_count, 3);
        assert_eq!(config.goal_probability, MatchConfig::default().goal_probability);
    }

    #[test]
    fn test_invalid_probabilities_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"goal_probability": 0.9}}"#).unwrap();

        assert!(matches!(
            ConfigLoader::load(file.path()),
            Err(ConfigLoadError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        assert!(matches!(
            ConfigLoader::load("/definitely/not/here.json"),
            Err(ConfigLoadError::Io(_))
        ));
    }
}
