use chrono::{DateTime, Utc};
use game_core::Match;
use log::info;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("cannot access archive file: {0}")]
    Io(#[from] io::Error),
    #[error("archive is not a valid match file: {0}")]
    Format(#[from] serde_json::Error),
}

/// On-disk envelope around a match snapshot.
#[derive(Serialize, Deserialize)]
struct ArchiveEnvelope {
    saved_at: DateTime<Utc>,
    game: Match,
}

/// Lossless save/load of the full match state: teams, clock, flavor
/// data, action history, stoppage time, finish flag and config. A loaded
/// match resumes exactly where the saved one stopped.
pub struct MatchArchive;

impl MatchArchive {
    pub fn save(path: impl AsRef<Path>, game: &Match) -> Result<(), ArchiveError> {
        let path = path.as_ref();
        let envelope = ArchiveEnvelope {
            saved_at: Utc::now(),
            game: game.clone(),
        };

        let raw = serde_json::to_string_pretty(&envelope)?;
        std::fs::write(path, raw)?;

        info!("match archived to {}", path.display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Match, ArchiveError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let envelope: ArchiveEnvelope = serde_json::from_str(&raw)?;
        Ok(envelope.game)
    }
}
