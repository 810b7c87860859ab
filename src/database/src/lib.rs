pub mod loaders;
pub mod store;

pub use loaders::config::{ConfigLoadError, ConfigLoader};
pub use loaders::flavor::{FlavorLoader, StadiumEntity};
pub use loaders::team::{TeamEntity, TeamLoader};
pub use store::{ArchiveError, MatchArchive};
