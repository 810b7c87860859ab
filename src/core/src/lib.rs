pub mod r#match;
pub mod stadium;
pub mod team;

pub use r#match::*;
pub use stadium::Stadium;
pub use team::{MIN_ROSTER_SIZE, Team};
