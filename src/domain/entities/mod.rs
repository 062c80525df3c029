//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod record;
pub mod command;

pub use user::{Caller, UserRecord, UserStats, DailyStats};
pub use record::{CommandRecord, ArtifactRecord};
pub use command::{CommandEvent, CommandInfo};
