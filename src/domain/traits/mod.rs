//! Domain traits - Abstractions for infrastructure implementations

pub mod bot;
pub mod renderer;

pub use bot::{Bot, BotInfo, MAX_MESSAGE_LENGTH};
pub use renderer::Renderer;
