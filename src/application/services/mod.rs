//! Application services - Access control and the command runtime

pub mod admin_gate;
pub mod runtime;

pub use admin_gate::AdminGate;
pub use runtime::{BotRuntime, DispatchOutcome};
