//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Administrator gate and the bot runtime
//! - Errors: Domain-specific errors
//! - Messaging: Command parsing, context, dispatching

pub mod errors;
pub mod services;
pub mod messaging;
