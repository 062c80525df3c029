//! Domain layer - Core business objects with no infrastructure dependencies
//! 
//! This layer contains:
//! - Entities: Callers, usage records, command events
//! - Traits: Abstractions for infrastructure (Bot, Renderer)

pub mod entities;
pub mod traits;
