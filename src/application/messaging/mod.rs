//! Message handling - Command parsing, per-command context, dispatching

pub mod context;
pub mod dispatcher;
pub mod parser;
pub mod text;

pub use context::Context;
pub use dispatcher::Dispatcher;
pub use parser::CommandParser;
