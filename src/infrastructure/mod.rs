//! Infrastructure layer - External concerns
//!
//! This layer contains:
//! - Config: Configuration loading
//! - Database: SQLite persistence of users, commands and artifacts
//! - Adapters: Platform integrations (Telegram, console)
//! - Logging: Console and daily file sinks
//! - Render: QR code rasterization

pub mod config;
pub mod database;
pub mod adapters;
pub mod logging;
pub mod render;
