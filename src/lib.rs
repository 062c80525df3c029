//! qrbot - a plugin-based Telegram bot that turns text into QR codes

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod plugins;

#[doc(hidden)]
pub mod testing;
