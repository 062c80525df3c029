//! Plugin system for qrbot
//! 
//! Each plugin bundles a set of commands and is composed into the runtime
//! at startup

pub mod manager;
pub mod trait_def;
pub mod qr;
pub mod admin;
pub mod utility;

pub use manager::PluginManager;
pub use trait_def::Plugin;
pub use qr::QrPlugin;
pub use admin::AdminPlugin;
pub use utility::UtilityPlugin;
