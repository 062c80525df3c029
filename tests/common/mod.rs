//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::sync::{Arc, Once};

use qrbot::application::messaging::CommandParser;
use qrbot::application::services::{AdminGate, BotRuntime};
use qrbot::domain::entities::{Caller, CommandEvent};
use qrbot::domain::traits::Renderer;
use qrbot::infrastructure::database::Database;
use qrbot::plugins::{AdminPlugin, PluginManager, QrPlugin, UtilityPlugin};
pub use qrbot::testing::{FakeRenderer, RecordingBot, Sent};

static INIT: Once = Once::new();

pub fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

/// A runtime over an on-disk database in a temporary directory
pub struct Harness {
    pub runtime: BotRuntime,
    pub bot: Arc<RecordingBot>,
    pub db: Arc<Database>,
    pub dir: tempfile::TempDir,
}

impl Harness {
    pub fn new(admins: &[i64]) -> Self {
        Self::build(admins, RecordingBot::default(), Arc::new(FakeRenderer { fail: false }))
    }

    pub fn build(admins: &[i64], bot: RecordingBot, renderer: Arc<dyn Renderer>) -> Self {
        ensure_init();

        let dir = tempfile::tempdir().unwrap();
        let db = Arc::new(Database::open(dir.path().join("bot_data.db")).unwrap());
        let bot = Arc::new(bot);

        let mut plugins = PluginManager::new();
        plugins.register(QrPlugin::new(db.clone(), renderer)).unwrap();
        plugins
            .register(AdminPlugin::new(db.clone(), dir.path().join("logs")))
            .unwrap();
        plugins.register(UtilityPlugin::new(db.clone())).unwrap();

        let runtime = BotRuntime::new(
            bot.clone(),
            db.clone(),
            Arc::new(AdminGate::new(admins.iter().copied())),
            &plugins,
        )
        .unwrap();

        Self { runtime, bot, db, dir }
    }

    pub fn db_path(&self) -> std::path::PathBuf {
        self.dir.path().join("bot_data.db")
    }

    pub fn log_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("logs")
    }
}

/// Parse a message as the private chat of `user_id` would deliver it
pub fn event(user_id: i64, text: &str) -> CommandEvent {
    CommandParser::new()
        .with_bot_username("qr_test_bot")
        .parse(text, Caller::new(user_id).with_first_name("Tester"), user_id)
        .unwrap()
}
