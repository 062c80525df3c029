//! End-to-end dispatch tests
//! Run with: cargo test --test runtime_test

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{event, FakeRenderer, Harness, RecordingBot, Sent};
use qrbot::application::errors::BotError;
use qrbot::application::messaging::Context;
use qrbot::application::services::admin_gate::DENIAL_MESSAGE;
use qrbot::application::services::runtime::{DATABASE_ERROR_REPLY, GENERIC_ERROR_REPLY, TOO_LONG_REPLY};
use qrbot::application::services::{AdminGate, BotRuntime, DispatchOutcome};
use qrbot::domain::entities::CommandInfo;
use qrbot::infrastructure::database::Database;
use qrbot::infrastructure::render::QrRenderer;
use qrbot::plugins::qr::RENDER_FAILED;
use qrbot::plugins::{Plugin, PluginManager, QrPlugin};

const ADMIN: i64 = 1;
const USER: i64 = 42;

#[tokio::test]
async fn generate_hello_world() {
    let h = Harness::new(&[ADMIN]);

    let outcome = h.runtime.handle_event(event(USER, "/generate Hello World")).await;
    assert_eq!(outcome, DispatchOutcome::Succeeded);

    let stats = h.db.user_stats(USER).unwrap().unwrap();
    assert_eq!(stats.commands_used, 1);
    assert_eq!(stats.artifacts_generated, 1);

    let history = h.db.user_history(USER).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].command, "generate");
    assert_eq!(history[0].args, "Hello World");

    let artifacts = h.db.artifact_history(USER).unwrap();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].content, "Hello World");

    match h.bot.sent().as_slice() {
        [Sent::Image { chat_id, caption, .. }] => {
            assert_eq!(*chat_id, USER);
            assert!(caption.contains("Hello World"));
        }
        other => panic!("expected a single image, got {:?}", other),
    }
}

#[tokio::test]
async fn generate_with_real_renderer_sends_png() {
    let h = Harness::build(&[], RecordingBot::default(), Arc::new(QrRenderer::default()));

    h.runtime.handle_event(event(USER, "/generate@qr_test_bot https://example.com")).await;

    match h.bot.sent().as_slice() {
        [Sent::Image { bytes, .. }] => assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n")),
        other => panic!("expected a single image, got {:?}", other),
    }
}

#[tokio::test]
async fn render_failure_is_answered_by_the_plugin() {
    let h = Harness::build(&[ADMIN], RecordingBot::default(), Arc::new(FakeRenderer { fail: true }));

    let outcome = h.runtime.handle_event(event(USER, "/generate Hello World")).await;
    assert_eq!(outcome, DispatchOutcome::Succeeded);
    assert_eq!(h.bot.sent(), vec![Sent::Text { chat_id: USER, text: RENDER_FAILED.to_string() }]);
    assert_eq!(h.db.artifact_history(USER).unwrap().len(), 1);
}

#[tokio::test]
async fn non_admin_is_denied_without_writes() {
    let h = Harness::new(&[ADMIN]);

    for text in ["/stats", "/users", "/userinfo 1", "/logs", "/broadcast hi"] {
        h.runtime.handle_event(event(USER, text)).await;
    }

    assert!(h.bot.sent().iter().all(|s| *s == Sent::Text { chat_id: USER, text: DENIAL_MESSAGE.to_string() }));
    assert_eq!(h.bot.sent().len(), 5);
    assert!(h.db.user_stats(USER).unwrap().is_none());
    assert!(h.db.user_history(USER).unwrap().is_empty());
    assert_eq!(h.db.daily_stats().unwrap().commands_today, 0);
}

#[tokio::test]
async fn admin_stats_reflect_activity() {
    let h = Harness::new(&[ADMIN]);

    h.runtime.handle_event(event(USER, "/generate one")).await;
    h.runtime.handle_event(event(USER, "/generate two")).await;
    h.runtime.handle_event(event(ADMIN, "/stats")).await;

    let reply = h.bot.texts_to(ADMIN).pop().unwrap();
    assert!(reply.starts_with("📊 Bot Statistics:"));
    assert!(reply.contains("Total users: 2"));
    assert!(reply.contains("Commands used today: 3"));
    assert!(reply.contains("Total QR codes generated: 2"));
}

#[tokio::test]
async fn userinfo_with_bad_id_never_records() {
    let h = Harness::new(&[ADMIN]);

    h.runtime.handle_event(event(ADMIN, "/userinfo abc")).await;

    assert_eq!(h.bot.texts_to(ADMIN), vec!["Invalid user ID format.".to_string()]);
    assert!(h.db.user_stats(ADMIN).unwrap().is_none());
}

#[tokio::test]
async fn unknown_command_is_ignored() {
    let h = Harness::new(&[ADMIN]);

    let outcome = h.runtime.handle_event(event(USER, "/frobnicate now")).await;

    assert_eq!(outcome, DispatchOutcome::Ignored);
    assert!(h.bot.sent().is_empty());
    assert!(h.db.user_stats(USER).unwrap().is_none());
}

#[tokio::test]
async fn help_lists_admin_commands_only_for_admins() {
    let h = Harness::new(&[ADMIN]);

    h.runtime.handle_event(event(USER, "/start")).await;
    h.runtime.handle_event(event(ADMIN, "/help")).await;

    let user_help = h.bot.texts_to(USER).pop().unwrap();
    assert!(user_help.starts_with("Available commands:\n/start - "));
    assert!(user_help.contains("/generate - Generate QR code from text"));
    assert!(user_help.contains("/ping - "));
    assert!(!user_help.contains("👑 Admin commands:"));
    assert!(!user_help.contains("/broadcast"));

    let admin_help = h.bot.texts_to(ADMIN).pop().unwrap();
    assert!(admin_help.contains("👑 Admin commands:"));
    assert!(admin_help.contains("/userinfo - "));

    let history = h.db.user_history(USER).unwrap();
    assert_eq!(history[0].command, "start");
}

#[tokio::test]
async fn storage_failure_gets_database_reply_and_admin_report() {
    let h = Harness::new(&[ADMIN]);

    let conn = rusqlite::Connection::open(h.db_path()).unwrap();
    conn.execute_batch("DROP TABLE command_history;").unwrap();
    drop(conn);

    let outcome = h.runtime.handle_event(event(USER, "/generate Hello World")).await;
    assert_eq!(outcome, DispatchOutcome::Failed);

    assert_eq!(h.bot.texts_to(USER), vec![DATABASE_ERROR_REPLY.to_string()]);

    let reports = h.bot.texts_to(ADMIN);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].starts_with(&format!("❌ Error for user {}:\nCommand: /generate Hello World\nError: ", USER)));

    // The transaction rolled back the user upsert
    assert!(h.db.user_stats(USER).unwrap().is_none());
}

#[tokio::test]
async fn oversized_broadcast_is_reported_as_too_long() {
    let h = Harness::new(&[ADMIN]);

    let text = format!("/broadcast {}", "a".repeat(5000));
    let outcome = h.runtime.handle_event(event(ADMIN, &text)).await;
    assert_eq!(outcome, DispatchOutcome::Failed);

    let texts = h.bot.texts_to(ADMIN);
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0], TOO_LONG_REPLY);
    assert!(texts[1].starts_with("❌ Error for user 1:"));
    assert!(texts[1].chars().count() <= 4000);
}

#[tokio::test]
async fn unreachable_admin_does_not_block_other_reports() {
    // Admin 0 sorts ahead of ADMIN, so its failure happens first
    let h = Harness::build(
        &[0, ADMIN],
        RecordingBot::failing_for([0]),
        Arc::new(FakeRenderer { fail: false }),
    );

    let conn = rusqlite::Connection::open(h.db_path()).unwrap();
    conn.execute_batch("DROP TABLE users;").unwrap();
    drop(conn);

    let outcome = h.runtime.handle_event(event(USER, "/ping")).await;
    assert_eq!(outcome, DispatchOutcome::Failed);
    assert_eq!(h.bot.texts_to(USER), vec![DATABASE_ERROR_REPLY.to_string()]);

    let reports = h.bot.texts_to(ADMIN);
    assert_eq!(reports.len(), 1);
    assert!(reports[0].starts_with(&format!("❌ Error for user {}:\nCommand: /ping\n", USER)));
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn unreadable_log_file_is_not_a_database_error() {
    let h = Harness::new(&[ADMIN]);

    // A regular file as far as metadata goes, but reading it fails
    std::fs::create_dir_all(h.log_dir()).unwrap();
    std::os::unix::fs::symlink("/proc/self/mem", h.log_dir().join("bot_2099-01-01.log")).unwrap();

    let outcome = h.runtime.handle_event(event(ADMIN, "/logs")).await;
    assert_eq!(outcome, DispatchOutcome::Failed);

    let texts = h.bot.texts_to(ADMIN);
    assert_eq!(texts[0], GENERIC_ERROR_REPLY);
    assert!(texts[1].contains("Failed to read log file"));
    assert!(h.db.daily_stats().is_ok());
}

#[tokio::test]
async fn logs_sends_newest_file_to_admin() {
    let h = Harness::new(&[ADMIN]);
    std::fs::create_dir_all(h.log_dir()).unwrap();
    std::fs::write(h.log_dir().join("bot_2026-01-01.log"), "started\n").unwrap();

    let outcome = h.runtime.handle_event(event(ADMIN, "/logs")).await;
    assert_eq!(outcome, DispatchOutcome::Succeeded);

    match h.bot.sent().as_slice() {
        [Sent::File { chat_id, bytes, filename, caption }] => {
            assert_eq!(*chat_id, ADMIN);
            assert_eq!(bytes.as_slice(), b"started\n");
            assert_eq!(filename, "bot_2026-01-01.log");
            assert_eq!(caption, "Here's the latest log file.");
        }
        other => panic!("expected a single file, got {:?}", other),
    }
}

#[tokio::test]
async fn broadcast_counts_failures() {
    let h = Harness::build(
        &[ADMIN],
        RecordingBot::failing_for([7]),
        Arc::new(FakeRenderer { fail: false }),
    );

    h.runtime.handle_event(event(USER, "/generate x")).await;
    h.runtime.handle_event(event(7, "/generate y")).await;
    h.runtime.handle_event(event(ADMIN, "/broadcast Maintenance at noon")).await;

    assert_eq!(h.bot.texts_to(USER), vec!["Maintenance at noon".to_string()]);
    let texts = h.bot.texts_to(ADMIN);
    assert_eq!(texts.last().unwrap(), "📣 Broadcast sent to 2 users (1 failed).");
}

#[tokio::test]
async fn ping_edits_its_own_message() {
    let h = Harness::new(&[]);

    h.runtime.handle_event(event(USER, "/ping")).await;

    match h.bot.sent().as_slice() {
        [Sent::Text { text, .. }, Sent::Edit { message_id, text: edited, .. }] => {
            assert_eq!(text, "Pinging... ⏳");
            assert_eq!(*message_id, 1);
            assert!(edited.starts_with("Pong! 🏓"));
        }
        other => panic!("unexpected replies {:?}", other),
    }
}

struct Shadowing {
    command: &'static str,
}

#[async_trait]
impl Plugin for Shadowing {
    fn name(&self) -> &str {
        "shadowing"
    }

    fn describe(&self) -> &str {
        "Registers a name someone else owns"
    }

    fn commands(&self) -> Vec<CommandInfo> {
        vec![CommandInfo::new(self.command, "shadow")]
    }

    async fn handle(&self, _command: &str, _ctx: &Context) -> Result<(), BotError> {
        Ok(())
    }
}

#[test]
fn command_collisions_fail_startup() {
    for command in ["generate", "help"] {
        let db = Arc::new(Database::in_memory().unwrap());
        let mut plugins = PluginManager::new();
        plugins
            .register(QrPlugin::new(db.clone(), Arc::new(QrRenderer::default())))
            .unwrap();
        plugins.register(Shadowing { command }).unwrap();

        let result = BotRuntime::new(
            Arc::new(RecordingBot::default()),
            db,
            Arc::new(AdminGate::default()),
            &plugins,
        );
        assert!(matches!(result, Err(BotError::Config(_))), "/{} should collide", command);
    }
}

#[test]
fn generic_reply_covers_unclassified_errors() {
    use qrbot::application::services::runtime::failure_reply;
    assert_eq!(failure_reply(&BotError::Network("timeout".into())), GENERIC_ERROR_REPLY);
}
