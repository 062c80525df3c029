//! SQLite persistence for users, command history and artifact history

use chrono::{Local, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::application::errors::StorageError;
use crate::domain::entities::{ArtifactRecord, Caller, CommandRecord, DailyStats, UserRecord, UserStats};

/// Sortable text layout used for every timestamp column
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

fn now() -> String {
    Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string()
}

fn today_start() -> String {
    Local::now()
        .date_naive()
        .and_time(NaiveTime::MIN)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

/// Single-connection store shared by the runtime and every plugin.
///
/// Each method runs under the connection mutex and commits before it
/// returns, so a write is visible to the next read from any task.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        let db = Self { conn: Mutex::new(conn) };
        db.init_tables()?;
        Ok(db)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::Poisoned)
    }

    fn init_tables(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                user_id INTEGER PRIMARY KEY,
                username TEXT,
                first_name TEXT,
                last_seen TEXT,
                commands_used INTEGER NOT NULL DEFAULT 0,
                join_date TEXT DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS command_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER,
                command TEXT NOT NULL,
                args TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(user_id)
            );

            CREATE TABLE IF NOT EXISTS artifact_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER,
                content TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(user_id)
            );

            CREATE INDEX IF NOT EXISTS idx_command_history_user ON command_history(user_id, timestamp);
            CREATE INDEX IF NOT EXISTS idx_command_history_timestamp ON command_history(timestamp);
            CREATE INDEX IF NOT EXISTS idx_artifact_history_user ON artifact_history(user_id, timestamp);",
        )?;
        Ok(())
    }

    // User management
    pub fn upsert_user(&self, id: i64, username: Option<&str>, first_name: Option<&str>) -> Result<(), StorageError> {
        let conn = self.conn()?;
        upsert_user_at(&conn, id, username, first_name, &now())?;
        Ok(())
    }

    pub fn all_users(&self) -> Result<Vec<UserRecord>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT user_id, username, first_name, last_seen FROM users ORDER BY last_seen DESC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(UserRecord {
                user_id: row.get(0)?,
                username: row.get(1)?,
                first_name: row.get(2)?,
                last_seen: row.get(3)?,
            })
        })?;

        let mut users = Vec::new();
        for user in rows {
            users.push(user?);
        }
        Ok(users)
    }

    pub fn user_stats(&self, user_id: i64) -> Result<Option<UserStats>, StorageError> {
        let conn = self.conn()?;
        let stats = conn
            .query_row(
                "SELECT u.username, u.first_name, u.commands_used, u.join_date, u.last_seen,
                        COUNT(DISTINCT a.id)
                 FROM users u
                 LEFT JOIN artifact_history a ON u.user_id = a.user_id
                 WHERE u.user_id = ?1
                 GROUP BY u.user_id",
                [user_id],
                |row| {
                    Ok(UserStats {
                        username: row.get(0)?,
                        first_name: row.get(1)?,
                        commands_used: row.get(2)?,
                        join_date: row.get(3)?,
                        last_seen: row.get(4)?,
                        artifacts_generated: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(stats)
    }

    // Command history
    pub fn record_command(&self, user_id: i64, command: &str, args: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        record_command_at(&conn, user_id, command, args, &now())?;
        Ok(())
    }

    pub fn user_history(&self, user_id: i64) -> Result<Vec<CommandRecord>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT command, args, timestamp FROM command_history
             WHERE user_id = ?1
             ORDER BY timestamp DESC, id DESC",
        )?;

        let rows = stmt.query_map([user_id], |row| {
            Ok(CommandRecord {
                command: row.get(0)?,
                args: row.get(1)?,
                timestamp: row.get(2)?,
            })
        })?;

        let mut history = Vec::new();
        for record in rows {
            history.push(record?);
        }
        Ok(history)
    }

    // Artifact history
    pub fn record_artifact(&self, user_id: i64, content: &str) -> Result<(), StorageError> {
        let conn = self.conn()?;
        record_artifact_at(&conn, user_id, content, &now())?;
        Ok(())
    }

    /// Upserts the caller and appends the command and artifact rows in one
    /// transaction, so a crash never leaves only part of the request stored.
    pub fn record_artifact_request(
        &self,
        caller: &Caller,
        command: &str,
        args: &str,
        content: &str,
    ) -> Result<(), StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let ts = now();
        upsert_user_at(&tx, caller.id, caller.username.as_deref(), caller.first_name.as_deref(), &ts)?;
        record_command_at(&tx, caller.id, command, args, &ts)?;
        record_artifact_at(&tx, caller.id, content, &ts)?;
        tx.commit()?;
        Ok(())
    }

    pub fn artifact_history(&self, user_id: i64) -> Result<Vec<ArtifactRecord>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT content, timestamp FROM artifact_history
             WHERE user_id = ?1
             ORDER BY timestamp DESC, id DESC",
        )?;

        let rows = stmt.query_map([user_id], |row| {
            Ok(ArtifactRecord {
                content: row.get(0)?,
                timestamp: row.get(1)?,
            })
        })?;

        let mut history = Vec::new();
        for record in rows {
            history.push(record?);
        }
        Ok(history)
    }

    // Aggregates
    pub fn daily_stats(&self) -> Result<DailyStats, StorageError> {
        let conn = self.conn()?;
        daily_stats_since(&conn, &today_start())
    }
}

fn upsert_user_at(
    conn: &Connection,
    id: i64,
    username: Option<&str>,
    first_name: Option<&str>,
    ts: &str,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO users (user_id, username, first_name, last_seen, commands_used, join_date)
         VALUES (?1, ?2, ?3, ?4, 1, ?4)
         ON CONFLICT(user_id) DO UPDATE SET
             username = excluded.username,
             first_name = excluded.first_name,
             last_seen = excluded.last_seen,
             commands_used = commands_used + 1",
        params![id, username, first_name, ts],
    )?;
    Ok(())
}

fn record_command_at(conn: &Connection, user_id: i64, command: &str, args: &str, ts: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO command_history (user_id, command, args, timestamp) VALUES (?1, ?2, ?3, ?4)",
        params![user_id, command, args, ts],
    )?;
    Ok(())
}

fn record_artifact_at(conn: &Connection, user_id: i64, content: &str, ts: &str) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO artifact_history (user_id, content, timestamp) VALUES (?1, ?2, ?3)",
        params![user_id, content, ts],
    )?;
    Ok(())
}

fn daily_stats_since(conn: &Connection, since: &str) -> Result<DailyStats, StorageError> {
    let count = |sql: &str, since: Option<&str>| -> rusqlite::Result<i64> {
        match since {
            Some(since) => conn.query_row(sql, [since], |row| row.get(0)),
            None => conn.query_row(sql, [], |row| row.get(0)),
        }
    };

    Ok(DailyStats {
        total_users: count("SELECT COUNT(*) FROM users", None)?,
        active_today: count("SELECT COUNT(*) FROM users WHERE last_seen >= ?1", Some(since))?,
        commands_today: count("SELECT COUNT(*) FROM command_history WHERE timestamp >= ?1", Some(since))?,
        total_artifacts: count("SELECT COUNT(*) FROM artifact_history", None)?,
    })
}
