use std::fmt;

/// The identity issuing a command
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Caller {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl Caller {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            username: None,
            first_name: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.username) {
            (Some(first), Some(username)) => format!("{} (@{})", first, username),
            (Some(first), None) => first.clone(),
            (None, Some(username)) => format!("@{}", username),
            (None, None) => self.id.to_string(),
        }
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A row of the `users` table as listed by `Database::all_users`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_seen: Option<String>,
}

/// Joined per-user projection used by `/userinfo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStats {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub commands_used: i64,
    pub join_date: Option<String>,
    pub last_seen: Option<String>,
    pub artifacts_generated: i64,
}

/// Aggregate counters for `/stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DailyStats {
    pub total_users: i64,
    pub active_today: i64,
    pub commands_today: i64,
    pub total_artifacts: i64,
}
