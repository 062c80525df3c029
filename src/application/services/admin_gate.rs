//! Administrator allow-list

use std::collections::HashSet;

use crate::application::errors::BotError;
use crate::application::messaging::Context;

pub const DENIAL_MESSAGE: &str = "⚠️ This command is only available to bot administrators.";

/// Static set of administrator ids, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct AdminGate {
    ids: HashSet<i64>,
}

impl AdminGate {
    pub fn new(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.ids.contains(&user_id)
    }

    /// Administrator ids in ascending order
    pub fn ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.ids.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn require(&self, user_id: i64) -> Result<(), BotError> {
        if self.is_admin(user_id) {
            Ok(())
        } else {
            Err(BotError::PermissionDenied(format!("user {} is not an administrator", user_id)))
        }
    }

    /// Returns `Ok(true)` for administrators; otherwise sends the denial
    /// reply, logs a warning and returns `Ok(false)`
    pub async fn check_or_deny(&self, ctx: &Context) -> Result<bool, BotError> {
        match self.require(ctx.caller().id) {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::warn!("Rejected admin command /{}: {}", ctx.event.name, e);
                ctx.reply_text(DENIAL_MESSAGE).await?;
                Ok(false)
            }
        }
    }
}
