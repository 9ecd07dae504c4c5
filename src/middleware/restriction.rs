//! Authorization restriction: only an allow-set of users may run the command.

use std::collections::HashSet;

use async_trait::async_trait;

use super::{CommandMiddleware, Verdict};
use crate::domain::CommandEvent;
use crate::identity::canonicalize;

#[derive(Debug, Clone)]
pub struct UserRestriction {
    allowed: HashSet<String>,
    blocked_reply: Option<String>,
}

impl UserRestriction {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            allowed: allowed.into_iter().map(|u| canonicalize(u.as_ref())).collect(),
            blocked_reply: None,
        }
    }

    pub fn with_blocked_reply(mut self, reply: impl Into<String>) -> Self {
        self.blocked_reply = Some(reply.into());
        self
    }

    pub fn is_allowed(&self, user: &str) -> bool {
        self.allowed.contains(&canonicalize(user))
    }
}

#[async_trait]
impl CommandMiddleware for UserRestriction {
    fn name(&self) -> &'static str {
        "user_restriction"
    }

    async fn check(&self, event: &CommandEvent) -> Verdict {
        if self.is_allowed(&event.user) {
            Verdict::Allow
        } else {
            tracing::debug!(user = %event.user, command = %event.command, "User not in allow-set");
            Verdict::Block {
                reply: self.blocked_reply.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_allowed_user_case_insensitive() {
        let restriction = UserRestriction::new(["DrunkLockHolmes"]);
        let event = CommandEvent::new("drunklockholmes", "currency", "Gold");
        assert_eq!(restriction.check(&event).await, Verdict::Allow);
    }

    #[tokio::test]
    async fn test_other_user_blocked_with_default() {
        let restriction = UserRestriction::new(["rinonkaru"]);
        let event = CommandEvent::new("alice", "currency", "Gold");
        assert_eq!(restriction.check(&event).await, Verdict::Block { reply: None });
    }

    #[tokio::test]
    async fn test_custom_reply() {
        let restriction = UserRestriction::new(["rinonkaru"]).with_blocked_reply("Operators only.");
        let event = CommandEvent::new("alice", "set_bank", "@bob 5");
        let verdict = restriction.check(&event).await;
        assert_eq!(verdict.blocked_reply(), Some("Operators only."));
    }
}
