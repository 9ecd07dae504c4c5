//! Command Middleware
//!
//! Checks that run before the account guard and the command body. Each
//! route carries an ordered list; the first middleware that blocks wins and
//! its reply (or the default blocked reply) is sent instead of running the
//! command.

mod cooldown;
mod restriction;

use async_trait::async_trait;

use crate::domain::CommandEvent;

pub use cooldown::{UserCommandCooldown, COOLDOWN_REPLY};
pub use restriction::UserRestriction;

/// Reply for a blocked command whose middleware has no reply of its own
pub const DEFAULT_BLOCKED_REPLY: &str = "For one reason or another, command execution was blocked";

/// Outcome of one middleware check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    /// Stop here; `reply` overrides the default blocked reply
    Block { reply: Option<String> },
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allow)
    }

    /// Reply text for a blocked verdict
    pub fn blocked_reply(&self) -> Option<&str> {
        match self {
            Verdict::Allow => None,
            Verdict::Block { reply } => Some(reply.as_deref().unwrap_or(DEFAULT_BLOCKED_REPLY)),
        }
    }
}

#[async_trait]
pub trait CommandMiddleware: Send + Sync {
    /// Label for logs
    fn name(&self) -> &'static str;

    async fn check(&self, event: &CommandEvent) -> Verdict;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocked_reply_default() {
        let verdict = Verdict::Block { reply: None };
        assert!(!verdict.is_allowed());
        assert_eq!(verdict.blocked_reply(), Some(DEFAULT_BLOCKED_REPLY));
    }

    #[test]
    fn test_blocked_reply_override() {
        let verdict = Verdict::Block {
            reply: Some("nope".to_string()),
        };
        assert_eq!(verdict.blocked_reply(), Some("nope"));
        assert_eq!(Verdict::Allow.blocked_reply(), None);
    }
}
