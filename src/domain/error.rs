//! Command Error Types
//!
//! User-facing rejections. The `Display` text of each variant is the exact
//! reply sent back to chat, so handlers can bail out with `?` and the
//! dispatcher only has to stringify the error.

use thiserror::Error;

/// Reply for a target that the platform directory does not know.
pub const UNKNOWN_ACCOUNT_REPLY: &str = "The specified user does not exist on Twitch.";

/// Business rule violations and input problems reported back to the invoker.
///
/// None of these abort the process; a command that fails with one of them
/// has made no ledger write.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Missing or malformed parameter
    #[error("{0}")]
    Validation(String),

    /// Balance check failed
    #[error("{0}")]
    InsufficientFunds(String),

    /// Mentioned user does not exist on the platform
    #[error("{}", UNKNOWN_ACCOUNT_REPLY)]
    UnknownAccount(String),

    /// Self-rob, bot-rob, empty target and similar refusals
    #[error("{0}")]
    PolicyRejection(String),

    /// A credit would overflow the stored integer
    #[error("That amount is too large to handle.")]
    Overflow,
}

impl CommandError {
    pub fn validation(reply: impl Into<String>) -> Self {
        Self::Validation(reply.into())
    }

    pub fn insufficient_funds(reply: impl Into<String>) -> Self {
        Self::InsufficientFunds(reply.into())
    }

    pub fn unknown_account(username: impl Into<String>) -> Self {
        Self::UnknownAccount(username.into())
    }

    pub fn policy(reply: impl Into<String>) -> Self {
        Self::PolicyRejection(reply.into())
    }

    /// Short label used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::InsufficientFunds(_) => "insufficient_funds",
            Self::UnknownAccount(_) => "unknown_account",
            Self::PolicyRejection(_) => "policy_rejection",
            Self::Overflow => "overflow",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_text_is_display() {
        let err = CommandError::validation("You have to provide an amount to deposit.");
        assert_eq!(err.to_string(), "You have to provide an amount to deposit.");
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn test_unknown_account_hides_username() {
        let err = CommandError::unknown_account("ghost");
        assert_eq!(err.to_string(), UNKNOWN_ACCOUNT_REPLY);
        assert_eq!(err, CommandError::UnknownAccount("ghost".to_string()));
    }

    #[test]
    fn test_kinds_are_distinct() {
        let kinds = [
            CommandError::validation("a").kind(),
            CommandError::insufficient_funds("b").kind(),
            CommandError::unknown_account("c").kind(),
            CommandError::policy("d").kind(),
            CommandError::Overflow.kind(),
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in kinds.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
