//! Command Context
//!
//! The inbound chat event and the resolved identities handed to a command body.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chat message that addressed the bot with a command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandEvent {
    /// Channel the message arrived in
    #[serde(default)]
    pub channel: String,

    /// Platform username of the chatter, case as delivered
    pub user: String,

    /// Command name without prefix
    pub command: String,

    /// Everything after the command name
    #[serde(default)]
    pub parameter: String,
}

impl CommandEvent {
    pub fn new(user: impl Into<String>, command: impl Into<String>, parameter: impl Into<String>) -> Self {
        Self {
            channel: String::new(),
            user: user.into(),
            command: command.into(),
            parameter: parameter.into(),
        }
    }

    pub fn in_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }
}

/// Identities resolved by the account guard, passed explicitly into a handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandContext {
    /// Canonical name of the invoker, when the route asks for it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub executor: Option<String>,

    /// Canonical name of the mentioned user, when present and requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Correlation ID for tracing one command through the logs
    pub correlation_id: Uuid,
}

impl CommandContext {
    pub fn new() -> Self {
        Self {
            executor: None,
            target: None,
            correlation_id: Uuid::new_v4(),
        }
    }

    pub fn with_executor(mut self, executor: impl Into<String>) -> Self {
        self.executor = Some(executor.into());
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: Uuid) -> Self {
        self.correlation_id = correlation_id;
        self
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::new()
    }
}
