//! Per-user, per-command cooldown.
//!
//! The check and the timestamp update happen under one lock, so two rapid
//! invocations by the same user cannot both pass. An admitted invocation
//! starts its window at the check, whether or not the body later rejects
//! its input.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use super::{CommandMiddleware, Verdict};
use crate::domain::CommandEvent;
use crate::identity::canonicalize;

pub const COOLDOWN_REPLY: &str = "Command is on cooldown! You'll have to wait!";

/// Entry count above which expired entries are swept during a check
const PRUNE_THRESHOLD: usize = 1024;

#[derive(Debug)]
pub struct UserCommandCooldown {
    interval: Duration,
    blocked_reply: Option<String>,
    // (command, user) -> last admitted invocation
    last_run: Mutex<HashMap<(String, String), Instant>>,
}

impl UserCommandCooldown {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            blocked_reply: Some(COOLDOWN_REPLY.to_string()),
            last_run: Mutex::new(HashMap::new()),
        }
    }

    /// Use the default blocked reply instead of the cooldown one
    pub fn without_reply(mut self) -> Self {
        self.blocked_reply = None;
        self
    }

    /// Admit the invocation and start its window, or refuse it.
    pub fn try_admit(&self, command: &str, user: &str) -> bool {
        let now = Instant::now();
        let key = (command.to_lowercase(), canonicalize(user));
        let mut last_run = self.last_run.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(at) = last_run.get(&key) {
            if now.duration_since(*at) < self.interval {
                return false;
            }
        }

        if last_run.len() >= PRUNE_THRESHOLD {
            let interval = self.interval;
            last_run.retain(|_, at| now.duration_since(*at) < interval);
        }
        last_run.insert(key, now);
        true
    }

    /// Time left before `user` may run `command` again
    pub fn remaining(&self, command: &str, user: &str) -> Option<Duration> {
        let key = (command.to_lowercase(), canonicalize(user));
        let last_run = self.last_run.lock().unwrap_or_else(|e| e.into_inner());
        last_run
            .get(&key)
            .map(|at| self.interval.saturating_sub(at.elapsed()))
            .filter(|left| !left.is_zero())
    }
}

#[async_trait]
impl CommandMiddleware for UserCommandCooldown {
    fn name(&self) -> &'static str {
        "user_command_cooldown"
    }

    async fn check(&self, event: &CommandEvent) -> Verdict {
        if self.try_admit(&event.command, &event.user) {
            Verdict::Allow
        } else {
            tracing::debug!(
                user = %event.user,
                command = %event.command,
                remaining_ms = ?self.remaining(&event.command, &event.user).map(|d| d.as_millis()),
                "Command on cooldown"
            );
            Verdict::Block {
                reply: self.blocked_reply.clone(),
            }
        }
    }
}
