//! Fixed user directory
//!
//! Answers lookups from a known set of usernames. Used by tests and the load
//! generator; can simulate network latency and outages.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;

use super::{canonicalize, DirectoryError, UserDirectory};

#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    users: HashSet<String>,
    latency: Option<Duration>,
    failing: bool,
}

impl StaticDirectory {
    pub fn new<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            users: users.into_iter().map(|u| canonicalize(u.as_ref())).collect(),
            latency: None,
            failing: false,
        }
    }

    /// Sleep this long before answering each lookup
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Fail every lookup
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }
}

#[async_trait]
impl UserDirectory for StaticDirectory {
    async fn lookup(&self, username: &str) -> Result<usize, DirectoryError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.failing {
            return Err(DirectoryError::Unavailable("static directory offline".to_string()));
        }
        Ok(usize::from(self.users.contains(&canonicalize(username))))
    }
}
