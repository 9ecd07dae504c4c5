//! Identity module
//!
//! Canonical usernames, mention extraction, and the platform directory that
//! confirms a username belongs to a real account.

mod helix;
mod static_directory;

use async_trait::async_trait;

pub use helix::HelixDirectory;
pub use static_directory::StaticDirectory;

/// Ledger key for a platform username
pub fn canonicalize(name: &str) -> String {
    name.to_lowercase()
}

/// Pull the first `@mention` out of free-form text.
///
/// Returns the text after the first `@` up to the next space (or the end).
/// Text without an `@` is returned unchanged.
pub fn extract_mention(text: &str) -> &str {
    let Some(start) = text.find('@') else {
        return text;
    };
    let rest = &text[start + 1..];
    match rest.find(' ') {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// Errors from a directory lookup
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Directory request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Directory responded with status {0}")]
    Status(u16),

    #[error("Directory lookup timed out")]
    Timeout,

    #[error("Directory unavailable: {0}")]
    Unavailable(String),
}

/// The chat platform's account directory.
///
/// A lookup is network I/O and may suspend for a while; it must never be
/// awaited while holding an account lock.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Number of platform accounts whose login equals `username`
    async fn lookup(&self, username: &str) -> Result<usize, DirectoryError>;
}

/// True iff exactly one platform account matches `username`.
///
/// Lookup failures are logged and treated as "not found".
pub async fn confirm_exists(directory: &dyn UserDirectory, username: &str) -> bool {
    if username.is_empty() {
        return false;
    }
    match directory.lookup(username).await {
        Ok(count) => count == 1,
        Err(e) => {
            tracing::warn!(username = %username, error = %e, "User directory lookup failed");
            false
        }
    }
}
