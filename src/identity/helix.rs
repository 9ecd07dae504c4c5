//! Twitch Helix user directory
//!
//! `GET /helix/users?login=<name>` with the app's client id and bearer token.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use super::{DirectoryError, UserDirectory};

const HELIX_BASE_URL: &str = "https://api.twitch.tv/helix";

#[derive(Debug, Deserialize)]
struct UsersResponse {
    data: Vec<HelixUser>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct HelixUser {
    id: String,
    login: String,
}

#[derive(Debug, Clone)]
pub struct HelixDirectory {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    access_token: String,
}

impl HelixDirectory {
    pub fn new(
        client_id: impl Into<String>,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DirectoryError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: HELIX_BASE_URL.to_string(),
            client_id: client_id.into(),
            access_token: access_token.into(),
        })
    }

    /// Point at a different API root (mock servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl UserDirectory for HelixDirectory {
    async fn lookup(&self, username: &str) -> Result<usize, DirectoryError> {
        let response = self
            .http
            .get(format!("{}/users", self.base_url))
            .query(&[("login", username)])
            .header("Client-Id", &self.client_id)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DirectoryError::Timeout
                } else {
                    DirectoryError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DirectoryError::Status(status.as_u16()));
        }

        let body: UsersResponse = response.json().await?;
        Ok(body.data.len())
    }
}
