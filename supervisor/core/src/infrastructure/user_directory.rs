// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::failure::{Failure, Result};
use crate::domain::user::{Credentials, User, UserDirectory};
use async_trait::async_trait;
use reqwest::StatusCode;

const USER_PATH: &str = "/api/v1/user";

/// Resolves credentials against the Sentinel SaaS API with basic auth.
pub struct HttpUserDirectory {
    client: reqwest::Client,
    base_url: String,
}

impl HttpUserDirectory {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    async fn get_user(&self, credentials: &Credentials) -> Result<User> {
        let url = format!("{}{}", self.base_url, USER_PATH);

        let response = self
            .client
            .get(&url)
            .basic_auth(&credentials.api_key, Some(&credentials.api_secret))
            .send()
            .await
            .map_err(|err| Failure::unavailable(format!("failed to fetch user: {err}")))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(Failure::unauthorized(
                "no user found with the given api credentials",
            )),
            status if !status.is_success() => Err(Failure::unavailable(format!(
                "user lookup failed with status {status}"
            ))),
            _ => response
                .json::<User>()
                .await
                .map_err(|err| Failure::unavailable(format!("failed to decode user: {err}"))),
        }
    }
}
