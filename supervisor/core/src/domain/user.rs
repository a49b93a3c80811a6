// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::failure::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// API credentials identifying a platform user.
///
/// Opaque secrets: the manual `Debug` impl keeps them out of logs and
/// error chains.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

/// A user of the Sentinel platform.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub organization_id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Resolves API credentials to a known platform user.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns the user owning the given credentials, `Unauthorized` if the
    /// platform rejects them.
    async fn get_user(&self, credentials: &Credentials) -> Result<User>;
}
