// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::failure::{Failure, Result};
use crate::domain::user::Credentials;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// An audit/analytics event attributed to a platform user.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    /// Credentials identifying the user the event belongs to.
    pub credentials: Credentials,
    pub name: String,
    pub properties: HashMap<String, Value>,
}

impl AuditEvent {
    pub fn new(
        credentials: Credentials,
        name: impl Into<String>,
        properties: HashMap<String, Value>,
    ) -> Self {
        Self {
            credentials,
            name: name.into(),
            properties,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Failure::invalid("event name is missing"));
        }
        Ok(())
    }
}

/// Fire-and-forget audit sink. Callers log and swallow emission failures.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    async fn emit(&self, event: AuditEvent) -> Result<()>;
}
