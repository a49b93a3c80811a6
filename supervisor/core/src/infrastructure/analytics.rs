// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::event::{AnalyticsSink, AuditEvent};
use crate::domain::failure::{Failure, Result};
use async_trait::async_trait;
use serde_json::json;
use tracing::trace;

/// Posts audit events to an HTTP collector. Callers treat emission as
/// fire-and-forget; this sink still reports failures so they can be logged.
pub struct HttpAnalyticsSink {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpAnalyticsSink {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl AnalyticsSink for HttpAnalyticsSink {
    async fn emit(&self, event: AuditEvent) -> Result<()> {
        event.validate()?;

        let body = json!({
            "distinct_id": event.credentials.api_key,
            "event": event.name,
            "properties": event.properties,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|err| Failure::unavailable(format!("failed to emit event: {err}")))?;

        if !response.status().is_success() {
            return Err(Failure::unavailable(format!(
                "event emission failed with status {}",
                response.status()
            )));
        }

        Ok(())
    }
}

/// Sink used when analytics are disabled.
pub struct NoopAnalyticsSink;

#[async_trait]
impl AnalyticsSink for NoopAnalyticsSink {
    async fn emit(&self, event: AuditEvent) -> Result<()> {
        trace!(event = %event.name, "analytics disabled, dropping event");
        Ok(())
    }
}
