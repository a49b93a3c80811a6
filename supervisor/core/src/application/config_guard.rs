// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0
//! Read-time self-healing of the agent configuration.
//!
//! An agent configured to watch a specific container may only stay enabled
//! while that container exists and is running. The guard runs synchronously
//! before any config read is returned to a caller and rewrites the config
//! when the invariant is broken.

use crate::domain::container::{ContainerOracle, ContainerStatus};
use crate::domain::event::{AnalyticsSink, AuditEvent};
use crate::domain::failure::Result;
use crate::domain::repository::ConfigStore;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub struct ConfigConsistencyGuard {
    store: Arc<dyn ConfigStore>,
    oracle: Arc<dyn ContainerOracle>,
    analytics: Arc<dyn AnalyticsSink>,
}

impl ConfigConsistencyGuard {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        oracle: Arc<dyn ContainerOracle>,
        analytics: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            store,
            oracle,
            analytics,
        }
    }

    /// Clears the target container and disables the agent when the watched
    /// container no longer exists or is not running.
    ///
    /// Audit emission is best-effort; existence-check and persist failures
    /// propagate to the caller.
    pub async fn ensure_consistent(&self) -> Result<()> {
        let config = match self.store.get().await {
            Ok(config) => config,
            // Nothing saved yet means nothing to fix.
            Err(err) if err.is_not_found() => return Ok(()),
            Err(err) => return Err(err),
        };

        let Some(target) = config.target_container.clone() else {
            return Ok(());
        };

        if self
            .oracle
            .exists(&target, Some(ContainerStatus::Running))
            .await?
        {
            return Ok(());
        }

        info!(
            target_container = %target,
            "target container is gone or not running, disabling the agent"
        );

        let event = AuditEvent::new(
            config.credentials(),
            "Agent Automatically Disabled",
            HashMap::from([(
                "reason".to_string(),
                json!("targeted container no longer exists or is not running"),
            )]),
        );
        if let Err(err) = self.analytics.emit(event).await {
            debug!(error = %err, "failed to emit audit event");
        }

        let mut updated = config;
        updated.target_container = None;
        updated.is_enabled = false;

        self.store.save(&updated).await
    }
}
