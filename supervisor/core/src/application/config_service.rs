// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0
//! The operations the supervisor exposes to its callers: guard-wrapped
//! config reads, validated writes, and deletes, with writes and deletes
//! each followed by an implicit reconciliation pass.

use crate::application::config_guard::ConfigConsistencyGuard;
use crate::application::reconciler::AgentReconciler;
use crate::domain::agent::{AgentConfig, AgentState};
use crate::domain::container::{ContainerOracle, ContainerStatus};
use crate::domain::failure::{Failure, Result};
use crate::domain::repository::ConfigStore;
use crate::domain::runtime::AgentRuntime;
use crate::domain::user::UserDirectory;
use std::sync::Arc;

pub struct AgentConfigService {
    store: Arc<dyn ConfigStore>,
    oracle: Arc<dyn ContainerOracle>,
    users: Arc<dyn UserDirectory>,
    runtime: Arc<dyn AgentRuntime>,
    guard: Arc<ConfigConsistencyGuard>,
    reconciler: Arc<AgentReconciler>,
}

impl AgentConfigService {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        oracle: Arc<dyn ContainerOracle>,
        users: Arc<dyn UserDirectory>,
        runtime: Arc<dyn AgentRuntime>,
        guard: Arc<ConfigConsistencyGuard>,
        reconciler: Arc<AgentReconciler>,
    ) -> Self {
        Self {
            store,
            oracle,
            users,
            runtime,
            guard,
            reconciler,
        }
    }

    /// Returns the persisted config after the consistency guard has had a
    /// chance to fix it.
    pub async fn get_config(&self) -> Result<AgentConfig> {
        self.guard.ensure_consistent().await?;
        self.store.get().await
    }

    /// Validates and persists a new config (full replace), then reconciles.
    pub async fn save_config(&self, config: &AgentConfig) -> Result<()> {
        config.validate()?;

        // The credentials must resolve to a known user; directory errors
        // propagate verbatim.
        self.users.get_user(&config.credentials()).await?;

        if let Some(target) = &config.target_container {
            let running = self
                .oracle
                .exists(target, Some(ContainerStatus::Running))
                .await?;
            if !running {
                return Err(Failure::unprocessable(format!(
                    "container {target} does not exist or is not running"
                )));
            }
        }

        self.store.save(config).await?;
        self.reconciler.reconcile().await
    }

    /// Deletes the persisted config, then reconciles.
    pub async fn delete_config(&self) -> Result<()> {
        self.store.delete().await?;
        self.reconciler.reconcile().await
    }

    /// Observed state of the managed agent container.
    pub async fn agent_status(&self) -> Result<AgentState> {
        self.runtime.status().await
    }

    /// Triggers a reconciliation pass on behalf of an external caller.
    pub async fn reconcile(&self) -> Result<()> {
        self.reconciler.reconcile().await
    }
}
