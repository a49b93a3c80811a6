// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0
//! Persistence contract for the agent configuration.
//!
//! The config is one logical document. Readers and writers operate on it
//! wholesale; there is no optimistic-concurrency token, so the last writer
//! wins. Backend choice (file, in-memory) is an injected implementation
//! detail, see `crate::infrastructure::repositories`.

use crate::domain::agent::AgentConfig;
use crate::domain::failure::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Returns the persisted config, `NotFound` if none has been saved.
    async fn get(&self) -> Result<AgentConfig>;

    /// Persists the config, replacing any previous document in full.
    async fn save(&self, config: &AgentConfig) -> Result<()>;

    /// Deletes the persisted config. Deleting an absent config is a no-op.
    async fn delete(&self) -> Result<()>;
}
