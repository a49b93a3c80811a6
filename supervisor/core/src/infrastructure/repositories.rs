// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0
//! Config store backends.
//!
//! The file-backed store is used in production; the in-memory store is for
//! development and tests. Both persist the config as one JSON document,
//! replaced wholesale on every save.

use crate::domain::agent::AgentConfig;
use crate::domain::failure::{Failure, Result};
use crate::domain::repository::ConfigStore;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryConfigStore {
    config: Mutex<Option<AgentConfig>>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get(&self) -> Result<AgentConfig> {
        self.config
            .lock()
            .map_err(|_| Failure::unavailable("config store mutex poisoned"))?
            .clone()
            .ok_or_else(|| Failure::not_found("agent config not found"))
    }

    async fn save(&self, config: &AgentConfig) -> Result<()> {
        *self
            .config
            .lock()
            .map_err(|_| Failure::unavailable("config store mutex poisoned"))? =
            Some(config.clone());
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        self.config
            .lock()
            .map_err(|_| Failure::unavailable("config store mutex poisoned"))?
            .take();
        Ok(())
    }
}

/// JSON document on the data volume.
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get(&self) -> Result<AgentConfig> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(Failure::not_found("agent config not found"));
            }
            Err(err) => {
                return Err(Failure::unavailable(format!(
                    "failed to read agent config: {err}"
                )));
            }
        };

        serde_json::from_slice(&data)
            .map_err(|err| Failure::unavailable(format!("failed to parse agent config: {err}")))
    }

    async fn save(&self, config: &AgentConfig) -> Result<()> {
        let data = serde_json::to_vec_pretty(config)
            .map_err(|err| Failure::unavailable(format!("failed to encode agent config: {err}")))?;

        tokio::fs::write(&self.path, data)
            .await
            .map_err(|err| Failure::unavailable(format!("failed to write agent config: {err}")))
    }

    async fn delete(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            // Already gone.
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Failure::unavailable(format!(
                "failed to remove agent config: {err}"
            ))),
        }
    }
}
