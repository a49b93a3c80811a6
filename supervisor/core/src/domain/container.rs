// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::failure::Result;
use async_trait::async_trait;

/// Lifecycle states reported by the Docker runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStatus {
    Created,
    Restarting,
    Running,
    Removing,
    Paused,
    Exited,
    Dead,
}

impl ContainerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Restarting => "restarting",
            Self::Running => "running",
            Self::Removing => "removing",
            Self::Paused => "paused",
            Self::Exited => "exited",
            Self::Dead => "dead",
        }
    }
}

impl std::fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answers whether an externally-owned container exists.
#[async_trait]
pub trait ContainerOracle: Send + Sync {
    /// Checks for the existence of a container with the given ID.
    /// If `required_status` is provided, the container must also be in that
    /// state for the check to pass.
    async fn exists(&self, id: &str, required_status: Option<ContainerStatus>) -> Result<bool>;
}
