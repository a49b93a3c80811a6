// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::container::ContainerStatus;
use crate::domain::failure::{Failure, Result};
use crate::domain::user::Credentials;
use serde::{Deserialize, Serialize};

/// Desired state of the monitoring agent.
///
/// A singleton record: saved wholesale (full replace, never merged) and
/// rewritten by the consistency guard when the watched container disappears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub api_key: String,
    pub api_secret: String,
    pub project_name: String,
    /// Restricts capture to a single port. Only one of `target_port` and
    /// `target_container` is meaningful for request selection.
    pub target_port: Option<u16>,
    /// Externally-owned container whose network namespace the agent joins.
    /// Its existence gates whether the agent may remain enabled.
    pub target_container: Option<String>,
    /// Whether the agent should be running.
    #[serde(rename = "enabled")]
    pub is_enabled: bool,
    #[serde(rename = "demo_mode_enabled")]
    pub is_demo_mode_enabled: bool,
}

impl AgentConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            api_key: self.api_key.clone(),
            api_secret: self.api_secret.clone(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_demo_mode_enabled && !self.is_enabled {
            return Err(Failure::invalid(
                "demo mode cannot be enabled when the agent is disabled",
            ));
        }

        if self.api_key.is_empty() {
            return Err(Failure::invalid("api key is missing"));
        }

        if self.api_secret.is_empty() {
            return Err(Failure::invalid("api secret is missing"));
        }

        if self.project_name.is_empty() {
            return Err(Failure::invalid("project name is missing"));
        }

        if self.target_port == Some(0) {
            return Err(Failure::invalid("target port must be positive"));
        }

        Ok(())
    }
}

/// Observed state of the managed agent container.
///
/// Recomputed on every reconciliation pass by querying the runtime; never
/// persisted. `created` distinguishes "container absent" from "container
/// present but not running".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentState {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub container_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub status: String,
    pub created: bool,
}

impl AgentState {
    pub fn is_running(&self) -> bool {
        self.status == ContainerStatus::Running.as_str()
    }
}
