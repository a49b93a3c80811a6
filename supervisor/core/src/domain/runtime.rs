// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::agent::{AgentConfig, AgentState};
use crate::domain::failure::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Default image of the managed agent. The runtime takes the effective
/// image at construction, so deployments can point at a staging registry.
pub const AGENT_IMAGE: &str = "sentinellabs/agent:latest";

/// Fixed name of the managed container.
pub const AGENT_CONTAINER_NAME: &str = "sentinel-agent";

/// Label marking the managed container so lookups never depend on a
/// remembered ID.
pub const MANAGED_BY_LABEL_KEY: &str = "com.sentinel.managed-by";
pub const MANAGED_BY_LABEL_VALUE: &str = "sentinel-supervisor";

/// Run parameters for the managed container, built fresh from the config on
/// every reconciliation pass and never shared across passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeLaunchSpec {
    pub image: String,
    pub container_name: String,
    pub env: Vec<String>,
    pub labels: HashMap<String, String>,
    /// `host` unless the config pins a target container, in which case the
    /// agent joins that container's network namespace.
    pub network_mode: String,
    pub cmd: Vec<String>,
}

impl RuntimeLaunchSpec {
    pub fn from_config(config: &AgentConfig, image: &str) -> Self {
        let env = vec![
            format!("SENTINEL_API_KEY={}", config.api_key),
            format!("SENTINEL_API_SECRET={}", config.api_secret),
        ];

        let labels = HashMap::from([(
            MANAGED_BY_LABEL_KEY.to_string(),
            MANAGED_BY_LABEL_VALUE.to_string(),
        )]);

        let network_mode = match &config.target_container {
            Some(target) => format!("container:{target}"),
            None => "host".to_string(),
        };

        let mut cmd = vec![
            "capture".to_string(),
            "--project".to_string(),
            config.project_name.clone(),
        ];
        if let Some(port) = config.target_port {
            cmd.push("--filter".to_string());
            cmd.push(format!("port {port}"));
        }

        Self {
            image: image.to_string(),
            container_name: AGENT_CONTAINER_NAME.to_string(),
            env,
            labels,
            network_mode,
            cmd,
        }
    }
}

/// Drives the managed container's lifecycle. Owns the retry policy for the
/// mutating start path; the reconciler above it never retries.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Pulls the agent image and creates+starts the managed container.
    async fn start(&self, config: &AgentConfig) -> Result<()>;

    /// Force-removes the managed container. Succeeds when none exists.
    async fn remove(&self) -> Result<()>;

    /// Observes the managed container. An absent container maps to
    /// `AgentState { created: false, .. }`, not an error.
    async fn status(&self) -> Result<AgentState>;
}
