// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0
//! Docker-backed implementation of the managed-agent runtime.
//!
//! Owns the bounded retry around the mutating start path. Each attempt is
//! remove-then-create-then-start, so a create that succeeded before a failed
//! start can never leave a second container behind.

use crate::domain::agent::{AgentConfig, AgentState};
use crate::domain::failure::{Failure, Result};
use crate::domain::runtime::{
    AgentRuntime, RuntimeLaunchSpec, AGENT_CONTAINER_NAME, MANAGED_BY_LABEL_KEY,
    MANAGED_BY_LABEL_VALUE,
};
use crate::infrastructure::docker::DockerClient;
use async_trait::async_trait;
use bollard::models::{ContainerCreateBody, ContainerSummary, HostConfig};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

const START_ATTEMPTS: u32 = 3;

pub struct DockerAgentRuntime {
    client: Arc<DockerClient>,
    image: String,
}

impl DockerAgentRuntime {
    pub fn new(client: Arc<DockerClient>, image: impl Into<String>) -> Self {
        Self {
            client,
            image: image.into(),
        }
    }

    /// Stable filter identifying the managed container: fixed name, fixed
    /// label, and the agent image as ancestor.
    fn managed_filters(&self) -> HashMap<String, Vec<String>> {
        HashMap::from([
            ("name".to_string(), vec![AGENT_CONTAINER_NAME.to_string()]),
            (
                "label".to_string(),
                vec![format!("{MANAGED_BY_LABEL_KEY}={MANAGED_BY_LABEL_VALUE}")],
            ),
            ("ancestor".to_string(), vec![self.image.clone()]),
        ])
    }

    async fn find_managed(&self) -> Result<ContainerSummary> {
        self.client
            .find_container(
                self.managed_filters(),
                None::<fn(&ContainerSummary) -> bool>,
            )
            .await
    }
}

#[async_trait]
impl AgentRuntime for DockerAgentRuntime {
    async fn start(&self, config: &AgentConfig) -> Result<()> {
        self.client.pull_image(&self.image).await?;

        let spec = RuntimeLaunchSpec::from_config(config, &self.image);
        let body = create_body(&spec);

        let id = with_attempts(START_ATTEMPTS, |attempt| {
            let body = body.clone();
            let name = spec.container_name.clone();
            async move {
                if attempt > 1 {
                    warn!(attempt, "retrying agent container start");
                }
                // Remove first so a create that succeeded on an earlier
                // attempt cannot accumulate.
                self.remove().await?;
                self.client.run(&name, body).await
            }
        })
        .await?;

        info!(container_id = %id, "started agent container");
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        let container = match self.find_managed().await {
            Ok(container) => container,
            // Nothing to remove.
            Err(err) if err.is_not_found() => return Ok(()),
            Err(err) => return Err(err),
        };

        let Some(id) = container.id else {
            return Ok(());
        };

        info!(container_id = %id, "removing agent container");
        self.client.remove_container(&id).await
    }

    async fn status(&self) -> Result<AgentState> {
        match self.find_managed().await {
            Ok(container) => Ok(AgentState {
                container_id: container.id.unwrap_or_default(),
                status: container.state.map(|s| s.to_string()).unwrap_or_default(),
                created: true,
            }),
            Err(err) if err.is_not_found() => Ok(AgentState::default()),
            Err(err) => Err(err),
        }
    }
}

/// Maps the launch spec onto the Docker create request.
fn create_body(spec: &RuntimeLaunchSpec) -> ContainerCreateBody {
    ContainerCreateBody {
        image: Some(spec.image.clone()),
        env: Some(spec.env.clone()),
        cmd: Some(spec.cmd.clone()),
        labels: Some(spec.labels.clone()),
        host_config: Some(HostConfig {
            network_mode: Some(spec.network_mode.clone()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Runs `op` up to `attempts` times, surfacing the last error.
async fn with_attempts<T, F, Fut>(attempts: u32, op: F) -> Result<T>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut last_err = Failure::unavailable("no attempts were made");
    for attempt in 1..=attempts {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => last_err = err,
        }
    }
    Err(last_err)
}
