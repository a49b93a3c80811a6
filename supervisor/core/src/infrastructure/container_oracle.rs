// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0

use crate::domain::container::{ContainerOracle, ContainerStatus};
use crate::domain::failure::Result;
use crate::infrastructure::docker::DockerClient;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Answers existence checks for externally-owned containers via the Docker
/// list API.
pub struct DockerContainerOracle {
    client: Arc<DockerClient>,
}

impl DockerContainerOracle {
    pub fn new(client: Arc<DockerClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ContainerOracle for DockerContainerOracle {
    async fn exists(&self, id: &str, required_status: Option<ContainerStatus>) -> Result<bool> {
        let mut filters = HashMap::from([("id".to_string(), vec![id.to_string()])]);
        if let Some(status) = required_status {
            filters.insert("status".to_string(), vec![status.as_str().to_string()]);
        }

        self.client.container_exists(filters).await
    }
}
