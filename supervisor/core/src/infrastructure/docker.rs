// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0
//! Thin capability over the Docker daemon.
//!
//! Lookups are always "search by filter", never "fetch by remembered id":
//! the managed container is identified structurally on every call.

use crate::domain::failure::{Failure, Result};
use bollard::models::{ContainerCreateBody, ContainerSummary};
use bollard::query_parameters::{
    CreateContainerOptions, CreateImageOptions, ListContainersOptions, RemoveContainerOptions,
    StartContainerOptions,
};
use bollard::Docker;
use futures::StreamExt;
use std::collections::HashMap;
use tracing::{debug, info};

pub struct DockerClient {
    docker: Docker,
}

impl std::fmt::Debug for DockerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DockerClient").finish_non_exhaustive()
    }
}

impl DockerClient {
    /// Connects to the local Docker daemon and verifies it answers a ping.
    pub async fn connect() -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()
            .map_err(|e| Failure::unavailable(format!("failed to connect to docker: {e}")))?;

        docker
            .ping()
            .await
            .map_err(|e| Failure::unavailable(format!("docker ping failed: {e}")))?;

        info!("connected to docker daemon");
        Ok(Self { docker })
    }

    pub fn with_client(docker: Docker) -> Self {
        Self { docker }
    }

    pub async fn list_containers(
        &self,
        filters: HashMap<String, Vec<String>>,
    ) -> Result<Vec<ContainerSummary>> {
        let options = ListContainersOptions {
            all: true,
            filters: Some(filters),
            ..Default::default()
        };

        self.docker
            .list_containers(Some(options))
            .await
            .map_err(|e| Failure::unavailable(format!("failed to list containers: {e}")))
    }

    /// Returns the first container matching the filters, and the predicate
    /// when one is given.
    pub async fn find_container<P>(
        &self,
        filters: HashMap<String, Vec<String>>,
        predicate: Option<P>,
    ) -> Result<ContainerSummary>
    where
        P: Fn(&ContainerSummary) -> bool,
    {
        let containers = self.list_containers(filters).await?;

        match predicate {
            None => containers
                .into_iter()
                .next()
                .ok_or_else(|| Failure::not_found("container not found")),
            Some(matches) => containers
                .into_iter()
                .find(|container| matches(container))
                .ok_or_else(|| {
                    Failure::not_found("no container found matching the specified predicate")
                }),
        }
    }

    pub async fn container_exists(&self, filters: HashMap<String, Vec<String>>) -> Result<bool> {
        match self
            .find_container(filters, None::<fn(&ContainerSummary) -> bool>)
            .await
        {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub async fn pull_image(&self, image: &str) -> Result<()> {
        let (name, tag) = parse_image_ref(image);
        info!(image = %image, "pulling image");

        let options = CreateImageOptions {
            from_image: Some(name.to_string()),
            tag: if tag.is_empty() {
                None
            } else {
                Some(tag.to_string())
            },
            ..Default::default()
        };

        let mut stream = self.docker.create_image(Some(options), None, None);
        while let Some(progress) = stream.next().await {
            let info = progress
                .map_err(|e| Failure::unavailable(format!("failed to pull image {image}: {e}")))?;
            if let Some(status) = info.status {
                debug!(status = %status, "pull progress");
            }
        }

        Ok(())
    }

    /// Creates and starts a container in one step, returning its ID.
    pub async fn run(&self, name: &str, body: ContainerCreateBody) -> Result<String> {
        let options = CreateContainerOptions {
            name: Some(name.to_string()),
            platform: String::new(),
        };

        let created = self
            .docker
            .create_container(Some(options), body)
            .await
            .map_err(|e| Failure::unavailable(format!("failed to create container: {e}")))?;

        self.docker
            .start_container(&created.id, None::<StartContainerOptions>)
            .await
            .map_err(|e| Failure::unavailable(format!("failed to start container: {e}")))?;

        Ok(created.id)
    }

    /// Force-removes a container, running or not.
    pub async fn remove_container(&self, id: &str) -> Result<()> {
        let options = RemoveContainerOptions {
            force: true,
            ..Default::default()
        };

        self.docker
            .remove_container(id, Some(options))
            .await
            .map_err(|e| Failure::unavailable(format!("failed to remove container {id}: {e}")))
    }
}

/// Splits an image reference into name and tag. A `:` followed by a `/`
/// belongs to a registry port, not a tag.
fn parse_image_ref(image: &str) -> (&str, &str) {
    if image.contains('@') {
        return (image, "");
    }

    if let Some((name, tag)) = image.rsplit_once(':') {
        if !tag.contains('/') {
            return (name, tag);
        }
    }

    (image, "latest")
}
