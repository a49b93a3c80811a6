// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0
//! In-memory collaborator doubles shared by the application-layer tests.

use crate::domain::agent::{AgentConfig, AgentState};
use crate::domain::container::{ContainerOracle, ContainerStatus};
use crate::domain::event::{AnalyticsSink, AuditEvent};
use crate::domain::failure::{Failure, Result};
use crate::domain::repository::ConfigStore;
use crate::domain::runtime::AgentRuntime;
use crate::domain::user::{Credentials, User, UserDirectory};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn sample_config() -> AgentConfig {
    AgentConfig {
        api_key: "key".into(),
        api_secret: "secret".into(),
        project_name: "storefront".into(),
        target_port: None,
        target_container: None,
        is_enabled: true,
        is_demo_mode_enabled: false,
    }
}

/// Config store double. `fail_get`/`fail_save` simulate an unreachable
/// backend.
#[derive(Default)]
pub struct FakeConfigStore {
    pub config: Mutex<Option<AgentConfig>>,
    pub fail_get: AtomicBool,
    pub fail_save: AtomicBool,
    pub save_count: AtomicUsize,
}

impl FakeConfigStore {
    pub fn with_config(config: AgentConfig) -> Self {
        Self {
            config: Mutex::new(Some(config)),
            ..Self::default()
        }
    }

    pub fn stored(&self) -> Option<AgentConfig> {
        self.config.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfigStore for FakeConfigStore {
    async fn get(&self) -> Result<AgentConfig> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(Failure::unavailable("config store is down"));
        }
        self.config
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Failure::not_found("agent config not found"))
    }

    async fn save(&self, config: &AgentConfig) -> Result<()> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(Failure::unavailable("config store is down"));
        }
        self.save_count.fetch_add(1, Ordering::SeqCst);
        *self.config.lock().unwrap() = Some(config.clone());
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        self.config.lock().unwrap().take();
        Ok(())
    }
}

/// Runtime double that simulates the single managed container and records
/// every call in order.
#[derive(Default)]
pub struct FakeRuntime {
    pub calls: Mutex<Vec<&'static str>>,
    pub container: Mutex<Option<AgentState>>,
    pub fail_status: AtomicBool,
    pub fail_remove: AtomicBool,
    pub fail_start: AtomicBool,
    /// Artificial delay inside `status`, for interleaving tests.
    pub status_delay_ms: AtomicUsize,
}

impl FakeRuntime {
    pub fn with_container(state: AgentState) -> Self {
        Self {
            container: Mutex::new(Some(state)),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AgentRuntime for FakeRuntime {
    async fn start(&self, _config: &AgentConfig) -> Result<()> {
        self.record("start");
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(Failure::unavailable("failed to start container"));
        }
        let mut container = self.container.lock().unwrap();
        assert!(
            container.is_none(),
            "start called while a managed container already exists"
        );
        *container = Some(AgentState {
            container_id: "managed-1".into(),
            status: "running".into(),
            created: true,
        });
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        self.record("remove");
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(Failure::unavailable("failed to remove container"));
        }
        self.container.lock().unwrap().take();
        Ok(())
    }

    async fn status(&self) -> Result<AgentState> {
        self.record("status");
        let delay = self.status_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay as u64)).await;
        }
        if self.fail_status.load(Ordering::SeqCst) {
            return Err(Failure::unavailable("docker is down"));
        }
        Ok(self
            .container
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_default())
    }
}

/// Oracle double: a container "exists and is running" iff its ID is in
/// `running`.
#[derive(Default)]
pub struct FakeOracle {
    pub running: Mutex<Vec<String>>,
    pub fail: AtomicBool,
    pub query_count: AtomicUsize,
}

impl FakeOracle {
    pub fn with_running(ids: &[&str]) -> Self {
        Self {
            running: Mutex::new(ids.iter().map(ToString::to_string).collect()),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ContainerOracle for FakeOracle {
    async fn exists(&self, id: &str, _required_status: Option<ContainerStatus>) -> Result<bool> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(Failure::unavailable("docker is down"));
        }
        Ok(self.running.lock().unwrap().iter().any(|r| r == id))
    }
}

/// User directory double rejecting everything except `key`/`secret`.
#[derive(Default)]
pub struct FakeUserDirectory {
    pub fail: AtomicBool,
}

#[async_trait]
impl UserDirectory for FakeUserDirectory {
    async fn get_user(&self, credentials: &Credentials) -> Result<User> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Failure::unavailable("user directory is down"));
        }
        if credentials.api_key != "key" || credentials.api_secret != "secret" {
            return Err(Failure::unauthorized(
                "no user found with the given api credentials",
            ));
        }
        Ok(User {
            organization_id: "org-1".into(),
            name: "Sam Doe".into(),
            email: "sam@example.com".into(),
            created_at: chrono::Utc::now(),
        })
    }
}

/// Analytics sink double recording emitted events.
#[derive(Default)]
pub struct FakeSink {
    pub events: Mutex<Vec<AuditEvent>>,
    pub fail: AtomicBool,
}

impl FakeSink {
    pub fn emitted(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait]
impl AnalyticsSink for FakeSink {
    async fn emit(&self, event: AuditEvent) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Failure::unavailable("analytics endpoint is down"));
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}
