// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0
//! The agent lifecycle state machine.
//!
//! One reconciliation pass reads the desired config and the observed
//! container state in parallel, decides on one of {remove, start, no-op},
//! and drives the runtime. Retries live in the runtime layer, not here.

use crate::domain::agent::AgentConfig;
use crate::domain::failure::Result;
use crate::domain::repository::ConfigStore;
use crate::domain::runtime::AgentRuntime;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct AgentReconciler {
    store: Arc<dyn ConfigStore>,
    runtime: Arc<dyn AgentRuntime>,
    /// Serializes passes so a timer-triggered and an API-triggered pass can
    /// never interleave remove/start against the same container identity.
    pass_lock: Mutex<()>,
}

impl AgentReconciler {
    pub fn new(store: Arc<dyn ConfigStore>, runtime: Arc<dyn AgentRuntime>) -> Self {
        Self {
            store,
            runtime,
            pass_lock: Mutex::new(()),
        }
    }

    /// Makes the managed container's existence match what the config implies.
    pub async fn reconcile(&self) -> Result<()> {
        let _pass = self.pass_lock.lock().await;

        // Fetch the current agent config and container state. First error
        // wins and cancels the sibling fetch.
        let (config, state) = tokio::try_join!(self.desired_config(), self.runtime.status())?;

        debug!(
            config_present = config.is_some(),
            enabled = config.as_ref().is_some_and(|c| c.is_enabled),
            container_created = state.created,
            container_status = %state.status,
            "reconciling agent"
        );

        let Some(config) = config.filter(|c| c.is_enabled) else {
            info!("removing agent container: no config found or agent is disabled");
            return self.runtime.remove().await;
        };

        if state.is_running() {
            debug!("agent container is running");
            return Ok(());
        }

        info!("agent container is not running, starting it");
        self.runtime.remove().await?;
        self.runtime.start(&config).await
    }

    /// A missing config is a valid empty state, not an error.
    async fn desired_config(&self) -> Result<Option<AgentConfig>> {
        match self.store.get().await {
            Ok(config) => Ok(Some(config)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{sample_config, FakeConfigStore, FakeRuntime};
    use crate::domain::agent::AgentState;
    use crate::domain::failure::Failure;
    use std::sync::atomic::Ordering;

    fn exited_state() -> AgentState {
        AgentState {
            container_id: "stale-1".into(),
            status: "exited".into(),
            created: true,
        }
    }

    #[tokio::test]
    async fn absent_config_only_removes() {
        let store = Arc::new(FakeConfigStore::default());
        let runtime = Arc::new(FakeRuntime::with_container(exited_state()));
        let reconciler = AgentReconciler::new(store, runtime.clone());

        reconciler.reconcile().await.unwrap();

        assert_eq!(runtime.calls(), vec!["status", "remove"]);
        assert!(runtime.container.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn absent_config_behaves_like_a_disabled_config() {
        let absent = Arc::new(FakeRuntime::with_container(exited_state()));
        let reconciler =
            AgentReconciler::new(Arc::new(FakeConfigStore::default()), absent.clone());
        reconciler.reconcile().await.unwrap();

        let disabled = Arc::new(FakeRuntime::with_container(exited_state()));
        let config = AgentConfig {
            is_enabled: false,
            ..sample_config()
        };
        let reconciler =
            AgentReconciler::new(Arc::new(FakeConfigStore::with_config(config)), disabled.clone());
        reconciler.reconcile().await.unwrap();

        assert_eq!(absent.calls(), disabled.calls());
    }

    #[tokio::test]
    async fn running_agent_is_left_alone() {
        let store = Arc::new(FakeConfigStore::with_config(sample_config()));
        let runtime = Arc::new(FakeRuntime::with_container(AgentState {
            container_id: "managed-1".into(),
            status: "running".into(),
            created: true,
        }));
        let reconciler = AgentReconciler::new(store, runtime.clone());

        reconciler.reconcile().await.unwrap();

        assert_eq!(runtime.calls(), vec!["status"]);
    }

    #[tokio::test]
    async fn stopped_agent_is_removed_then_started() {
        let store = Arc::new(FakeConfigStore::with_config(sample_config()));
        let runtime = Arc::new(FakeRuntime::with_container(exited_state()));
        let reconciler = AgentReconciler::new(store, runtime.clone());

        reconciler.reconcile().await.unwrap();

        assert_eq!(runtime.calls(), vec!["status", "remove", "start"]);
        let container = runtime.container.lock().unwrap().clone().unwrap();
        assert!(container.is_running());
    }

    #[tokio::test]
    async fn remove_is_idempotent_when_nothing_exists() {
        let store = Arc::new(FakeConfigStore::with_config(sample_config()));
        let runtime = Arc::new(FakeRuntime::default());
        let reconciler = AgentReconciler::new(store, runtime.clone());

        // No container at all: the pass still runs remove-then-start.
        reconciler.reconcile().await.unwrap();
        assert_eq!(runtime.calls(), vec!["status", "remove", "start"]);
    }

    #[tokio::test]
    async fn store_errors_abort_the_pass_without_mutation() {
        let store = Arc::new(FakeConfigStore::with_config(sample_config()));
        store.fail_get.store(true, Ordering::SeqCst);
        let runtime = Arc::new(FakeRuntime::with_container(exited_state()));
        let reconciler = AgentReconciler::new(store, runtime.clone());

        let err = reconciler.reconcile().await.unwrap_err();
        assert!(matches!(err, Failure::Unavailable(_)));
        assert!(!runtime.calls().contains(&"remove"));
        assert!(!runtime.calls().contains(&"start"));
    }

    #[tokio::test]
    async fn status_errors_abort_the_pass_without_mutation() {
        let store = Arc::new(FakeConfigStore::with_config(sample_config()));
        let runtime = Arc::new(FakeRuntime::default());
        runtime.fail_status.store(true, Ordering::SeqCst);
        let reconciler = AgentReconciler::new(store, runtime.clone());

        let err = reconciler.reconcile().await.unwrap_err();
        assert!(matches!(err, Failure::Unavailable(_)));
        assert!(!runtime.calls().contains(&"remove"));
        assert!(!runtime.calls().contains(&"start"));
    }

    #[tokio::test]
    async fn failed_remove_never_reaches_start() {
        let store = Arc::new(FakeConfigStore::with_config(sample_config()));
        let runtime = Arc::new(FakeRuntime::with_container(exited_state()));
        runtime.fail_remove.store(true, Ordering::SeqCst);
        let reconciler = AgentReconciler::new(store, runtime.clone());

        reconciler.reconcile().await.unwrap_err();
        assert_eq!(runtime.calls(), vec!["status", "remove"]);
    }

    #[tokio::test]
    async fn failed_start_leaves_no_container_behind() {
        let store = Arc::new(FakeConfigStore::with_config(sample_config()));
        let runtime = Arc::new(FakeRuntime::with_container(exited_state()));
        runtime.fail_start.store(true, Ordering::SeqCst);
        let reconciler = AgentReconciler::new(store, runtime.clone());

        reconciler.reconcile().await.unwrap_err();
        assert!(runtime.container.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn repeated_passes_keep_exactly_one_container() {
        let store = Arc::new(FakeConfigStore::with_config(sample_config()));
        let runtime = Arc::new(FakeRuntime::default());
        let reconciler = AgentReconciler::new(store, runtime.clone());

        for _ in 0..5 {
            reconciler.reconcile().await.unwrap();
        }

        // The FakeRuntime panics if start is ever called while a container
        // exists; reaching this point means the invariant held throughout.
        assert!(runtime.container.lock().unwrap().is_some());
        let starts = runtime.calls().iter().filter(|c| **c == "start").count();
        assert_eq!(starts, 1);
    }

    #[tokio::test]
    async fn concurrent_passes_are_serialized() {
        let store = Arc::new(FakeConfigStore::with_config(sample_config()));
        let runtime = Arc::new(FakeRuntime::default());
        runtime.status_delay_ms.store(20, Ordering::SeqCst);
        let reconciler = Arc::new(AgentReconciler::new(store, runtime.clone()));

        let first = tokio::spawn({
            let reconciler = reconciler.clone();
            async move { reconciler.reconcile().await }
        });
        let second = tokio::spawn({
            let reconciler = reconciler.clone();
            async move { reconciler.reconcile().await }
        });
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        // One pass starts the container, the other observes it running.
        // Interleaved passes would trip the FakeRuntime's start assertion.
        assert_eq!(runtime.calls(), vec!["status", "remove", "start", "status"]);
    }
}
