// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0
//! Sentinel supervisor core.
//!
//! Persists a single agent configuration and reconciles it against the live
//! state of the Docker runtime, starting or removing one managed container
//! as needed.
//!
//! # Architecture
//!
//! - `domain` — models, error taxonomy, and collaborator contracts
//! - `application` — reconciler, consistency guard, and config services
//! - `infrastructure` — Docker, HTTP, and storage implementations
//! - `presentation` — the HTTP API shell

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
