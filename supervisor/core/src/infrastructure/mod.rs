// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0

pub mod agent_runtime;
pub mod analytics;
pub mod container_oracle;
pub mod docker;
pub mod repositories;
pub mod user_directory;
