// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0

pub mod agent;
pub mod container;
pub mod event;
pub mod failure;
pub mod repository;
pub mod runtime;
pub mod user;
