// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0

pub mod config_guard;
pub mod config_service;
pub mod reconciler;

#[cfg(test)]
pub(crate) mod testing;
