// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0

pub mod api;
