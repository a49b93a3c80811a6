// Copyright (c) 2026 Sentinel Labs
// SPDX-License-Identifier: AGPL-3.0
//! Error taxonomy shared by every layer.
//!
//! `NotFound` is frequently a valid "empty" state rather than a failure:
//! callers that treat it as such must check `is_not_found` before
//! propagating.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Failure {
    /// Config or container absent. Often absorbed, not propagated.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input fails local validation.
    #[error("invalid: {0}")]
    Invalid(String),

    /// Input references a container that does not exist or is not running.
    #[error("unprocessable: {0}")]
    Unprocessable(String),

    /// Credentials rejected by the user directory.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Store or runtime call failed for infrastructure reasons.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl Failure {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::Unprocessable(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Failure>;
