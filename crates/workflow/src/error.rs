// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds for the workflow façade and the agent-executor boundary.

use jc_projection::{ProjectionError, RebuildError};
use jc_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("invalid phase transition: {from} -> {to}")]
    InvalidPhaseTransition { from: String, to: String },

    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    #[error("feature not planned: {0}")]
    FeatureNotPlanned(String),

    #[error("invalid task id: {0}")]
    InvalidTaskId(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),
}

impl From<jc_core::ArgumentError> for WorkflowError {
    fn from(err: jc_core::ArgumentError) -> Self {
        Self::InvalidTaskId(err.to_string())
    }
}

impl From<RebuildError> for WorkflowError {
    fn from(err: RebuildError) -> Self {
        match err {
            RebuildError::Store(err) => Self::Store(err),
            RebuildError::Projection(err) => Self::Projection(err),
            RebuildError::CorruptSnapshot(err) => Self::Store(StoreError::Serialization(err)),
        }
    }
}

/// Category an agent-executor collaborator reports on its result. Drives
/// the retry/backoff loop in [`crate::executor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryCode {
    None,
    ClaudeCodeError,
    Timeout,
    ExecutionError,
    ErrorDuringExecution,
}

impl RetryCode {
    pub fn is_retryable(self) -> bool {
        self != RetryCode::None
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("executor reported a Claude Code error: {0}")]
    ClaudeCodeError(String),

    #[error("executor timed out")]
    Timeout,

    #[error("executor failed: {0}")]
    ExecutionError(String),

    #[error("error during execution: {0}")]
    ErrorDuringExecution(String),

    #[error("executor exhausted all retries: {0}")]
    RetriesExhausted(String),

    #[error("transport error: {0}")]
    Transport(#[from] Box<dyn std::error::Error + Send + Sync>),
}
