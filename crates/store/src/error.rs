// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds for the durable log.

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("storage I/O error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("event payload is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<jc_core::ArgumentError> for StoreError {
    fn from(err: jc_core::ArgumentError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
