// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors raised while folding events through a [`crate::Builder`].

#[derive(Debug, Clone, thiserror::Error)]
pub enum ProjectionError {
    #[error("unknown event type: {0}")]
    UnknownEventType(String),
}
