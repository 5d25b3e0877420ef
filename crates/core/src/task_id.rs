// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validation for external task-tracker ids, e.g. `PROJ-123`.
//!
//! This is the only boundary where user-supplied text is allowed anywhere
//! near a subprocess argument vector, so the check runs before anything
//! else touches the value.

use crate::error::ArgumentError;
use regex::Regex;
use std::sync::LazyLock;

static TASK_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Za-z]{2,5}-[A-Za-z0-9]+$").expect("constant regex pattern is valid")
});

/// Validates a task-tracker id against `^[A-Za-z]{2,5}-[A-Za-z0-9]+$` (case-insensitive).
///
/// Returns the id unchanged on success so call sites can chain this into
/// argument-vector construction without a second binding.
pub fn validate_task_id(id: &str) -> Result<&str, ArgumentError> {
    if TASK_ID_PATTERN.is_match(id) {
        Ok(id)
    } else {
        Err(ArgumentError::InvalidTaskId { id: id.to_string() })
    }
}
