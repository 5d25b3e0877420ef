// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error kinds raised while validating caller input, before any I/O.

/// A value failed a pre-I/O validation rule.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ArgumentError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("invalid task id {id:?}: must match ^[A-Za-z]{{2,5}}-[A-Za-z0-9]+$")]
    InvalidTaskId { id: String },
}

impl ArgumentError {
    pub fn empty(field: &'static str) -> Self {
        Self::Empty { field }
    }
}

/// Rejects an empty (after trimming) string for `field`.
pub fn require_non_empty<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ArgumentError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ArgumentError::empty(field))
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_non_empty_rejects_blank() {
        assert!(require_non_empty("workflow_id", "   ").is_err());
    }

    #[test]
    fn require_non_empty_trims_and_accepts() {
        assert_eq!(require_non_empty("workflow_id", " w1 ").unwrap(), "w1");
    }
}
