// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jc-projection: the `Builder` contract and the concrete projections
//! folded over a [`jc_store::EventStore`]'s event log.

pub mod builder;
pub mod error;
pub mod mailbox;
pub mod notes;
pub mod rebuild;
pub mod workflow;

#[cfg(test)]
mod test_support;

pub use builder::Builder;
pub use error::ProjectionError;
pub use mailbox::{ConversationMessage, InboxMessage, MailboxBuilder, MailboxState, OutboxMessage};
pub use notes::{Note, NotesBuilder, NotesState};
pub use rebuild::{rebuild_projection, RebuildError};
pub use workflow::{Feature, FeatureStatus, Phase, WorkflowBuilder, WorkflowState};
