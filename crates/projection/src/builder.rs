// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The projection contract: a pure fold from `(state, event)` to `state`.
//!
//! `apply` is an exhaustive match over [`jc_core::Event`]'s tag rather than
//! one override per event type — the compiler enforces coverage whenever a
//! new variant is added, instead of a base class silently falling back to a
//! no-op default.

use crate::error::ProjectionError;
use jc_core::EventRecord;

pub trait Builder {
    type State: Clone;

    fn initial_state(&self) -> Self::State;

    /// Folds one committed record onto `state`, returning the new state.
    /// Never mutates `state` in place. Takes the full [`EventRecord`], not
    /// just its payload, since some projections (the mailbox) correlate on
    /// the envelope's `event_id`/`timestamp` rather than anything carried
    /// in the event data. `Event::Custom` always fails: the closed
    /// taxonomy has no legitimate unknown-tag event, so reaching this arm
    /// means a payload from a newer schema was replayed against this
    /// binary.
    fn apply(&self, state: Self::State, record: &EventRecord) -> Result<Self::State, ProjectionError>;
}
