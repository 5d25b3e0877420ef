// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The append-only, crash-durable event log.
//!
//! Backed by SQLite through `rusqlite` with two tables (`events`,
//! `snapshots`). A single `Mutex<Connection>` serializes every write, and
//! readers go through the same mutex-guarded connection — matching the
//! single-process/single-writer model this runtime assumes.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use jc_core::error::require_non_empty;
use jc_core::{Clock, Event, EventRecord, Snapshot, SystemClock, WorkflowId};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Sort order for [`EventStore::get_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOrder {
    Asc,
    Desc,
}

/// Opaque handle returned by [`EventStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn Fn(&EventRecord) + Send + Sync>;

/// After how many committed events per workflow an auto-snapshot is taken.
const AUTO_SNAPSHOT_INTERVAL: i64 = 100;

pub struct EventStore<C: Clock = SystemClock> {
    conn: Mutex<Connection>,
    clock: C,
    subscribers: Mutex<Vec<(u64, Subscriber)>>,
    next_subscription_id: AtomicU64,
}

impl EventStore<SystemClock> {
    /// Opens (creating if absent) the SQLite-backed log at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with_clock(path, SystemClock)
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::open_in_memory_with_clock(SystemClock)
    }
}

impl<C: Clock> EventStore<C> {
    pub fn open_with_clock(path: impl AsRef<Path>, clock: C) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn, clock)
    }

    #[cfg(any(test, feature = "test-support"))]
    pub fn open_in_memory_with_clock(clock: C) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn, clock)
    }

    fn from_connection(conn: Connection, clock: C) -> Result<Self, StoreError> {
        configure(&conn)?;
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            clock,
            subscribers: Mutex::new(Vec::new()),
            next_subscription_id: AtomicU64::new(1),
        })
    }

    fn timestamp(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.clock.epoch_ms() as i64).unwrap_or_else(Utc::now)
    }

    /// Validates, assigns a sequence number, and durably persists one
    /// event. Returns the committed record; any failure (validation,
    /// serialization, I/O) returns `Err` and leaves the log unchanged.
    pub fn append(&self, workflow_id: &WorkflowId, data: Event) -> Result<EventRecord, StoreError> {
        let workflow_id_str = require_non_empty("workflow_id", workflow_id.as_str())?.to_string();
        if data.is_custom() {
            return Err(StoreError::InvalidArgument(
                "cannot append an event of unknown type".to_string(),
            ));
        }
        let payload = serde_json::to_string(&data)?;
        let event_id = uuid::Uuid::new_v4();
        let timestamp = self.timestamp();

        let record = {
            let conn = self.conn.lock();
            conn.execute(
                "INSERT INTO events (event_id, workflow_id, event_type, timestamp, data) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    event_id.to_string(),
                    workflow_id_str,
                    data.event_type(),
                    timestamp.to_rfc3339(),
                    payload,
                ],
            )?;
            let sequence_number = conn.last_insert_rowid();
            let record = EventRecord {
                sequence_number,
                event_id,
                workflow_id: workflow_id.clone(),
                timestamp,
                data,
            };
            maybe_auto_snapshot(&conn, &workflow_id_str, sequence_number);
            record
        };

        tracing::debug!(event = %record.data.log_summary(), seq = record.sequence_number, "event appended");
        self.notify(&record);
        Ok(record)
    }

    /// All-or-nothing variant of [`Self::append`]. A single transaction;
    /// if any event fails validation the whole batch is rejected.
    pub fn append_batch(
        &self,
        workflow_id: &WorkflowId,
        events: Vec<Event>,
    ) -> Result<Vec<EventRecord>, StoreError> {
        let workflow_id_str = require_non_empty("workflow_id", workflow_id.as_str())?.to_string();
        for event in &events {
            if event.is_custom() {
                return Err(StoreError::InvalidArgument(
                    "cannot append an event of unknown type".to_string(),
                ));
            }
        }

        let records = {
            let mut conn = self.conn.lock();
            let tx = conn.transaction()?;
            let mut records = Vec::with_capacity(events.len());
            let mut last_seq = 0;
            for data in events {
                let payload = serde_json::to_string(&data)?;
                let event_id = uuid::Uuid::new_v4();
                let timestamp = self.timestamp();
                tx.execute(
                    "INSERT INTO events (event_id, workflow_id, event_type, timestamp, data) \
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        event_id.to_string(),
                        workflow_id_str,
                        data.event_type(),
                        timestamp.to_rfc3339(),
                        payload,
                    ],
                )?;
                let sequence_number = tx.last_insert_rowid();
                last_seq = sequence_number;
                records.push(EventRecord {
                    sequence_number,
                    event_id,
                    workflow_id: workflow_id.clone(),
                    timestamp,
                    data,
                });
            }
            if !records.is_empty() {
                maybe_auto_snapshot(&tx, &workflow_id_str, last_seq);
            }
            tx.commit()?;
            records
        };

        for record in &records {
            self.notify(record);
        }
        Ok(records)
    }

    /// Returns committed events for `workflow_id`, optionally filtered by
    /// `event_type`, ordered by `(timestamp, sequence_number)`.
    pub fn get_events(
        &self,
        workflow_id: &WorkflowId,
        event_type: Option<&str>,
        order: EventOrder,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<EventRecord>, StoreError> {
        let workflow_id_str = require_non_empty("workflow_id", workflow_id.as_str())?.to_string();
        let direction = match order {
            EventOrder::Asc => "ASC",
            EventOrder::Desc => "DESC",
        };
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT sequence_number, event_id, workflow_id, timestamp, data FROM events \
             WHERE workflow_id = ?1 AND (?2 IS NULL OR event_type = ?2) \
             ORDER BY timestamp {direction}, sequence_number {direction} \
             LIMIT ?3 OFFSET ?4"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                workflow_id_str,
                event_type,
                limit.unwrap_or(i64::MAX),
                offset.unwrap_or(0),
            ],
            row_to_record,
        )?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Upserts the latest snapshot for `snapshot.workflow_id`.
    pub fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if snapshot.sequence_number < 0 {
            return Err(StoreError::InvalidArgument(
                "snapshot sequence_number must be non-negative".to_string(),
            ));
        }
        let state = serde_json::to_string(&snapshot.state)?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO snapshots (workflow_id, sequence_number, state, created_at) \
             VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(workflow_id) DO UPDATE SET \
               sequence_number = excluded.sequence_number, \
               state = excluded.state, \
               created_at = excluded.created_at",
            params![
                snapshot.workflow_id.as_str(),
                snapshot.sequence_number,
                state,
                snapshot.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Returns the single latest snapshot for `workflow_id`, or `None` if
    /// absent or corrupted (corruption is logged, not surfaced).
    pub fn get_snapshot(&self, workflow_id: &WorkflowId) -> Result<Option<Snapshot>, StoreError> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                "SELECT workflow_id, sequence_number, state, created_at FROM snapshots \
                 WHERE workflow_id = ?1",
                params![workflow_id.as_str()],
                row_to_snapshot,
            )
            .optional()?;
        match row {
            Some(Ok(snapshot)) => Ok(Some(snapshot)),
            Some(Err(err)) => {
                tracing::warn!(%workflow_id, error = %err, "discarding corrupted snapshot");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Registers `callback` to be invoked, in commit order, for every
    /// event successfully appended to this store from now on.
    pub fn subscribe(&self, callback: impl Fn(&EventRecord) + Send + Sync + 'static) -> SubscriptionId {
        let id = self.next_subscription_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.lock().push((id, Box::new(callback)));
        SubscriptionId(id)
    }

    /// Idempotent: returns whether a subscription with this id existed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscribers.lock();
        let before = subs.len();
        subs.retain(|(sub_id, _)| *sub_id != id.0);
        subs.len() != before
    }

    fn notify(&self, record: &EventRecord) {
        let subs = self.subscribers.lock();
        for (id, callback) in subs.iter() {
            if catch_unwind(AssertUnwindSafe(|| callback(record))).is_err() {
                tracing::warn!(subscription_id = id, "subscriber callback panicked; isolated");
            }
        }
    }
}

fn configure(conn: &Connection) -> Result<(), StoreError> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "busy_timeout", 30_000)?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}

fn migrate(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS events (
            sequence_number INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id        TEXT NOT NULL UNIQUE,
            workflow_id     TEXT NOT NULL,
            event_type      TEXT NOT NULL,
            timestamp       TEXT NOT NULL,
            data            TEXT NOT NULL
         );
         CREATE INDEX IF NOT EXISTS idx_events_workflow_id ON events(workflow_id);
         CREATE INDEX IF NOT EXISTS idx_events_event_type ON events(event_type);
         CREATE INDEX IF NOT EXISTS idx_events_timestamp ON events(timestamp);

         CREATE TABLE IF NOT EXISTS snapshots (
            workflow_id     TEXT PRIMARY KEY,
            sequence_number INTEGER NOT NULL,
            state           TEXT NOT NULL,
            created_at      TEXT NOT NULL
         );",
    )?;
    Ok(())
}

/// Swallowed (logged) on failure — never fails the `append` it rides on.
fn maybe_auto_snapshot(conn: &Connection, workflow_id: &str, last_event_sequence: i64) {
    let count: Result<i64, _> = conn.query_row(
        "SELECT COUNT(*) FROM events WHERE workflow_id = ?1",
        params![workflow_id],
        |row| row.get(0),
    );
    let count = match count {
        Ok(count) => count,
        Err(err) => {
            tracing::warn!(workflow_id, error = %err, "auto-snapshot count query failed");
            return;
        }
    };
    if count <= 0 || count % AUTO_SNAPSHOT_INTERVAL != 0 {
        return;
    }
    let state = serde_json::json!({
        "kind": "auto",
        "total_events": count,
        "last_event_sequence": last_event_sequence,
    });
    let Ok(state_text) = serde_json::to_string(&state) else {
        tracing::warn!(workflow_id, "auto-snapshot serialization failed");
        return;
    };
    let result = conn.execute(
        "INSERT INTO snapshots (workflow_id, sequence_number, state, created_at) \
         VALUES (?1, ?2, ?3, ?4) \
         ON CONFLICT(workflow_id) DO UPDATE SET \
           sequence_number = excluded.sequence_number, \
           state = excluded.state, \
           created_at = excluded.created_at",
        params![
            workflow_id,
            last_event_sequence,
            state_text,
            Utc::now().to_rfc3339(),
        ],
    );
    if let Err(err) = result {
        tracing::warn!(workflow_id, error = %err, "auto-snapshot write failed");
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRecord> {
    let event_id: String = row.get(1)?;
    let workflow_id: String = row.get(2)?;
    let timestamp: String = row.get(3)?;
    let data: String = row.get(4)?;
    Ok(EventRecord {
        sequence_number: row.get(0)?,
        event_id: event_id.parse().unwrap_or_default(),
        workflow_id: WorkflowId::new(workflow_id),
        timestamp: DateTime::parse_from_rfc3339(&timestamp)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
        data: serde_json::from_str(&data).unwrap_or(Event::Custom),
    })
}

fn row_to_snapshot(row: &rusqlite::Row<'_>) -> rusqlite::Result<Result<Snapshot, String>> {
    let workflow_id: String = row.get(0)?;
    let sequence_number: i64 = row.get(1)?;
    let state: String = row.get(2)?;
    let created_at: String = row.get(3)?;
    let parsed = (|| -> Result<Snapshot, String> {
        Ok(Snapshot {
            workflow_id: WorkflowId::new(workflow_id),
            sequence_number,
            state: serde_json::from_str(&state).map_err(|e| e.to_string())?,
            created_at: DateTime::parse_from_rfc3339(&created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| e.to_string())?,
        })
    })();
    Ok(parsed)
}

#[cfg(test)]
#[path = "event_store_tests.rs"]
mod tests;
