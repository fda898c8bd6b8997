//! Shared status records behind a single lock.

use hdwatch_types::{DiagnosticArray, DiagnosticStatus, Level};
use parking_lot::Mutex;
use tokio::time::Instant;

use crate::aspect::NO_DATA;
use crate::staleness::{overlay, StalenessPolicy};

/// The latest complete poll result of one aspect.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusRecord {
    pub status: DiagnosticStatus,
    /// Completion time of the last poll; `None` until the first one lands.
    pub last_update: Option<Instant>,
}

impl StatusRecord {
    /// Initial record: `Error` / "No Data", never updated.
    pub fn no_data(name: &str) -> Self {
        Self {
            status: DiagnosticStatus::new(name, Level::Error, NO_DATA),
            last_update: None,
        }
    }
}

/// Index of a registered record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot(usize);

/// Every aspect's record, serialized through one mutex.
///
/// Pollers compute their status off-lock and only take the lock to swap the
/// finished record in; the publisher takes it once to read all records.
#[derive(Debug, Default)]
pub struct SharedState {
    records: Mutex<Vec<StatusRecord>>,
}

impl SharedState {
    /// Register a record for an aspect and return its slot.
    pub fn register(&self, name: &str) -> Slot {
        let mut records = self.records.lock();
        records.push(StatusRecord::no_data(name));
        Slot(records.len() - 1)
    }

    /// Replace the whole record in `slot`.
    pub fn store(&self, slot: Slot, status: DiagnosticStatus, completed_at: Instant) {
        let mut records = self.records.lock();
        if let Some(record) = records.get_mut(slot.0) {
            *record = StatusRecord {
                status,
                last_update: Some(completed_at),
            };
        }
    }

    /// Copy of the stored record in `slot`.
    pub fn record(&self, slot: Slot) -> Option<StatusRecord> {
        self.records.lock().get(slot.0).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Build the aggregate message, overlaying staleness as of `now`.
    ///
    /// All records are read under one lock acquisition so the message is a
    /// consistent joint view.
    pub fn collect(&self, now: Instant, policy: &StalenessPolicy) -> DiagnosticArray {
        let records = self.records.lock();

        let mut message = DiagnosticArray::builder();
        for record in records.iter() {
            message = message.status(overlay(record, now, policy));
        }

        message.build()
    }
}
