//! Progress reporting for copies.
//!
//! A copy does not move bytes through the client, so progress is measured in
//! abstract units: every copy is worth [`TOTAL_PROGRESS_UNITS`], split evenly
//! across its parts.

use std::fmt;
use std::sync::Arc;

use crate::error::CopyError;

/// Units a finished copy adds up to.
pub const TOTAL_PROGRESS_UNITS: u64 = 10_000;

/// Point-in-time view of a copy's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSnapshot {
    transferred_units: u64,
    total_units: u64,
}

impl ProgressSnapshot {
    /// Units done so far.
    #[must_use]
    pub fn transferred_units(&self) -> u64 {
        self.transferred_units
    }

    /// Units of the whole copy.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        self.total_units
    }

    /// Units still outstanding.
    #[must_use]
    pub fn remaining_units(&self) -> u64 {
        self.total_units - self.transferred_units
    }

    /// Fraction done, from `0.0` to `1.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio_transferred(&self) -> f64 {
        self.transferred_units as f64 / self.total_units as f64
    }
}

/// Receives progress events of a copy.
///
/// All methods default to doing nothing. They are called from the task
/// driving the copy and should return quickly.
pub trait TransferListener: Send + Sync {
    /// The copy has started.
    fn transfer_initiated(&self, _snapshot: ProgressSnapshot) {}

    /// Some units finished.
    fn bytes_transferred(&self, _snapshot: ProgressSnapshot) {}

    /// The copy succeeded.
    fn transfer_complete(&self, _snapshot: ProgressSnapshot) {}

    /// The copy failed.
    fn transfer_failed(&self, _snapshot: ProgressSnapshot, _error: &CopyError) {}
}

/// Fans progress out to listeners and keeps the running total.
pub(crate) struct ProgressUpdater {
    listeners: Vec<Arc<dyn TransferListener>>,
    transferred: u64,
}

impl ProgressUpdater {
    pub(crate) fn new(listeners: Vec<Arc<dyn TransferListener>>) -> Self {
        Self {
            listeners,
            transferred: 0,
        }
    }

    fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            transferred_units: self.transferred,
            total_units: TOTAL_PROGRESS_UNITS,
        }
    }

    pub(crate) fn initiated(&self) {
        let snapshot = self.snapshot();
        for listener in &self.listeners {
            listener.transfer_initiated(snapshot);
        }
    }

    pub(crate) fn advance(&mut self, units: u64) {
        self.transferred = (self.transferred + units).min(TOTAL_PROGRESS_UNITS);
        let snapshot = self.snapshot();
        for listener in &self.listeners {
            listener.bytes_transferred(snapshot);
        }
    }

    pub(crate) fn complete(&self) {
        let snapshot = self.snapshot();
        for listener in &self.listeners {
            listener.transfer_complete(snapshot);
        }
    }

    pub(crate) fn failed(&self, error: &CopyError) {
        let snapshot = self.snapshot();
        for listener in &self.listeners {
            listener.transfer_failed(snapshot, error);
        }
    }
}

impl fmt::Debug for ProgressUpdater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressUpdater")
            .field("listeners", &self.listeners.len())
            .field("transferred", &self.transferred)
            .finish()
    }
}

/// Hands out per-part units so that the last completion makes the sum exact.
#[derive(Debug)]
pub(crate) struct PartProgress {
    count: u64,
    completed: u64,
    per_part: u64,
}

impl PartProgress {
    pub(crate) fn new(count: u64) -> Self {
        let count = count.max(1);
        Self {
            count,
            completed: 0,
            per_part: TOTAL_PROGRESS_UNITS / count,
        }
    }

    pub(crate) fn next_units(&mut self) -> u64 {
        self.completed += 1;
        if self.completed == self.count {
            TOTAL_PROGRESS_UNITS - self.per_part * (self.count - 1)
        } else {
            self.per_part
        }
    }
}
