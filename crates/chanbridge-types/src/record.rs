//! Channel history record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One line of channel history.
///
/// The `index` is assigned by the history log at append time and is never
/// reused, so clients can treat it as a stable handle even after the record
/// has been evicted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub index: u64,
    /// Display label of the sender (`"pm: nick"` for private messages).
    pub author: String,
    pub text: String,
    pub received_at: DateTime<Utc>,
}

/// Snapshot of the history log's bookkeeping.
///
/// Held records are exactly those with index in
/// `[base_index, base_index + len)`, and `next_index == base_index + len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryWindow {
    /// Index of the oldest record still held.
    pub base_index: u64,
    /// Number of records held.
    pub len: usize,
    /// Maximum number of records held before eviction starts.
    pub capacity: usize,
    /// Index the next appended record will receive.
    pub next_index: u64,
}

impl HistoryWindow {
    /// Start index that covers the newest `count` records still held.
    pub fn start_for_last(&self, count: u64) -> u64 {
        self.next_index.saturating_sub(count).max(self.base_index)
    }
}
