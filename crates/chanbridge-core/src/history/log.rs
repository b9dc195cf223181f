//! Fixed-capacity history log with stable, ever-increasing indices.
//!
//! Every appended record gets the next index (starting at 0). Once the log
//! is full, each append evicts the oldest record and the window slides
//! forward by one. Queries address the logical index space, so an index
//! handed to a client stays meaningful after eviction: asking for evicted
//! history silently returns whatever is still held.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chanbridge_types::record::{HistoryWindow, LogRecord};
use chrono::Utc;

/// Bounded history of channel lines, safe to share between threads.
///
/// A single mutex covers both `append` and `query`, so a query always sees
/// one consistent window: no duplicated or skipped records even while the
/// event task is appending and evicting concurrently.
pub struct BoundedIndexedLog {
    capacity: usize,
    inner: Mutex<LogInner>,
}

struct LogInner {
    records: VecDeque<LogRecord>,
    /// Index of `records[0]`.
    base_index: u64,
}

impl LogInner {
    fn next_index(&self) -> u64 {
        self.base_index + self.records.len() as u64
    }
}

impl BoundedIndexedLog {
    /// Create an empty log holding at most `capacity` records.
    ///
    /// A capacity of 0 is raised to 1; configuration validation rejects it
    /// before it gets here.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: Mutex::new(LogInner {
                records: VecDeque::with_capacity(capacity),
                base_index: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LogInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a record and return the index it was assigned.
    pub fn append(&self, author: impl Into<String>, text: impl Into<String>) -> u64 {
        let mut inner = self.lock();
        let index = inner.next_index();
        if inner.records.len() == self.capacity {
            inner.records.pop_front();
            inner.base_index += 1;
        }
        inner.records.push_back(LogRecord {
            index,
            author: author.into(),
            text: text.into(),
            received_at: Utc::now(),
        });
        index
    }

    /// Records with index in `[start, end)`, oldest first.
    ///
    /// `None` means "from the oldest held" / "through the newest held".
    /// Bounds outside the held window are clamped into it rather than
    /// rejected, and an empty or reversed range yields no records.
    pub fn query(&self, start: Option<u64>, end: Option<u64>) -> Vec<LogRecord> {
        let inner = self.lock();
        let lower = inner.base_index;
        let upper = inner.next_index();

        let start = start.unwrap_or(lower).clamp(lower, upper);
        let end = end.unwrap_or(upper).clamp(lower, upper);
        if start >= end {
            return Vec::new();
        }

        let from = (start - lower) as usize;
        let to = (end - lower) as usize;
        inner.records.range(from..to).cloned().collect()
    }

    /// Snapshot of the current window bookkeeping.
    pub fn window(&self) -> HistoryWindow {
        let inner = self.lock();
        HistoryWindow {
            base_index: inner.base_index,
            len: inner.records.len(),
            capacity: self.capacity,
            next_index: inner.next_index(),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Index of the oldest record still held (0 until eviction starts).
    pub fn base_index(&self) -> u64 {
        self.lock().base_index
    }

    /// Index the next appended record will receive.
    pub fn next_index(&self) -> u64 {
        self.lock().next_index()
    }
}

impl std::fmt::Debug for BoundedIndexedLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let window = self.window();
        f.debug_struct("BoundedIndexedLog")
            .field("capacity", &window.capacity)
            .field("base_index", &window.base_index)
            .field("len", &window.len)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
