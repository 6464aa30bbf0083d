//! Bounded log of graphics-API errors raised outside any error scope.
//!
//! The device's uncaptured-error handler pushes into a shared [`GpuErrorLog`].
//! Rendering never stops because of an entry here; the host reads the log as a
//! single string when it wants to show diagnostics.

use std::collections::VecDeque;
use std::sync::Mutex;

/// Entries kept before the oldest one is dropped.
pub const DEFAULT_ERROR_LOG_CAPACITY: usize = 64;

/// Thread-safe ring of error messages. The handler runs on wgpu's callback thread.
#[derive(Debug)]
pub struct GpuErrorLog {
    entries: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl GpuErrorLog {
    /// Create a log holding at most `capacity` entries (minimum 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Record an error. Logged at `warn`, oldest entry evicted when full.
    pub fn push(&self, message: impl Into<String>) {
        let message = message.into();
        log::warn!("GPU error: {message}");

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(message);
    }

    /// All entries, oldest first, one per line.
    pub fn joined(&self) -> String {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl Default for GpuErrorLog {
    fn default() -> Self {
        Self::new(DEFAULT_ERROR_LOG_CAPACITY)
    }
}
