// Bounded, ascending-by-timestamp series with FIFO eviction.

use std::collections::VecDeque;

use super::HistoryError;
use crate::models::{HistoryPeriod, Timestamped};

#[derive(Debug, Clone)]
pub struct Series<T> {
    entries: VecDeque<T>,
    max_entries: usize,
}

impl<T: Timestamped + Clone> Series<T> {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
        }
    }

    /// Build from loaded entries: sorted by timestamp, newest `max_entries` kept.
    pub fn from_entries(mut entries: Vec<T>, max_entries: usize) -> Self {
        entries.sort_by_key(|e| e.timestamp());
        let excess = entries.len().saturating_sub(max_entries);
        entries.drain(..excess);
        Self {
            entries: entries.into(),
            max_entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_timestamp(&self) -> Option<u64> {
        self.entries.back().map(Timestamped::timestamp)
    }

    /// Append, then evict from the front down to `max_entries`. Returns how many were evicted.
    pub fn push(&mut self, entry: T) -> Result<usize, HistoryError> {
        if let Some(last) = self.last_timestamp()
            && entry.timestamp() < last
        {
            return Err(HistoryError::OutOfOrder {
                timestamp: entry.timestamp(),
                last,
            });
        }
        self.entries.push_back(entry);
        let mut evicted = 0;
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
            evicted += 1;
        }
        Ok(evicted)
    }

    /// Entries with `now - timestamp < period`, oldest first.
    pub fn since(&self, period: HistoryPeriod, now: u64) -> Vec<T> {
        let window = period.as_millis();
        let start = self
            .entries
            .partition_point(|e| now.saturating_sub(e.timestamp()) >= window);
        self.entries.range(start..).cloned().collect()
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.entries.iter().cloned().collect()
    }

    pub(super) fn entries(&self) -> &VecDeque<T> {
        &self.entries
    }
}
