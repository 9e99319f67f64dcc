//! Bounded history of Spike/Drop alerts
//!
//! Process-wide state: every dashboard session appends into and reads
//! from the same log, guarded by a `Mutex` at the call sites.

use super::classifier::TrendSignal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of alerts retained.
pub const ALERT_CAPACITY: usize = 5;

/// One raised alert. Never mutated after insertion, only evicted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertEntry {
    pub timestamp: String,
    pub region: String,
    pub signal: TrendSignal,
}

impl AlertEntry {
    pub fn new(now: i64, region: &str, signal: TrendSignal) -> Self {
        let timestamp = DateTime::<Utc>::from_timestamp(now, 0)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string());
        Self {
            timestamp,
            region: region.to_string(),
            signal,
        }
    }
}

/// FIFO buffer of the most recent alerts, oldest evicted first.
#[derive(Debug)]
pub struct AlertLog {
    entries: VecDeque<AlertEntry>,
    capacity: usize,
}

impl AlertLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(ALERT_CAPACITY)
    }

    /// Insert at the tail, then evict from the head down to capacity.
    pub fn append(&mut self, entry: AlertEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Ordered copy for rendering, most recent last.
    pub fn snapshot(&self) -> Vec<AlertEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
