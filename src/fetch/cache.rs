use chrono::{DateTime, Utc};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use crate::process::RawTable;

/// A fetched table plus when it was fetched.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub table: Arc<RawTable>,
    /// Monotonic clock, used for expiry.
    pub fetched_at: Instant,
    /// Wall clock, for display.
    pub fetched_at_utc: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(table: RawTable, now: Instant) -> Self {
        Self {
            table: Arc::new(table),
            fetched_at: now,
            fetched_at_utc: Utc::now(),
        }
    }

    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.fetched_at)
    }

    pub fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        self.age(now) < ttl
    }
}

/// Holds at most one snapshot and hands it back while it is younger than `ttl`.
#[derive(Debug)]
pub struct TableCache {
    ttl: Duration,
    entry: Option<Snapshot>,
}

impl TableCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The cached snapshot, fresh or not.
    pub fn peek(&self) -> Option<&Snapshot> {
        self.entry.as_ref()
    }

    pub fn get_fresh(&self, now: Instant) -> Option<&Snapshot> {
        self.entry.as_ref().filter(|s| s.is_fresh(self.ttl, now))
    }

    pub fn store(&mut self, snapshot: Snapshot) -> &Snapshot {
        self.entry.insert(snapshot)
    }
}
