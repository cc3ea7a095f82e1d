// src/store/slot.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::LoadError;

/// Monotonic per-slot id attached to every load.
pub type RequestId = u64;

/// What a panel currently has to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum CacheState<T> {
    /// Never loaded, or invalidated.
    Stale,
    Fresh {
        data: T,
        fetched_at: DateTime<Utc>,
        request_id: RequestId,
    },
    /// The latest load failed; no data is kept.
    Error {
        message: String,
        failed_at: DateTime<Utc>,
        request_id: RequestId,
    },
}

impl<T> CacheState<T> {
    pub fn label(&self) -> &'static str {
        match self {
            CacheState::Stale => "stale",
            CacheState::Fresh { .. } => "fresh",
            CacheState::Error { .. } => "error",
        }
    }
}

/// Cache for one dataset. Each load takes a request id from [`begin`]; only
/// the result carrying the latest id may replace the state, so a slow
/// response can never overwrite a newer one.
///
/// [`begin`]: DatasetSlot::begin
#[derive(Debug, Clone)]
pub struct DatasetSlot<T> {
    name: &'static str,
    state: CacheState<T>,
    issued: RequestId,
    settled: RequestId,
}

impl<T> DatasetSlot<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: CacheState::Stale,
            issued: 0,
            settled: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> &CacheState<T> {
        &self.state
    }

    pub fn data(&self) -> Option<&T> {
        match &self.state {
            CacheState::Fresh { data, .. } => Some(data),
            _ => None,
        }
    }

    /// A load was issued and its result has not been applied yet.
    pub fn is_loading(&self) -> bool {
        self.settled < self.issued
    }

    pub fn begin(&mut self) -> RequestId {
        self.issued += 1;
        debug!(dataset = self.name, request_id = self.issued, "load issued");
        self.issued
    }

    /// Apply the result of load `id`. Returns `false`, leaving the state
    /// untouched, when a newer load has been issued since.
    pub fn resolve(&mut self, id: RequestId, result: Result<T, LoadError>) -> bool {
        if id != self.issued {
            warn!(
                dataset = self.name,
                request_id = id,
                latest = self.issued,
                "discarding stale response"
            );
            return false;
        }

        self.settled = id;
        self.state = match result {
            Ok(data) => {
                info!(dataset = self.name, request_id = id, "dataset refreshed");
                CacheState::Fresh {
                    data,
                    fetched_at: Utc::now(),
                    request_id: id,
                }
            }
            Err(err) => {
                warn!(dataset = self.name, request_id = id, error = %err, "dataset cleared after failed load");
                CacheState::Error {
                    message: err.to_string(),
                    failed_at: Utc::now(),
                    request_id: id,
                }
            }
        };
        true
    }

    pub fn invalidate(&mut self) {
        self.state = CacheState::Stale;
    }
}
