// src/session.rs

use futures::{stream::FuturesUnordered, StreamExt};
use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;
use tracing::{error, info};

use crate::error::LoadError;
use crate::fetch::{DashboardClient, Endpoint};
use crate::present::DashboardSnapshot;
use crate::store::{DashboardStore, DatasetSlot};

/// How one load ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadOutcome {
    Loaded,
    Failed,
    /// A newer load for the same slot was issued before this one finished.
    Discarded,
}

type SlotOf<T> = fn(&mut DashboardStore) -> &mut DatasetSlot<T>;

/// Owns the client and the store, and issues the dataset loads.
///
/// The store lock is only held to issue a request id or apply a result, never
/// across an await, so loads for different slots interleave freely.
#[derive(Debug, Clone)]
pub struct Session {
    client: DashboardClient,
    store: Arc<Mutex<DashboardStore>>,
}

impl Session {
    pub fn new(client: DashboardClient) -> Self {
        Self {
            client,
            store: Arc::new(Mutex::new(DashboardStore::default())),
        }
    }

    pub fn client(&self) -> &DashboardClient {
        &self.client
    }

    fn store(&self) -> MutexGuard<'_, DashboardStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `read` against the current store.
    pub fn with_store<R>(&self, read: impl FnOnce(&DashboardStore) -> R) -> R {
        read(&self.store())
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot::from_store(&self.store())
    }

    async fn load<T, F>(&self, endpoint: Endpoint, slot: SlotOf<T>, fetch: F) -> LoadOutcome
    where
        F: Future<Output = Result<T, LoadError>>,
    {
        let request_id = slot(&mut self.store()).begin();
        let start = Instant::now();
        let result = fetch.await;

        match &result {
            Ok(_) => info!(%endpoint, request_id, elapsed = ?start.elapsed(), "load finished"),
            Err(err) => error!(%endpoint, request_id, error = %err, "load failed"),
        }
        let failed = result.is_err();

        if !slot(&mut self.store()).resolve(request_id, result) {
            LoadOutcome::Discarded
        } else if failed {
            LoadOutcome::Failed
        } else {
            LoadOutcome::Loaded
        }
    }

    pub async fn load_blockage(&self) -> LoadOutcome {
        self.load(Endpoint::Blockage, |s| &mut s.blockage, self.client.blockage())
            .await
    }

    pub async fn load_top10(&self) -> LoadOutcome {
        self.load(Endpoint::BlockageTop10, |s| &mut s.top10, self.client.top10())
            .await
    }

    pub async fn load_cut(&self) -> LoadOutcome {
        self.load(Endpoint::Cut, |s| &mut s.cut, self.client.cut()).await
    }

    pub async fn load_cut_motives(&self) -> LoadOutcome {
        self.load(Endpoint::CutMotives, |s| &mut s.cut_motives, self.client.cut_motives())
            .await
    }

    pub async fn load_inventory(&self) -> LoadOutcome {
        self.load(Endpoint::Inventory, |s| &mut s.inventory, self.client.inventory())
            .await
    }

    pub async fn load_funnel(&self) -> LoadOutcome {
        self.load(Endpoint::Funnel, |s| &mut s.funnel, self.client.funnel())
            .await
    }

    pub async fn load_endpoint(&self, endpoint: Endpoint) -> LoadOutcome {
        match endpoint {
            Endpoint::Blockage => self.load_blockage().await,
            Endpoint::BlockageTop10 => self.load_top10().await,
            Endpoint::Cut => self.load_cut().await,
            Endpoint::CutMotives => self.load_cut_motives().await,
            Endpoint::Inventory => self.load_inventory().await,
            Endpoint::Funnel => self.load_funnel().await,
        }
    }

    /// Issue the loads for `endpoints` at once; none waits on another.
    /// Outcomes come back in the order the endpoints were given.
    pub async fn load_endpoints(&self, endpoints: &[Endpoint]) -> Vec<(Endpoint, LoadOutcome)> {
        let mut pending: FuturesUnordered<_> = endpoints
            .iter()
            .map(|&endpoint| async move { (endpoint, self.load_endpoint(endpoint).await) })
            .collect();

        let mut outcomes = Vec::with_capacity(endpoints.len());
        while let Some(done) = pending.next().await {
            outcomes.push(done);
        }
        outcomes.sort_by_key(|(endpoint, _)| endpoints.iter().position(|e| e == endpoint));

        let loaded = outcomes
            .iter()
            .filter(|(_, outcome)| *outcome == LoadOutcome::Loaded)
            .count();
        info!(loaded, total = outcomes.len(), "dashboard refresh finished");
        outcomes
    }

    pub async fn load_all(&self) -> Vec<(Endpoint, LoadOutcome)> {
        self.load_endpoints(&Endpoint::ALL).await
    }
}
