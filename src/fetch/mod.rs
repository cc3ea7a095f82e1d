// src/fetch/mod.rs

//! HTTP access to the dashboard endpoints.
//!
//! Every load is a plain GET with no request body, no auth and no retry. A
//! non-2xx status, an unreadable body or a body with the wrong shape all come
//! back as a [`LoadError`].

pub mod endpoint;
#[cfg(test)]
pub(crate) mod testing;

use anyhow::Context;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::Config;
use crate::error::{LoadError, ShapeError};
use crate::payload::{BlockagePayload, FunnelPayload, InventoryPayload, TablePayload};
use crate::shape::{
    shape_blockage, shape_cut, shape_cut_motives, shape_funnel, shape_inventory, shape_top10,
    BlockageSeries, Breakdown, CutSeries, InventoryDataset, TopEntry,
};

pub use endpoint::Endpoint;

#[derive(Debug, Clone)]
pub struct DashboardClient {
    http: Client,
    base_url: Url,
}

impl DashboardClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .build()
            .context("building HTTP client")?;
        Ok(Self::with_http(http, config.base_url.clone()))
    }

    pub fn with_http(http: Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET `endpoint` and decode the body as JSON.
    #[instrument(skip_all, fields(endpoint = %endpoint))]
    pub async fn fetch_json(&self, endpoint: Endpoint) -> Result<Value, LoadError> {
        let name = endpoint.to_string();
        let url = endpoint
            .url(&self.base_url)
            .map_err(|source| LoadError::InvalidUrl {
                endpoint: name.clone(),
                source,
            })?;
        let transport = |source: reqwest::Error| LoadError::Transport {
            endpoint: name.clone(),
            source,
        };

        let resp = self.http.get(url).send().await.map_err(transport)?;
        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "endpoint answered with an error status");
            return Err(LoadError::Status {
                endpoint: name,
                status: status.as_u16(),
            });
        }

        let bytes = resp.bytes().await.map_err(transport)?;
        debug!(bytes = bytes.len(), "received body");
        serde_json::from_slice(&bytes).map_err(|source| LoadError::Decode {
            endpoint: name,
            source,
        })
    }

    async fn load<T>(
        &self,
        endpoint: Endpoint,
        shape: impl FnOnce(&Value) -> Result<T, ShapeError>,
    ) -> Result<T, LoadError> {
        let body = self.fetch_json(endpoint).await?;
        shape(&body).map_err(|source| LoadError::shape(endpoint.to_string(), source))
    }

    pub async fn blockage(&self) -> Result<BlockageSeries, LoadError> {
        self.load(Endpoint::Blockage, |body| {
            shape_blockage(&BlockagePayload::decode(body)?)
        })
        .await
    }

    pub async fn top10(&self) -> Result<Vec<TopEntry>, LoadError> {
        self.load(Endpoint::BlockageTop10, |body| {
            shape_top10(&TablePayload::decode(body, Endpoint::BlockageTop10.dataset())?)
        })
        .await
    }

    pub async fn cut(&self) -> Result<CutSeries, LoadError> {
        self.load(Endpoint::Cut, |body| {
            shape_cut(&TablePayload::decode(body, Endpoint::Cut.dataset())?)
        })
        .await
    }

    pub async fn cut_motives(&self) -> Result<Breakdown, LoadError> {
        self.load(Endpoint::CutMotives, |body| {
            shape_cut_motives(&TablePayload::decode(body, Endpoint::CutMotives.dataset())?)
        })
        .await
    }

    pub async fn inventory(&self) -> Result<InventoryDataset, LoadError> {
        self.load(Endpoint::Inventory, |body| {
            shape_inventory(&InventoryPayload::decode(body)?)
        })
        .await
    }

    pub async fn funnel(&self) -> Result<Breakdown, LoadError> {
        self.load(Endpoint::Funnel, |body| {
            Ok(shape_funnel(&FunnelPayload::decode(body)?))
        })
        .await
    }
}
