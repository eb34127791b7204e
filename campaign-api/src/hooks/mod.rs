//! Per-entity data hooks. Every read goes through the query cache keyed by
//! entity, group and filter parameters.

mod constituents;
mod group;
mod hexmap;
mod outreach;
mod support;
mod transport;
mod voting;

pub use constituents::ConstituentFilter;
pub use outreach::OutreachFilter;
pub use support::SupportFilter;
pub use transport::TransportFilter;

use crate::cache::{Lookup, QueryCache, QueryKey};
use crate::client::ApiClient;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::params::QueryParams;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct CampaignApi {
    client: ApiClient,
    group_id: String,
    cache: Arc<QueryCache>,
}

impl CampaignApi {
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_cache(config, Arc::new(QueryCache::new()))
    }

    pub fn with_cache(config: &ApiConfig, cache: Arc<QueryCache>) -> Self {
        Self {
            client: ApiClient::new(config),
            group_id: config.group_id.clone(),
            cache,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub(crate) fn group_path(&self, rest: &str) -> String {
        format!("/groups/{}/{}", self.group_id, rest.trim_start_matches('/'))
    }

    pub(crate) fn key(&self, entity: &'static str, params: &QueryParams) -> QueryKey {
        QueryKey::new(entity, &self.group_id, params)
    }

    /// Cached read: a fresh entry is served without I/O, anything else is
    /// fetched and stored.
    pub(crate) async fn query<T>(
        &self,
        key: QueryKey,
        path: &str,
        params: &QueryParams,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Serialize,
    {
        if let Lookup::Fresh(value) = self.cache.lookup::<T>(&key) {
            return Ok(value);
        }
        let value: T = self.client.get(path, params).await?;
        self.cache.store(&key, &value);
        Ok(value)
    }

    /// Whatever the cache can show for `key` right now, including the
    /// previous data of the same entity while a new key is loading.
    pub fn placeholder<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        self.cache.previous(key)
    }
}
