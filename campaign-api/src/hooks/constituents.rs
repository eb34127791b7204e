use super::CampaignApi;
use crate::cache::{entity, QueryKey};
use crate::error::ApiError;
use crate::params::QueryParams;
use campaign_core::models::{Constituent, ConstituentDetail, Page};
use campaign_core::pagination::DEFAULT_PAGE_SIZE;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstituentFilter {
    pub constituency: Option<String>,
    pub search: Option<String>,
    pub offset: usize,
    pub limit: usize,
}

impl Default for ConstituentFilter {
    fn default() -> Self {
        Self {
            constituency: None,
            search: None,
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ConstituentFilter {
    pub fn params(&self) -> QueryParams {
        QueryParams::new()
            .with("constituency", &self.constituency)
            .with("search", &self.search)
            .with("offset", self.offset)
            .with("limit", self.limit)
    }
}

impl CampaignApi {
    pub fn constituents_key(&self, filter: &ConstituentFilter) -> QueryKey {
        self.key(entity::CONSTITUENTS, &filter.params())
    }

    pub async fn constituents(
        &self,
        filter: &ConstituentFilter,
    ) -> Result<Page<Constituent>, ApiError> {
        let params = filter.params();
        self.query(
            self.constituents_key(filter),
            &self.group_path("constituents"),
            &params,
        )
        .await
    }

    pub async fn constituent(&self, id: &str) -> Result<ConstituentDetail, ApiError> {
        let params = QueryParams::new();
        let key = self.key(entity::CONSTITUENT, &params).with_id(id);
        self.query(key, &self.group_path(&format!("constituents/{id}")), &params)
            .await
    }
}
