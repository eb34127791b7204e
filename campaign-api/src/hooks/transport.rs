use super::CampaignApi;
use crate::cache::entity;
use crate::error::ApiError;
use crate::params::QueryParams;
use campaign_core::models::{TransportRequest, TransportStatus};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportFilter {
    pub status: Option<TransportStatus>,
    pub constituency: Option<String>,
}

impl TransportFilter {
    pub fn params(&self) -> QueryParams {
        QueryParams::new()
            .with("status", self.status)
            .with("constituency", &self.constituency)
    }
}

impl CampaignApi {
    pub async fn transport(
        &self,
        filter: &TransportFilter,
    ) -> Result<Vec<TransportRequest>, ApiError> {
        let params = filter.params();
        self.query(
            self.key(entity::TRANSPORT, &params),
            &self.group_path("transport"),
            &params,
        )
        .await
    }
}
