use super::CampaignApi;
use crate::cache::entity;
use crate::error::ApiError;
use crate::params::QueryParams;
use campaign_core::models::{PartySupport, SupportAssessment};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SupportFilter {
    pub constituent_id: Option<String>,
    pub candidate_id: Option<String>,
}

impl SupportFilter {
    pub fn params(&self) -> QueryParams {
        QueryParams::new()
            .with("constituentId", &self.constituent_id)
            .with("candidateId", &self.candidate_id)
    }
}

impl CampaignApi {
    pub async fn support(&self, filter: &SupportFilter) -> Result<Vec<SupportAssessment>, ApiError> {
        let params = filter.params();
        self.query(
            self.key(entity::SUPPORT, &params),
            &self.group_path("support"),
            &params,
        )
        .await
    }

    /// Per-party support-level breakdowns, feeding the party score chart.
    pub async fn party_support(
        &self,
        constituency: Option<&str>,
    ) -> Result<Vec<PartySupport>, ApiError> {
        let params = QueryParams::new().with("constituency", constituency);
        self.query(
            self.key(entity::PARTY_SUPPORT, &params),
            &self.group_path("support/parties"),
            &params,
        )
        .await
    }
}
