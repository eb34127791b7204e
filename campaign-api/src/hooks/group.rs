use super::CampaignApi;
use crate::cache::entity;
use crate::error::ApiError;
use crate::params::QueryParams;
use campaign_core::models::{CandidateView, Group, Party};

impl CampaignApi {
    pub async fn group(&self) -> Result<Group, ApiError> {
        let params = QueryParams::new();
        let path = format!("/group/{}", self.group_id());
        self.query(self.key(entity::GROUP, &params), &path, &params)
            .await
    }

    pub async fn candidates(&self) -> Result<Vec<CandidateView>, ApiError> {
        let params = QueryParams::new();
        self.query(
            self.key(entity::CANDIDATES, &params),
            &self.group_path("candidates"),
            &params,
        )
        .await
    }

    pub async fn parties(&self) -> Result<Vec<Party>, ApiError> {
        let params = QueryParams::new();
        self.query(
            self.key(entity::PARTIES, &params),
            &self.group_path("parties"),
            &params,
        )
        .await
    }
}
