use super::CampaignApi;
use crate::cache::entity;
use crate::error::ApiError;
use crate::params::QueryParams;
use campaign_core::models::OutreachLog;
use chrono::NaiveDate;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutreachFilter {
    pub constituent_id: Option<String>,
    pub since: Option<NaiveDate>,
}

impl OutreachFilter {
    pub fn params(&self) -> QueryParams {
        QueryParams::new()
            .with("constituentId", &self.constituent_id)
            .with("since", self.since)
    }
}

impl CampaignApi {
    pub async fn outreach(&self, filter: &OutreachFilter) -> Result<Vec<OutreachLog>, ApiError> {
        let params = filter.params();
        self.query(
            self.key(entity::OUTREACH, &params),
            &self.group_path("outreach"),
            &params,
        )
        .await
    }
}
