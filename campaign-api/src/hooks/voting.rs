use super::CampaignApi;
use crate::cache::entity;
use crate::error::ApiError;
use crate::params::QueryParams;
use campaign_core::aggregates::{turnout, TurnoutBy, TurnoutRow};
use campaign_core::models::{VoterRegistration, VotingRecord};

impl CampaignApi {
    pub async fn registrations(
        &self,
        constituency: Option<&str>,
    ) -> Result<Vec<VoterRegistration>, ApiError> {
        let params = QueryParams::new().with("constituency", constituency);
        self.query(
            self.key(entity::REGISTRATIONS, &params),
            &self.group_path("voting/registrations"),
            &params,
        )
        .await
    }

    pub async fn voting_records(
        &self,
        constituency: Option<&str>,
    ) -> Result<Vec<VotingRecord>, ApiError> {
        let params = QueryParams::new().with("constituency", constituency);
        self.query(
            self.key(entity::VOTING_RECORDS, &params),
            &self.group_path("voting/records"),
            &params,
        )
        .await
    }

    /// Registrations and records fetched together and reduced to turnout
    /// rows.
    pub async fn turnout(
        &self,
        constituency: Option<&str>,
        by: TurnoutBy,
    ) -> Result<Vec<TurnoutRow>, ApiError> {
        let registrations = self.registrations(constituency).await?;
        let records = self.voting_records(constituency).await?;
        Ok(turnout(&registrations, &records, by))
    }
}
