use super::CampaignApi;
use crate::cache::entity;
use crate::error::ApiError;
use crate::params::QueryParams;
use hex_registry::style::party_palette;
use hex_registry::{decorate_parties, decorate_support, HexFeatureCollection};
use serde_json::Value;

impl CampaignApi {
    /// Support-level hex cells, decorated with dominant level and colour.
    pub async fn support_hexmap(
        &self,
        candidate_id: Option<&str>,
        constituency: Option<&str>,
    ) -> Result<HexFeatureCollection, ApiError> {
        let params = QueryParams::new()
            .with("candidateId", candidate_id)
            .with("constituency", constituency);
        let raw: Value = self
            .query(
                self.key(entity::HEXMAP_SUPPORT, &params),
                &self.group_path("hexmap/support"),
                &params,
            )
            .await?;
        let mut collection = HexFeatureCollection::from_value(raw)?;
        decorate_support(&mut collection);
        Ok(collection)
    }

    /// Party hex cells, coloured by the dominant party using the group's
    /// party palette.
    pub async fn party_hexmap(
        &self,
        constituency: Option<&str>,
    ) -> Result<HexFeatureCollection, ApiError> {
        let params = QueryParams::new().with("constituency", constituency);
        let raw: Value = self
            .query(
                self.key(entity::HEXMAP_PARTIES, &params),
                &self.group_path("hexmap/parties"),
                &params,
            )
            .await?;
        let parties = self.parties().await?;
        let mut collection = HexFeatureCollection::from_value(raw)?;
        decorate_parties(&mut collection, &party_palette(&parties));
        Ok(collection)
    }
}
