//! Writes. Each successful write invalidates the cached queries it can
//! affect; nothing is reconciled optimistically.

use crate::cache::entity;
use crate::error::ApiError;
use crate::hooks::CampaignApi;
use campaign_core::bulk::{batch_requests, CandidatePick};
use campaign_core::models::{
    validate_confidence, BatchSupportAssessment, HouseLocation, NewOutreachLog,
    NewSupportAssessment, NewVotingRecord, OutreachLog, OutreachMethod, OutreachOutcome,
    SupportAssessment, TransportDraft, TransportRequest, VotingRecord,
};
use campaign_core::CoreError;
use chrono::NaiveDate;
use serde::de::IgnoredAny;
use tracing::{info, warn};

const SUPPORT_SCOPE: &[&str] = &[
    entity::SUPPORT,
    entity::PARTY_SUPPORT,
    entity::HEXMAP_SUPPORT,
    entity::HEXMAP_PARTIES,
];
const OUTREACH_SCOPE: &[&str] = &[entity::OUTREACH];
const VOTING_SCOPE: &[&str] = &[entity::VOTING_RECORDS, entity::TRANSPORT];
const TRANSPORT_SCOPE: &[&str] = &[entity::TRANSPORT];
const LOCATION_SCOPE: &[&str] = &[
    entity::CONSTITUENTS,
    entity::CONSTITUENT,
    entity::HEXMAP_SUPPORT,
    entity::HEXMAP_PARTIES,
];

/// Address-level canvass of one constituent: a support pick per candidate
/// plus the outreach record for the knock itself.
#[derive(Clone, Debug, PartialEq)]
pub struct DoorToDoorVisit {
    pub constituent_id: String,
    pub picks: Vec<CandidatePick>,
    pub confidence: u8,
    pub canvasser: String,
    pub outcome: OutreachOutcome,
    pub follow_up_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DoorToDoorResult {
    pub assessments: Vec<SupportAssessment>,
    pub outreach: OutreachLog,
    /// Number of batched support writes issued.
    pub batches: usize,
}

impl CampaignApi {
    pub async fn log_support(
        &self,
        draft: &NewSupportAssessment,
    ) -> Result<SupportAssessment, ApiError> {
        draft.validate()?;
        let created = self
            .client()
            .post(&self.group_path("support"), Some(draft))
            .await?;
        self.cache().invalidate(SUPPORT_SCOPE);
        Ok(created)
    }

    pub async fn log_support_batch(
        &self,
        batch: &BatchSupportAssessment,
    ) -> Result<Vec<SupportAssessment>, ApiError> {
        if batch.candidate_ids.is_empty() {
            return Err(CoreError::MissingField { field: "candidates" }.into());
        }
        validate_confidence(batch.confidence)?;
        let created = self
            .client()
            .post(&self.group_path("support/batch"), Some(batch))
            .await?;
        self.cache().invalidate(SUPPORT_SCOPE);
        Ok(created)
    }

    pub async fn log_outreach(&self, draft: &NewOutreachLog) -> Result<OutreachLog, ApiError> {
        draft.validate()?;
        let created = self
            .client()
            .post(&self.group_path("outreach"), Some(draft))
            .await?;
        self.cache().invalidate(OUTREACH_SCOPE);
        Ok(created)
    }

    /// One batched support write per distinct level, then the outreach
    /// record. Not transactional: a failure stops the sequence and leaves
    /// earlier writes applied.
    pub async fn log_door_to_door(
        &self,
        visit: &DoorToDoorVisit,
    ) -> Result<DoorToDoorResult, ApiError> {
        let batches = batch_requests(
            &visit.constituent_id,
            &visit.picks,
            visit.confidence,
            &visit.canvasser,
        );
        let mut assessments = Vec::new();
        for (applied, batch) in batches.iter().enumerate() {
            match self.log_support_batch(batch).await {
                Ok(created) => assessments.extend(created),
                Err(err) => {
                    warn!(
                        constituent = %visit.constituent_id,
                        applied,
                        remaining = batches.len() - applied,
                        %err,
                        "door-to-door logging stopped part way"
                    );
                    return Err(err);
                }
            }
        }

        let outreach = self
            .log_outreach(&NewOutreachLog {
                constituent_id: visit.constituent_id.clone(),
                method: OutreachMethod::DoorToDoor,
                outcome: visit.outcome,
                contacted_by: visit.canvasser.clone(),
                follow_up_date: visit.follow_up_date,
                notes: visit.notes.clone(),
            })
            .await?;

        info!(
            constituent = %visit.constituent_id,
            batches = batches.len(),
            "door-to-door visit logged"
        );
        Ok(DoorToDoorResult {
            assessments,
            outreach,
            batches: batches.len(),
        })
    }

    pub async fn record_vote(&self, draft: &NewVotingRecord) -> Result<VotingRecord, ApiError> {
        if draft.constituent_id.trim().is_empty() {
            return Err(CoreError::MissingField { field: "constituent" }.into());
        }
        let created = self
            .client()
            .post(&self.group_path("voting/records"), Some(draft))
            .await?;
        self.cache().invalidate(VOTING_SCOPE);
        Ok(created)
    }

    pub async fn undo_vote(&self, record_id: &str) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .client()
            .del(&self.group_path(&format!("voting/records/{record_id}")))
            .await?;
        self.cache().invalidate(VOTING_SCOPE);
        Ok(())
    }

    pub async fn create_transport(
        &self,
        draft: &TransportDraft,
    ) -> Result<TransportRequest, ApiError> {
        draft.validate()?;
        let created = self
            .client()
            .post(&self.group_path("transport"), Some(draft))
            .await?;
        self.cache().invalidate(TRANSPORT_SCOPE);
        Ok(created)
    }

    pub async fn update_transport(
        &self,
        id: &str,
        draft: &TransportDraft,
    ) -> Result<TransportRequest, ApiError> {
        draft.validate()?;
        let updated = self
            .client()
            .put(&self.group_path(&format!("transport/{id}")), Some(draft))
            .await?;
        self.cache().invalidate(TRANSPORT_SCOPE);
        Ok(updated)
    }

    /// Stores the house coordinates used to place a constituent on the map.
    pub async fn plot_house(
        &self,
        constituent_id: &str,
        location: HouseLocation,
    ) -> Result<(), ApiError> {
        let _: IgnoredAny = self
            .client()
            .put(
                &self.group_path(&format!("constituents/{constituent_id}/location")),
                Some(&location),
            )
            .await?;
        self.cache().invalidate(LOCATION_SCOPE);
        Ok(())
    }
}
