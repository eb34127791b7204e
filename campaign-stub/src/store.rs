use crate::error::StubError;
use crate::hexgrid;
use campaign_core::aggregates::{current_assessments, support_distribution};
use campaign_core::models::{
    BatchSupportAssessment, Constituent, ConstituentDetail, Group, HouseLocation, LevelCount,
    NewOutreachLog, NewSupportAssessment, NewVotingRecord, OutreachLog, Page, Party, PartySupport,
    SupportAssessment, TransportDraft, TransportRequest, TransportStatus, VoterRegistration,
    VotingRecord,
};
use campaign_core::pagination::{paginate, DEFAULT_PAGE_SIZE};
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
pub struct StubData {
    pub group: Group,
    pub parties: Vec<Party>,
    pub constituents: Vec<ConstituentDetail>,
    pub assessments: Vec<SupportAssessment>,
    pub outreach: Vec<OutreachLog>,
    pub transport: Vec<TransportRequest>,
    pub registrations: Vec<VoterRegistration>,
    pub votes: Vec<VotingRecord>,
    next_id: u64,
    /// Writes left before the store starts refusing them.
    writes_before_failure: Option<usize>,
}

/// Shared handle used as axum state.
#[derive(Clone, Debug, Default)]
pub struct StubState {
    inner: Arc<Mutex<StubData>>,
}

impl StubState {
    pub fn new(data: StubData) -> Self {
        Self {
            inner: Arc::new(Mutex::new(data)),
        }
    }

    pub fn data(&self) -> MutexGuard<'_, StubData> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn group_id(&self) -> String {
        self.data().group.id.clone()
    }

    /// Lets `writes` more writes through, then answers every write with 503.
    pub fn fail_writes_after(&self, writes: usize) {
        self.data().writes_before_failure = Some(writes);
    }
}

fn matches_opt(filter: Option<&str>, value: &str) -> bool {
    filter.map_or(true, |f| f.trim().is_empty() || f.eq_ignore_ascii_case(value))
}

impl StubData {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-{}", self.next_id)
    }

    fn admit_write(&mut self) -> Result<(), StubError> {
        match self.writes_before_failure {
            Some(0) => Err(StubError::Unavailable),
            Some(n) => {
                self.writes_before_failure = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn constituency_of(&self, constituent_id: &str) -> Option<&str> {
        self.constituents
            .iter()
            .find(|c| c.constituent.id == constituent_id)
            .map(|c| c.constituent.constituency.as_str())
    }

    fn in_constituency(&self, constituent_id: &str, constituency: Option<&str>) -> bool {
        match constituency {
            None => true,
            Some(c) if c.trim().is_empty() => true,
            Some(c) => self
                .constituency_of(constituent_id)
                .is_some_and(|own| own.eq_ignore_ascii_case(c)),
        }
    }

    pub fn list_constituents(
        &self,
        constituency: Option<&str>,
        search: Option<&str>,
        offset: usize,
        limit: usize,
    ) -> Page<Constituent> {
        let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();
        let matching: Vec<Constituent> = self
            .constituents
            .iter()
            .map(|d| &d.constituent)
            .filter(|c| matches_opt(constituency, &c.constituency))
            .filter(|c| {
                needle.is_empty()
                    || c.full_name().to_lowercase().contains(&needle)
                    || c.national_id.to_lowercase().contains(&needle)
                    || c.address.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        let limit = if limit == 0 { DEFAULT_PAGE_SIZE } else { limit };
        paginate(&matching, offset, limit)
    }

    pub fn constituent(&self, id: &str) -> Result<ConstituentDetail, StubError> {
        self.constituents
            .iter()
            .find(|c| c.constituent.id == id)
            .cloned()
            .ok_or(StubError::NotFound("constituent"))
    }

    pub fn set_location(&mut self, id: &str, location: HouseLocation) -> Result<(), StubError> {
        self.admit_write()?;
        let detail = self
            .constituents
            .iter_mut()
            .find(|c| c.constituent.id == id)
            .ok_or(StubError::NotFound("constituent"))?;
        detail.constituent.latitude = Some(location.latitude);
        detail.constituent.longitude = Some(location.longitude);
        Ok(())
    }

    pub fn support(
        &self,
        constituent_id: Option<&str>,
        candidate_id: Option<&str>,
    ) -> Vec<SupportAssessment> {
        self.assessments
            .iter()
            .filter(|a| constituent_id.map_or(true, |c| a.constituent_id == c))
            .filter(|a| candidate_id.map_or(true, |k| a.candidate_id.as_deref() == Some(k)))
            .cloned()
            .collect()
    }

    pub fn add_support(
        &mut self,
        draft: NewSupportAssessment,
    ) -> Result<SupportAssessment, StubError> {
        draft.validate()?;
        self.constituent(&draft.constituent_id)?;
        self.admit_write()?;
        let created = SupportAssessment {
            id: self.next_id("sa"),
            constituent_id: draft.constituent_id,
            candidate_id: draft.candidate_id,
            support_level: draft.support_level,
            confidence: draft.confidence,
            assessed_by: draft.assessed_by,
            assessed_at: Utc::now(),
            notes: draft.notes,
        };
        self.assessments.push(created.clone());
        Ok(created)
    }

    pub fn add_support_batch(
        &mut self,
        batch: BatchSupportAssessment,
    ) -> Result<Vec<SupportAssessment>, StubError> {
        if batch.candidate_ids.is_empty() {
            return Err(StubError::Invalid("CandidateIds must not be empty".into()));
        }
        self.constituent(&batch.constituent_id)?;
        self.admit_write()?;
        let now = Utc::now();
        let mut created = Vec::with_capacity(batch.candidate_ids.len());
        for candidate_id in batch.candidate_ids {
            let assessment = SupportAssessment {
                id: self.next_id("sa"),
                constituent_id: batch.constituent_id.clone(),
                candidate_id: Some(candidate_id),
                support_level: batch.support_level,
                confidence: batch.confidence,
                assessed_by: batch.assessed_by.clone(),
                assessed_at: now,
                notes: None,
            };
            self.assessments.push(assessment.clone());
            created.push(assessment);
        }
        Ok(created)
    }

    /// Current assessments grouped by the assessed candidate's party.
    pub fn party_support(&self, constituency: Option<&str>) -> Vec<PartySupport> {
        let current: Vec<SupportAssessment> = current_assessments(&self.assessments)
            .into_iter()
            .filter(|a| self.in_constituency(&a.constituent_id, constituency))
            .collect();

        self.parties
            .iter()
            .map(|party| {
                let candidates: Vec<&str> = self
                    .group
                    .candidates
                    .iter()
                    .filter(|c| c.party_id.as_deref() == Some(party.id.as_str()))
                    .map(|c| c.id.as_str())
                    .collect();
                let for_party: Vec<SupportAssessment> = current
                    .iter()
                    .filter(|a| {
                        a.candidate_id
                            .as_deref()
                            .is_some_and(|k| candidates.contains(&k))
                    })
                    .cloned()
                    .collect();
                PartySupport {
                    party_id: party.id.clone(),
                    party_name: party.name.clone(),
                    levels: support_distribution(&for_party, None),
                }
            })
            .collect()
    }

    pub fn outreach(&self, constituent_id: Option<&str>, since: Option<NaiveDate>) -> Vec<OutreachLog> {
        self.outreach
            .iter()
            .filter(|o| constituent_id.map_or(true, |c| o.constituent_id == c))
            .filter(|o| since.map_or(true, |d| o.contacted_at.date_naive() >= d))
            .cloned()
            .collect()
    }

    pub fn add_outreach(&mut self, draft: NewOutreachLog) -> Result<OutreachLog, StubError> {
        draft.validate()?;
        self.constituent(&draft.constituent_id)?;
        self.admit_write()?;
        let created = OutreachLog {
            id: self.next_id("or"),
            constituent_id: draft.constituent_id,
            method: draft.method,
            outcome: draft.outcome,
            contacted_by: draft.contacted_by,
            contacted_at: Utc::now(),
            follow_up_date: draft.follow_up_date,
            notes: draft.notes,
        };
        self.outreach.push(created.clone());
        Ok(created)
    }

    pub fn transport(
        &self,
        status: Option<TransportStatus>,
        constituency: Option<&str>,
    ) -> Vec<TransportRequest> {
        self.transport
            .iter()
            .filter(|t| status.map_or(true, |s| t.status == s))
            .filter(|t| self.in_constituency(&t.constituent_id, constituency))
            .cloned()
            .collect()
    }

    pub fn add_transport(&mut self, draft: TransportDraft) -> Result<TransportRequest, StubError> {
        draft.validate()?;
        self.constituent(&draft.constituent_id)?;
        self.admit_write()?;
        let created = TransportRequest {
            id: self.next_id("tr"),
            constituent_id: draft.constituent_id,
            pickup_address: draft.pickup_address,
            pickup_time: draft.pickup_time,
            status: draft.status,
            driver_name: draft.driver_name,
            notes: draft.notes,
        };
        self.transport.push(created.clone());
        Ok(created)
    }

    pub fn update_transport(
        &mut self,
        id: &str,
        draft: TransportDraft,
    ) -> Result<TransportRequest, StubError> {
        draft.validate()?;
        self.admit_write()?;
        let existing = self
            .transport
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(StubError::NotFound("transport request"))?;
        existing.constituent_id = draft.constituent_id;
        existing.pickup_address = draft.pickup_address;
        existing.pickup_time = draft.pickup_time;
        existing.status = draft.status;
        existing.driver_name = draft.driver_name;
        existing.notes = draft.notes;
        Ok(existing.clone())
    }

    pub fn registrations(&self, constituency: Option<&str>) -> Vec<VoterRegistration> {
        self.registrations
            .iter()
            .filter(|r| matches_opt(constituency, &r.constituency))
            .cloned()
            .collect()
    }

    pub fn votes(&self, constituency: Option<&str>) -> Vec<VotingRecord> {
        self.votes
            .iter()
            .filter(|v| self.in_constituency(&v.constituent_id, constituency))
            .cloned()
            .collect()
    }

    /// One vote per constituent; a repeat is a conflict. Completes any open
    /// transport request for the voter.
    pub fn add_vote(&mut self, draft: NewVotingRecord) -> Result<VotingRecord, StubError> {
        if self.votes.iter().any(|v| v.constituent_id == draft.constituent_id) {
            return Err(StubError::Conflict("Vote already recorded".into()));
        }
        self.constituent(&draft.constituent_id)?;
        self.admit_write()?;
        let created = VotingRecord {
            id: self.next_id("vr"),
            constituent_id: draft.constituent_id,
            ballot_box_id: draft.ballot_box_id,
            voted_at: Utc::now(),
            recorded_by: draft.recorded_by,
        };
        for request in self
            .transport
            .iter_mut()
            .filter(|t| t.constituent_id == created.constituent_id)
            .filter(|t| matches!(t.status, TransportStatus::Pending | TransportStatus::Assigned))
        {
            request.status = TransportStatus::Completed;
        }
        self.votes.push(created.clone());
        Ok(created)
    }

    pub fn delete_vote(&mut self, id: &str) -> Result<(), StubError> {
        self.admit_write()?;
        let before = self.votes.len();
        self.votes.retain(|v| v.id != id);
        if self.votes.len() == before {
            return Err(StubError::NotFound("voting record"));
        }
        Ok(())
    }

    fn party_of(&self, candidate_id: &str) -> Option<&Party> {
        let party_id = self
            .group
            .candidates
            .iter()
            .find(|c| c.id == candidate_id)?
            .party_id
            .as_deref()?;
        self.parties.iter().find(|p| p.id == party_id)
    }

    fn plotted(&self, constituency: Option<&str>) -> Vec<&Constituent> {
        self.constituents
            .iter()
            .map(|d| &d.constituent)
            .filter(|c| c.is_plotted() && matches_opt(constituency, &c.constituency))
            .collect()
    }

    /// Support hex cells. Breakdowns are embedded as JSON strings, the way
    /// the production backend serializes them.
    pub fn support_hexmap(&self, candidate_id: Option<&str>, constituency: Option<&str>) -> Value {
        let current = current_assessments(&self.support(None, candidate_id));
        let cells = hexgrid::bin(&self.plotted(constituency));
        let features = cells
            .into_iter()
            .map(|(cell, members)| {
                let in_cell: Vec<SupportAssessment> = current
                    .iter()
                    .filter(|a| members.contains(&a.constituent_id.as_str()))
                    .cloned()
                    .collect();
                let levels: Vec<LevelCount> = support_distribution(&in_cell, None)
                    .into_iter()
                    .filter(|l| l.voter_count > 0)
                    .collect();
                let embedded = serde_json::to_string(&levels).unwrap_or_else(|_| "[]".into());
                hexgrid::feature(
                    &cell,
                    serde_json::json!({
                        "HexId": cell.id(),
                        "VoterCount": members.len(),
                        "SupportLevels": embedded,
                    }),
                )
            })
            .collect();
        hexgrid::collection(features)
    }

    /// Party hex cells with per-party counts and level splits embedded as
    /// arrays.
    pub fn party_hexmap(&self, constituency: Option<&str>) -> Value {
        let current = current_assessments(&self.assessments);

        let cells = hexgrid::bin(&self.plotted(constituency));
        let features = cells
            .into_iter()
            .map(|(cell, members)| {
                let mut by_party: BTreeMap<&str, (&Party, Vec<SupportAssessment>)> = BTreeMap::new();
                for a in current
                    .iter()
                    .filter(|a| members.contains(&a.constituent_id.as_str()))
                {
                    let Some(party) = a.candidate_id.as_deref().and_then(|k| self.party_of(k)) else {
                        continue;
                    };
                    by_party
                        .entry(party.id.as_str())
                        .or_insert_with(|| (party, Vec::new()))
                        .1
                        .push(a.clone());
                }
                let parties: Vec<Value> = by_party
                    .values()
                    .map(|(party, assessments)| {
                        let supporters = assessments
                            .iter()
                            .filter(|a| a.support_level.weight() > 0)
                            .count();
                        serde_json::json!({
                            "PartyId": party.id,
                            "PartyName": party.name,
                            "Color": party.color,
                            "VoterCount": supporters,
                            "Levels": support_distribution(assessments, None),
                        })
                    })
                    .collect();
                hexgrid::feature(
                    &cell,
                    serde_json::json!({
                        "HexId": cell.id(),
                        "VoterCount": members.len(),
                        "Parties": parties,
                    }),
                )
            })
            .collect();
        hexgrid::collection(features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::demo_data;
    use campaign_core::SupportLevel;

    fn level_total(levels: &[LevelCount], level: SupportLevel) -> u64 {
        levels
            .iter()
            .filter(|l| l.support_level == level)
            .map(|l| l.voter_count)
            .sum()
    }

    #[test]
    fn search_and_filter_constituents() {
        let data = demo_data();
        let all = data.list_constituents(None, None, 0, 0);
        assert_eq!(all.total, data.constituents.len());
        assert_eq!(all.limit, DEFAULT_PAGE_SIZE);

        let north = data.list_constituents(Some("north harbour"), None, 0, 100);
        assert!(north.items.iter().all(|c| c.constituency == "North Harbour"));
        assert!(north.total > 0);

        let beyond = data.list_constituents(None, None, 10_000, 10);
        assert!(beyond.items.is_empty());
    }

    #[test]
    fn duplicate_vote_conflicts_and_completes_transport() {
        let mut data = demo_data();
        let voter = data.transport[0].constituent_id.clone();
        let draft = NewVotingRecord {
            constituent_id: voter.clone(),
            ballot_box_id: "box-1".into(),
            recorded_by: "agent".into(),
        };
        data.add_vote(draft.clone()).unwrap();
        assert!(matches!(data.add_vote(draft), Err(StubError::Conflict(_))));
        assert!(data
            .transport
            .iter()
            .filter(|t| t.constituent_id == voter)
            .all(|t| t.status == TransportStatus::Completed));
    }

    #[test]
    fn writes_fail_once_armed() {
        let mut data = demo_data();
        data.writes_before_failure = Some(1);
        let id = data.constituents[0].constituent.id.clone();
        let loc = HouseLocation { latitude: 1.0, longitude: 2.0 };
        assert!(data.set_location(&id, loc).is_ok());
        assert!(matches!(data.set_location(&id, loc), Err(StubError::Unavailable)));
    }

    #[test]
    fn party_support_covers_every_party() {
        let data = demo_data();
        let support = data.party_support(None);
        assert_eq!(support.len(), data.parties.len());
        let total: u64 = support
            .iter()
            .flat_map(|p| p.levels.iter())
            .map(|l| l.voter_count)
            .sum();
        assert!(total > 0);
        let strong = level_total(&support[0].levels, SupportLevel::StrongSupporter);
        assert!(strong <= total);
    }
}
