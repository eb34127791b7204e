//! Wire types as the backend serializes them (PascalCase fields).
//!
//! The client never owns these records; it holds transient copies and
//! re-fetches after every write.

use crate::error::CoreError;
use crate::support::SupportLevel;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Constituent {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub national_id: String,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub island: String,
    #[serde(default)]
    pub constituency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Constituent {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn is_plotted(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartyAffiliation {
    pub party_id: String,
    pub party_name: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl PartyAffiliation {
    pub fn is_current_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.map_or(true, |end| end >= date)
    }
}

/// Constituent enriched with profile, nicknames and affiliation history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ConstituentDetail {
    #[serde(flatten)]
    pub constituent: Constituent,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub nicknames: Vec<String>,
    #[serde(default)]
    pub party_affiliations: Vec<PartyAffiliation>,
}

impl ConstituentDetail {
    pub fn current_affiliations(&self, date: NaiveDate) -> Vec<&PartyAffiliation> {
        self.party_affiliations
            .iter()
            .filter(|a| a.is_current_on(date))
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SupportAssessment {
    pub id: String,
    pub constituent_id: String,
    #[serde(default)]
    pub candidate_id: Option<String>,
    pub support_level: SupportLevel,
    pub confidence: u8,
    pub assessed_by: String,
    pub assessed_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutreachMethod {
    DoorToDoor,
    Phone,
    Sms,
    Event,
    SocialMedia,
    #[serde(other)]
    Other,
}

impl OutreachMethod {
    pub const ALL: [OutreachMethod; 6] = [
        OutreachMethod::DoorToDoor,
        OutreachMethod::Phone,
        OutreachMethod::Sms,
        OutreachMethod::Event,
        OutreachMethod::SocialMedia,
        OutreachMethod::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OutreachMethod::DoorToDoor => "door_to_door",
            OutreachMethod::Phone => "phone",
            OutreachMethod::Sms => "sms",
            OutreachMethod::Event => "event",
            OutreachMethod::SocialMedia => "social_media",
            OutreachMethod::Other => "other",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == raw)
    }

    pub fn label(self) -> &'static str {
        match self {
            OutreachMethod::DoorToDoor => "Door to door",
            OutreachMethod::Phone => "Phone",
            OutreachMethod::Sms => "SMS",
            OutreachMethod::Event => "Event",
            OutreachMethod::SocialMedia => "Social media",
            OutreachMethod::Other => "Other",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutreachOutcome {
    Contacted,
    NotHome,
    Refused,
    WrongAddress,
    Moved,
    FollowUpRequired,
    #[serde(other)]
    Other,
}

impl OutreachOutcome {
    pub const ALL: [OutreachOutcome; 7] = [
        OutreachOutcome::Contacted,
        OutreachOutcome::NotHome,
        OutreachOutcome::Refused,
        OutreachOutcome::WrongAddress,
        OutreachOutcome::Moved,
        OutreachOutcome::FollowUpRequired,
        OutreachOutcome::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OutreachOutcome::Contacted => "contacted",
            OutreachOutcome::NotHome => "not_home",
            OutreachOutcome::Refused => "refused",
            OutreachOutcome::WrongAddress => "wrong_address",
            OutreachOutcome::Moved => "moved",
            OutreachOutcome::FollowUpRequired => "follow_up_required",
            OutreachOutcome::Other => "other",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.as_str() == raw)
    }

    pub fn label(self) -> &'static str {
        match self {
            OutreachOutcome::Contacted => "Contacted",
            OutreachOutcome::NotHome => "Not home",
            OutreachOutcome::Refused => "Refused",
            OutreachOutcome::WrongAddress => "Wrong address",
            OutreachOutcome::Moved => "Moved",
            OutreachOutcome::FollowUpRequired => "Follow-up required",
            OutreachOutcome::Other => "Other",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OutreachLog {
    pub id: String,
    pub constituent_id: String,
    pub method: OutreachMethod,
    pub outcome: OutreachOutcome,
    pub contacted_by: String,
    pub contacted_at: DateTime<Utc>,
    #[serde(default)]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Party {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CandidateView {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub constituency: String,
    #[serde(default)]
    pub party_id: Option<String>,
    #[serde(default)]
    pub party_name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub candidates: Vec<CandidateView>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportStatus {
    Pending,
    Assigned,
    Completed,
    Cancelled,
}

impl TransportStatus {
    pub const ALL: [TransportStatus; 4] = [
        TransportStatus::Pending,
        TransportStatus::Assigned,
        TransportStatus::Completed,
        TransportStatus::Cancelled,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == raw)
    }

    pub fn label(self) -> &'static str {
        match self {
            TransportStatus::Pending => "Pending",
            TransportStatus::Assigned => "Assigned",
            TransportStatus::Completed => "Completed",
            TransportStatus::Cancelled => "Cancelled",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransportStatus::Pending => "pending",
            TransportStatus::Assigned => "assigned",
            TransportStatus::Completed => "completed",
            TransportStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransportRequest {
    pub id: String,
    pub constituent_id: String,
    pub pickup_address: String,
    pub pickup_time: DateTime<Utc>,
    pub status: TransportStatus,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VotingRecord {
    pub id: String,
    pub constituent_id: String,
    pub ballot_box_id: String,
    pub voted_at: DateTime<Utc>,
    pub recorded_by: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VoterRegistration {
    pub constituent_id: String,
    pub ballot_box_id: String,
    pub constituency: String,
    #[serde(default)]
    pub island: String,
}

/// One slice of a server-side collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            offset: 0,
            limit: 0,
        }
    }
}

/// Voter count at one support level. Embedded hex-map JSON uses snake_case
/// keys, so both spellings are accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LevelCount {
    #[serde(alias = "support_level")]
    pub support_level: SupportLevel,
    #[serde(alias = "voter_count", default)]
    pub voter_count: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartySupport {
    pub party_id: String,
    pub party_name: String,
    #[serde(default)]
    pub levels: Vec<LevelCount>,
}

// Request bodies.

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewSupportAssessment {
    pub constituent_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<String>,
    pub support_level: SupportLevel,
    pub confidence: u8,
    pub assessed_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewSupportAssessment {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.constituent_id.trim().is_empty() {
            return Err(CoreError::MissingField { field: "constituent" });
        }
        if self.assessed_by.trim().is_empty() {
            return Err(CoreError::MissingField { field: "assessed by" });
        }
        validate_confidence(self.confidence)
    }
}

/// One write covering several candidates that share a support level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BatchSupportAssessment {
    pub constituent_id: String,
    pub candidate_ids: Vec<String>,
    pub support_level: SupportLevel,
    pub confidence: u8,
    pub assessed_by: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewOutreachLog {
    pub constituent_id: String,
    pub method: OutreachMethod,
    pub outcome: OutreachOutcome,
    pub contacted_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_up_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewOutreachLog {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.constituent_id.trim().is_empty() {
            return Err(CoreError::MissingField { field: "constituent" });
        }
        if self.contacted_by.trim().is_empty() {
            return Err(CoreError::MissingField { field: "contacted by" });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewVotingRecord {
    pub constituent_id: String,
    pub ballot_box_id: String,
    pub recorded_by: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TransportDraft {
    pub constituent_id: String,
    pub pickup_address: String,
    pub pickup_time: DateTime<Utc>,
    pub status: TransportStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TransportDraft {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.constituent_id.trim().is_empty() {
            return Err(CoreError::MissingField { field: "constituent" });
        }
        if self.pickup_address.trim().is_empty() {
            return Err(CoreError::MissingField { field: "pickup address" });
        }
        Ok(())
    }
}

impl From<&TransportRequest> for TransportDraft {
    fn from(req: &TransportRequest) -> Self {
        Self {
            constituent_id: req.constituent_id.clone(),
            pickup_address: req.pickup_address.clone(),
            pickup_time: req.pickup_time,
            status: req.status,
            driver_name: req.driver_name.clone(),
            notes: req.notes.clone(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HouseLocation {
    pub latitude: f64,
    pub longitude: f64,
}

pub fn validate_confidence(confidence: u8) -> Result<(), CoreError> {
    if (1..=5).contains(&confidence) {
        Ok(())
    } else {
        Err(CoreError::ConfidenceOutOfRange(confidence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_pascal_case_constituent() {
        let c: Constituent = serde_json::from_value(serde_json::json!({
            "Id": "c-1",
            "FirstName": "Ana",
            "LastName": "Silva",
            "NationalId": "A123",
            "Sex": "F",
            "Dob": "1980-02-29",
            "Address": "1 Harbour Rd",
            "Island": "North",
            "Constituency": "North Central"
        }))
        .unwrap();
        assert_eq!(c.full_name(), "Ana Silva");
        assert_eq!(c.dob, NaiveDate::from_ymd_opt(1980, 2, 29));
        assert!(!c.is_plotted());
    }

    #[test]
    fn detail_flattens_constituent_fields() {
        let d: ConstituentDetail = serde_json::from_value(serde_json::json!({
            "Id": "c-2",
            "FirstName": "Ben",
            "LastName": "Lee",
            "Nicknames": ["Benny"],
            "PartyAffiliations": [
                {"PartyId": "p1", "PartyName": "Blue", "StartDate": "2010-01-01", "EndDate": "2015-12-31"},
                {"PartyId": "p2", "PartyName": "Green", "StartDate": "2016-01-01"}
            ]
        }))
        .unwrap();
        assert_eq!(d.constituent.id, "c-2");
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let current = d.current_affiliations(today);
        assert_eq!(current.len(), 1);
        assert_eq!(current[0].party_name, "Green");
    }

    #[test]
    fn unknown_outreach_values_fall_back_to_other() {
        let m: OutreachMethod = serde_json::from_str("\"carrier_pigeon\"").unwrap();
        assert_eq!(m, OutreachMethod::Other);
        let o: OutreachOutcome = serde_json::from_str("\"not_home\"").unwrap();
        assert_eq!(o, OutreachOutcome::NotHome);
    }

    #[test]
    fn enum_strings_match_wire_names() {
        for method in OutreachMethod::ALL {
            let wire = serde_json::to_value(method).unwrap();
            assert_eq!(wire, method.as_str());
            assert_eq!(OutreachMethod::parse(method.as_str()), Some(method));
        }
        for outcome in OutreachOutcome::ALL {
            assert_eq!(serde_json::to_value(outcome).unwrap(), outcome.as_str());
        }
        for status in TransportStatus::ALL {
            assert_eq!(serde_json::to_value(status).unwrap(), status.as_str());
            assert_eq!(TransportStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TransportStatus::parse("lost"), None);
    }

    #[test]
    fn level_count_accepts_snake_case_keys() {
        let lc: LevelCount =
            serde_json::from_str(r#"{"support_level":"leaning","voter_count":4}"#).unwrap();
        assert_eq!(lc.support_level, SupportLevel::Leaning);
        assert_eq!(lc.voter_count, 4);
    }

    #[test]
    fn support_draft_validation() {
        let mut draft = NewSupportAssessment {
            constituent_id: "c-1".into(),
            candidate_id: None,
            support_level: SupportLevel::Leaning,
            confidence: 3,
            assessed_by: "vol-1".into(),
            notes: None,
        };
        assert!(draft.validate().is_ok());
        draft.confidence = 9;
        assert_eq!(draft.validate(), Err(CoreError::ConfidenceOutOfRange(9)));
        draft.confidence = 3;
        draft.assessed_by = " ".into();
        assert!(matches!(draft.validate(), Err(CoreError::MissingField { .. })));
    }
}
