//! Dialog drafts. Inputs stay as typed text until submit, where they are
//! parsed into request bodies.

use campaign_api::mutations::DoorToDoorVisit;
use campaign_core::bulk::CandidatePick;
use campaign_core::models::{
    validate_confidence, CandidateView, HouseLocation, NewOutreachLog, NewSupportAssessment,
    NewVotingRecord, OutreachMethod, OutreachOutcome, TransportDraft, TransportRequest,
    TransportStatus,
};
use campaign_core::{CoreError, SupportLevel};
use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use std::fmt::Display;

/// `datetime-local` input format. The input holds wall-clock time in the
/// user's zone.
const PICKUP_FORMAT: &str = "%Y-%m-%dT%H:%M";

fn opt(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn required(text: &str, field: &'static str) -> Result<String, CoreError> {
    opt(text).ok_or(CoreError::MissingField { field })
}

fn parse_date(text: &str, field: &'static str) -> Result<Option<NaiveDate>, CoreError> {
    match opt(text) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| CoreError::InvalidField { field, value: raw }),
    }
}

fn parse_coordinate(text: &str, field: &'static str, limit: f64) -> Result<f64, CoreError> {
    let raw = required(text, field)?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() <= limit => Ok(v),
        _ => Err(CoreError::InvalidField { field, value: raw }),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SupportForm {
    pub candidate_id: String,
    pub level: SupportLevel,
    pub confidence: u8,
    pub assessed_by: String,
    pub notes: String,
}

impl Default for SupportForm {
    fn default() -> Self {
        Self {
            candidate_id: String::new(),
            level: SupportLevel::Undecided,
            confidence: 3,
            assessed_by: String::new(),
            notes: String::new(),
        }
    }
}

impl SupportForm {
    pub fn to_request(&self, constituent_id: &str) -> Result<NewSupportAssessment, CoreError> {
        let draft = NewSupportAssessment {
            constituent_id: constituent_id.to_string(),
            candidate_id: opt(&self.candidate_id),
            support_level: self.level,
            confidence: self.confidence,
            assessed_by: self.assessed_by.trim().to_string(),
            notes: opt(&self.notes),
        };
        draft.validate()?;
        Ok(draft)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OutreachForm {
    pub constituent_id: String,
    pub method: OutreachMethod,
    pub outcome: OutreachOutcome,
    pub contacted_by: String,
    pub follow_up: String,
    pub notes: String,
}

impl Default for OutreachForm {
    fn default() -> Self {
        Self {
            constituent_id: String::new(),
            method: OutreachMethod::Phone,
            outcome: OutreachOutcome::Contacted,
            contacted_by: String::new(),
            follow_up: String::new(),
            notes: String::new(),
        }
    }
}

impl OutreachForm {
    pub fn to_request(&self) -> Result<NewOutreachLog, CoreError> {
        let draft = NewOutreachLog {
            constituent_id: self.constituent_id.trim().to_string(),
            method: self.method,
            outcome: self.outcome,
            contacted_by: self.contacted_by.trim().to_string(),
            follow_up_date: parse_date(&self.follow_up, "follow-up date")?,
            notes: opt(&self.notes),
        };
        draft.validate()?;
        Ok(draft)
    }
}

/// One row per candidate; `None` means the canvasser skipped them.
#[derive(Clone, Debug, PartialEq)]
pub struct DoorToDoorForm {
    pub constituent_id: String,
    pub canvasser: String,
    pub confidence: u8,
    pub outcome: OutreachOutcome,
    pub picks: Vec<(String, Option<SupportLevel>)>,
    pub notes: String,
}

impl Default for DoorToDoorForm {
    fn default() -> Self {
        Self {
            constituent_id: String::new(),
            canvasser: String::new(),
            confidence: 3,
            outcome: OutreachOutcome::Contacted,
            picks: Vec::new(),
            notes: String::new(),
        }
    }
}

impl DoorToDoorForm {
    pub fn for_candidates(candidates: &[CandidateView]) -> Self {
        Self {
            picks: candidates.iter().map(|c| (c.id.clone(), None)).collect(),
            ..Self::default()
        }
    }

    pub fn set_pick(&mut self, candidate_id: &str, level: Option<SupportLevel>) {
        if let Some(slot) = self.picks.iter_mut().find(|(id, _)| id == candidate_id) {
            slot.1 = level;
        }
    }

    pub fn to_visit(&self) -> Result<DoorToDoorVisit, CoreError> {
        let constituent_id = required(&self.constituent_id, "constituent")?;
        let canvasser = required(&self.canvasser, "canvasser")?;
        validate_confidence(self.confidence)?;
        let picks: Vec<CandidatePick> = self
            .picks
            .iter()
            .filter_map(|(candidate_id, level)| {
                level.map(|level| CandidatePick {
                    candidate_id: candidate_id.clone(),
                    level,
                })
            })
            .collect();
        if picks.is_empty() {
            return Err(CoreError::MissingField { field: "at least one support pick" });
        }
        Ok(DoorToDoorVisit {
            constituent_id,
            picks,
            confidence: self.confidence,
            canvasser,
            outcome: self.outcome,
            follow_up_date: None,
            notes: opt(&self.notes),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransportForm {
    pub constituent_id: String,
    pub pickup_address: String,
    pub pickup_time: String,
    pub status: TransportStatus,
    pub driver_name: String,
    pub notes: String,
}

impl Default for TransportForm {
    fn default() -> Self {
        Self {
            constituent_id: String::new(),
            pickup_address: String::new(),
            pickup_time: String::new(),
            status: TransportStatus::Pending,
            driver_name: String::new(),
            notes: String::new(),
        }
    }
}

impl TransportForm {
    /// Prefills the edit dialog, showing the pickup time in `tz`.
    pub fn editing<Tz>(req: &TransportRequest, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            constituent_id: req.constituent_id.clone(),
            pickup_address: req.pickup_address.clone(),
            pickup_time: req
                .pickup_time
                .with_timezone(tz)
                .format(PICKUP_FORMAT)
                .to_string(),
            status: req.status,
            driver_name: req.driver_name.clone().unwrap_or_default(),
            notes: req.notes.clone().unwrap_or_default(),
        }
    }

    /// Reads the pickup time as wall-clock time in `tz`. Times that do not
    /// exist or are ambiguous there are rejected.
    pub fn to_draft<Tz: TimeZone>(&self, tz: &Tz) -> Result<TransportDraft, CoreError> {
        let raw_time = required(&self.pickup_time, "pickup time")?;
        let invalid = || CoreError::InvalidField {
            field: "pickup time",
            value: raw_time.clone(),
        };
        let local = NaiveDateTime::parse_from_str(&raw_time, PICKUP_FORMAT).map_err(|_| invalid())?;
        let pickup_time = tz
            .from_local_datetime(&local)
            .single()
            .ok_or_else(invalid)?
            .with_timezone(&Utc);
        let draft = TransportDraft {
            constituent_id: self.constituent_id.trim().to_string(),
            pickup_address: self.pickup_address.trim().to_string(),
            pickup_time,
            status: self.status,
            driver_name: opt(&self.driver_name),
            notes: opt(&self.notes),
        };
        draft.validate()?;
        Ok(draft)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlotForm {
    pub latitude: String,
    pub longitude: String,
}

impl PlotForm {
    pub fn to_location(&self) -> Result<HouseLocation, CoreError> {
        Ok(HouseLocation {
            latitude: parse_coordinate(&self.latitude, "latitude", 90.0)?,
            longitude: parse_coordinate(&self.longitude, "longitude", 180.0)?,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct VoteForm {
    pub constituent_id: String,
    pub ballot_box_id: String,
    pub recorded_by: String,
}

impl VoteForm {
    pub fn to_request(&self) -> Result<NewVotingRecord, CoreError> {
        Ok(NewVotingRecord {
            constituent_id: required(&self.constituent_id, "constituent")?,
            ballot_box_id: required(&self.ballot_box_id, "ballot box")?,
            recorded_by: required(&self.recorded_by, "recorded by")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn support_form_builds_validated_request() {
        let form = SupportForm {
            candidate_id: " k-1 ".into(),
            level: SupportLevel::Leaning,
            assessed_by: "vol".into(),
            ..SupportForm::default()
        };
        let req = form.to_request("c-1").unwrap();
        assert_eq!(req.candidate_id.as_deref(), Some("k-1"));
        assert_eq!(req.notes, None);

        let bad = SupportForm {
            confidence: 0,
            ..form
        };
        assert_eq!(bad.to_request("c-1"), Err(CoreError::ConfidenceOutOfRange(0)));
    }

    #[test]
    fn outreach_follow_up_must_be_a_date() {
        let mut form = OutreachForm {
            constituent_id: "c-1".into(),
            contacted_by: "vol".into(),
            follow_up: "2024-07-01".into(),
            ..OutreachForm::default()
        };
        assert_eq!(
            form.to_request().unwrap().follow_up_date,
            NaiveDate::from_ymd_opt(2024, 7, 1)
        );
        form.follow_up = "next week".into();
        assert!(matches!(form.to_request(), Err(CoreError::InvalidField { .. })));
    }

    #[test]
    fn door_to_door_skips_unpicked_candidates() {
        let candidates: Vec<CandidateView> = ["k-1", "k-2", "k-3"]
            .iter()
            .map(|id| CandidateView {
                id: id.to_string(),
                ..CandidateView::default()
            })
            .collect();
        let mut form = DoorToDoorForm::for_candidates(&candidates);
        form.constituent_id = "c-9".into();
        form.canvasser = "vol".into();
        assert!(matches!(form.to_visit(), Err(CoreError::MissingField { .. })));

        form.set_pick("k-3", Some(SupportLevel::StrongSupporter));
        form.set_pick("k-1", Some(SupportLevel::Leaning));
        form.set_pick("k-unknown", Some(SupportLevel::Leaning));
        let visit = form.to_visit().unwrap();
        let ids: Vec<&str> = visit.picks.iter().map(|p| p.candidate_id.as_str()).collect();
        assert_eq!(ids, vec!["k-1", "k-3"]);
    }

    #[test]
    fn transport_form_round_trips_pickup_time() {
        let request = TransportRequest {
            id: "tr-1".into(),
            constituent_id: "c-1".into(),
            pickup_address: "1 Lagoon Way".into(),
            pickup_time: Utc.with_ymd_and_hms(2024, 9, 14, 8, 30, 0).unwrap(),
            status: TransportStatus::Assigned,
            driver_name: Some("Ravi".into()),
            notes: None,
        };
        let form = TransportForm::editing(&request, &Utc);
        assert_eq!(form.pickup_time, "2024-09-14T08:30");
        let draft = form.to_draft(&Utc).unwrap();
        assert_eq!(draft, TransportDraft::from(&request));
    }

    #[test]
    fn pickup_time_is_entered_in_local_time() {
        let island = FixedOffset::east_opt(5 * 3600).unwrap();
        let form = TransportForm {
            constituent_id: "c-1".into(),
            pickup_address: "1 Lagoon Way".into(),
            pickup_time: "2024-09-14T08:30".into(),
            ..TransportForm::default()
        };
        let draft = form.to_draft(&island).unwrap();
        assert_eq!(draft.pickup_time, Utc.with_ymd_and_hms(2024, 9, 14, 3, 30, 0).unwrap());

        let request = TransportRequest {
            id: "tr-2".into(),
            constituent_id: draft.constituent_id.clone(),
            pickup_address: draft.pickup_address.clone(),
            pickup_time: draft.pickup_time,
            status: draft.status,
            driver_name: None,
            notes: None,
        };
        assert_eq!(TransportForm::editing(&request, &island).pickup_time, "2024-09-14T08:30");
    }

    #[test]
    fn plot_form_rejects_out_of_range_coordinates() {
        let form = PlotForm {
            latitude: "4.17".into(),
            longitude: "73.51".into(),
        };
        assert_eq!(
            form.to_location().unwrap(),
            HouseLocation { latitude: 4.17, longitude: 73.51 }
        );
        let bad = PlotForm {
            latitude: "95".into(),
            ..form
        };
        assert!(bad.to_location().is_err());
        assert!(PlotForm::default().to_location().is_err());
    }

    #[test]
    fn vote_form_requires_every_field() {
        let form = VoteForm {
            constituent_id: "c-1".into(),
            ballot_box_id: " ".into(),
            recorded_by: "agent".into(),
        };
        assert_eq!(
            form.to_request(),
            Err(CoreError::MissingField { field: "ballot box" })
        );
    }
}
