//! Demo campaign used by the stub binary and the API client's tests.

use crate::store::StubData;
use campaign_core::models::{
    CandidateView, Constituent, ConstituentDetail, Group, OutreachLog, OutreachMethod,
    OutreachOutcome, Party, PartyAffiliation, SupportAssessment, TransportRequest,
    TransportStatus, VoterRegistration, VotingRecord,
};
use campaign_core::SupportLevel;
use chrono::{Duration, NaiveDate, Utc};

pub const DEMO_GROUP_ID: &str = "g-demo";

const FIRST_NAMES: [&str; 8] = ["Aisha", "Ben", "Chen", "Dina", "Emil", "Fatma", "Gus", "Hana"];
const LAST_NAMES: [&str; 6] = ["Rasheed", "Lee", "Silva", "Moreau", "Khan", "Ito"];
const CONSTITUENCIES: [(&str, &str, f64, f64); 2] = [
    ("North Harbour", "North Isle", 4.1755, 73.5093),
    ("South Reef", "South Isle", 4.1420, 73.4880),
];

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn parties() -> Vec<Party> {
    vec![
        Party {
            id: "p-harbour".into(),
            name: "Harbour Alliance".into(),
            short_name: "HA".into(),
            color: Some("#1f78b4".into()),
        },
        Party {
            id: "p-green".into(),
            name: "Green Islands".into(),
            short_name: "GI".into(),
            color: Some("#33a02c".into()),
        },
        Party {
            id: "p-indep".into(),
            name: "Independents".into(),
            short_name: "IND".into(),
            color: None,
        },
    ]
}

fn candidates() -> Vec<CandidateView> {
    let candidate = |id: &str, name: &str, constituency: &str, party: (&str, &str)| CandidateView {
        id: id.into(),
        name: name.into(),
        constituency: constituency.into(),
        party_id: Some(party.0.into()),
        party_name: Some(party.1.into()),
    };
    vec![
        candidate("k-1", "Mara Quill", "North Harbour", ("p-harbour", "Harbour Alliance")),
        candidate("k-2", "Omar Tide", "North Harbour", ("p-green", "Green Islands")),
        candidate("k-3", "Lena Shore", "South Reef", ("p-harbour", "Harbour Alliance")),
    ]
}

fn constituents() -> Vec<ConstituentDetail> {
    (0..24)
        .map(|n| {
            let (constituency, island, lat, lng) = CONSTITUENCIES[n % 2];
            let offset = (n / 2) as f64 * 0.004;
            let plotted = n % 5 != 4;
            let affiliations = if n % 3 == 0 {
                vec![PartyAffiliation {
                    party_id: "p-harbour".into(),
                    party_name: "Harbour Alliance".into(),
                    start_date: date(2012, 1, 1),
                    end_date: (n % 2 == 0).then(|| date(2019, 12, 31)),
                }]
            } else {
                Vec::new()
            };
            ConstituentDetail {
                constituent: Constituent {
                    id: format!("c-{:03}", n + 1),
                    first_name: FIRST_NAMES[n % FIRST_NAMES.len()].into(),
                    last_name: LAST_NAMES[n % LAST_NAMES.len()].into(),
                    national_id: format!("A{:06}", 310_000 + n * 17),
                    sex: Some(if n % 2 == 0 { "F" } else { "M" }.into()),
                    dob: (n % 7 != 6).then(|| date(1950 + (n as i32 * 3) % 55, 1 + (n as u32 % 12), 10)),
                    address: format!("{} Lagoon Way", n + 1),
                    island: island.into(),
                    constituency: constituency.into(),
                    latitude: plotted.then_some(lat + offset),
                    longitude: plotted.then_some(lng + offset / 2.0),
                },
                profile: (n % 4 == 0).then(|| "Fisher, attends community meetings".into()),
                nicknames: if n % 6 == 0 { vec!["Captain".into()] } else { Vec::new() },
                party_affiliations: affiliations,
            }
        })
        .collect()
}

pub fn demo_data() -> StubData {
    let now = Utc::now();
    let mut data = StubData::default();
    data.group = Group {
        id: DEMO_GROUP_ID.into(),
        name: "Island Coast Campaign".into(),
        candidates: candidates(),
    };
    data.parties = parties();
    data.constituents = constituents();

    for (n, detail) in data.constituents.iter().enumerate() {
        let c = &detail.constituent;
        let level = SupportLevel::ALL[n % SupportLevel::ALL.len()];
        let candidate = if c.constituency == "North Harbour" {
            if n % 4 == 0 { "k-2" } else { "k-1" }
        } else {
            "k-3"
        };
        data.assessments.push(SupportAssessment {
            id: format!("sa-seed-{}", n + 1),
            constituent_id: c.id.clone(),
            candidate_id: Some(candidate.into()),
            support_level: level,
            confidence: 1 + (n % 5) as u8,
            assessed_by: "seed".into(),
            assessed_at: now - Duration::days(20 - (n as i64 % 20)),
            notes: None,
        });

        if n % 3 != 2 {
            data.outreach.push(OutreachLog {
                id: format!("or-seed-{}", n + 1),
                constituent_id: c.id.clone(),
                method: if n % 2 == 0 { OutreachMethod::DoorToDoor } else { OutreachMethod::Phone },
                outcome: match n % 4 {
                    0 => OutreachOutcome::Contacted,
                    1 => OutreachOutcome::NotHome,
                    2 => OutreachOutcome::FollowUpRequired,
                    _ => OutreachOutcome::Refused,
                },
                contacted_by: "seed".into(),
                contacted_at: now - Duration::days((n as i64 * 2) % 29),
                follow_up_date: None,
                notes: None,
            });
        }

        data.registrations.push(VoterRegistration {
            constituent_id: c.id.clone(),
            ballot_box_id: format!("box-{}", 1 + n % 3),
            constituency: c.constituency.clone(),
            island: c.island.clone(),
        });

        if n % 4 == 1 {
            data.votes.push(VotingRecord {
                id: format!("vr-seed-{}", n + 1),
                constituent_id: c.id.clone(),
                ballot_box_id: format!("box-{}", 1 + n % 3),
                voted_at: now - Duration::hours(2),
                recorded_by: "seed".into(),
            });
        }

        if n % 6 == 2 {
            data.transport.push(TransportRequest {
                id: format!("tr-seed-{}", n + 1),
                constituent_id: c.id.clone(),
                pickup_address: c.address.clone(),
                pickup_time: now + Duration::hours(3),
                status: if n % 12 == 2 { TransportStatus::Pending } else { TransportStatus::Assigned },
                driver_name: (n % 12 != 2).then(|| "Ravi".into()),
                notes: None,
            });
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_data_is_consistent() {
        let data = demo_data();
        assert_eq!(data.group.id, DEMO_GROUP_ID);
        assert_eq!(data.registrations.len(), data.constituents.len());
        assert!(data.constituents.iter().any(|c| !c.constituent.is_plotted()));
        assert!(!data.transport.is_empty());
        let ids: Vec<&str> = data.constituents.iter().map(|c| c.constituent.id.as_str()).collect();
        assert!(data.votes.iter().all(|v| ids.contains(&v.constituent_id.as_str())));
        assert!(data
            .transport
            .iter()
            .all(|t| !data.votes.iter().any(|v| v.constituent_id == t.constituent_id)));
    }
}
