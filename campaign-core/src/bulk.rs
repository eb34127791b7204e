//! Grouping for address-level (door-to-door) support logging.

use crate::models::BatchSupportAssessment;
use crate::support::SupportLevel;

/// A canvasser's pick for one candidate at the door.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidatePick {
    pub candidate_id: String,
    pub level: SupportLevel,
}

/// Groups candidate ids by identical support level, in first-encountered
/// level order, so one batched write is issued per distinct level.
/// Duplicate candidate ids keep their first pick.
pub fn group_by_level(picks: &[CandidatePick]) -> Vec<(SupportLevel, Vec<String>)> {
    let mut groups: Vec<(SupportLevel, Vec<String>)> = Vec::new();
    let mut seen: Vec<&str> = Vec::new();
    for pick in picks {
        if seen.contains(&pick.candidate_id.as_str()) {
            continue;
        }
        seen.push(&pick.candidate_id);
        match groups.iter_mut().find(|(level, _)| *level == pick.level) {
            Some((_, ids)) => ids.push(pick.candidate_id.clone()),
            None => groups.push((pick.level, vec![pick.candidate_id.clone()])),
        }
    }
    groups
}

pub fn batch_requests(
    constituent_id: &str,
    picks: &[CandidatePick],
    confidence: u8,
    assessed_by: &str,
) -> Vec<BatchSupportAssessment> {
    group_by_level(picks)
        .into_iter()
        .map(|(support_level, candidate_ids)| BatchSupportAssessment {
            constituent_id: constituent_id.to_string(),
            candidate_ids,
            support_level,
            confidence,
            assessed_by: assessed_by.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(id: &str, level: SupportLevel) -> CandidatePick {
        CandidatePick {
            candidate_id: id.into(),
            level,
        }
    }

    #[test]
    fn one_group_per_distinct_level() {
        let picks = vec![
            pick("k1", SupportLevel::Leaning),
            pick("k2", SupportLevel::StrongSupporter),
            pick("k3", SupportLevel::Leaning),
            pick("k1", SupportLevel::HardOpposition),
        ];
        let groups = group_by_level(&picks);
        assert_eq!(
            groups,
            vec![
                (SupportLevel::Leaning, vec!["k1".to_string(), "k3".to_string()]),
                (SupportLevel::StrongSupporter, vec!["k2".to_string()]),
            ]
        );
    }

    #[test]
    fn batch_requests_carry_shared_fields() {
        let reqs = batch_requests("c-9", &[pick("k1", SupportLevel::Undecided)], 4, "vol-2");
        assert_eq!(reqs.len(), 1);
        assert_eq!(reqs[0].constituent_id, "c-9");
        assert_eq!(reqs[0].confidence, 4);
        assert!(batch_requests("c-9", &[], 4, "vol-2").is_empty());
    }
}
