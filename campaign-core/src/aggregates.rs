//! Chart-ready aggregates over already-fetched collections.

use crate::models::{
    Constituent, LevelCount, OutreachLog, OutreachMethod, OutreachOutcome, SupportAssessment,
    VoterRegistration, VotingRecord,
};
use crate::support::SupportLevel;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::hash::Hash;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBucket {
    Under25,
    Under35,
    Under45,
    Under55,
    Under65,
    SixtyFivePlus,
    Unknown,
}

impl AgeBucket {
    pub const ALL: [AgeBucket; 7] = [
        AgeBucket::Under25,
        AgeBucket::Under35,
        AgeBucket::Under45,
        AgeBucket::Under55,
        AgeBucket::Under65,
        AgeBucket::SixtyFivePlus,
        AgeBucket::Unknown,
    ];

    pub fn for_age(age: Option<u32>) -> Self {
        match age {
            None => AgeBucket::Unknown,
            Some(a) if a < 25 => AgeBucket::Under25,
            Some(a) if a < 35 => AgeBucket::Under35,
            Some(a) if a < 45 => AgeBucket::Under45,
            Some(a) if a < 55 => AgeBucket::Under55,
            Some(a) if a < 65 => AgeBucket::Under65,
            Some(_) => AgeBucket::SixtyFivePlus,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBucket::Under25 => "18-24",
            AgeBucket::Under35 => "25-34",
            AgeBucket::Under45 => "35-44",
            AgeBucket::Under55 => "45-54",
            AgeBucket::Under65 => "55-64",
            AgeBucket::SixtyFivePlus => "65+",
            AgeBucket::Unknown => "Unknown",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BucketCount<K> {
    pub key: K,
    pub label: String,
    pub count: usize,
}

/// Whole years between `dob` and `on`. Dates in the future yield `None`.
pub fn age_on(dob: NaiveDate, on: NaiveDate) -> Option<u32> {
    let mut years = on.year() - dob.year();
    if (on.month(), on.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Counts per age bucket, in fixed bucket order. Every voter lands in exactly
/// one bucket, so the counts sum to `voters.len()`.
pub fn age_buckets(voters: &[Constituent], on: NaiveDate) -> Vec<BucketCount<AgeBucket>> {
    let mut counts: HashMap<AgeBucket, usize> = HashMap::new();
    for voter in voters {
        let age = voter.dob.and_then(|dob| age_on(dob, on));
        *counts.entry(AgeBucket::for_age(age)).or_default() += 1;
    }
    AgeBucket::ALL
        .iter()
        .map(|&bucket| BucketCount {
            key: bucket,
            label: bucket.label().to_string(),
            count: counts.get(&bucket).copied().unwrap_or(0),
        })
        .collect()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderSplit {
    pub male: usize,
    pub female: usize,
    pub unknown: usize,
}

impl GenderSplit {
    pub fn total(&self) -> usize {
        self.male + self.female + self.unknown
    }
}

pub fn gender_split(voters: &[Constituent]) -> GenderSplit {
    let mut split = GenderSplit::default();
    for voter in voters {
        let sex = voter
            .sex
            .as_deref()
            .map(|s| s.trim().to_ascii_lowercase())
            .unwrap_or_default();
        match sex.as_str() {
            "m" | "male" => split.male += 1,
            "f" | "female" => split.female += 1,
            _ => split.unknown += 1,
        }
    }
    split
}

/// Count by key, sorted by count descending; ties keep first-encountered
/// order.
fn tally_by<T, K, F>(items: &[T], key_of: F) -> Vec<(K, usize)>
where
    K: Copy + Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut order: Vec<K> = Vec::new();
    let mut counts: HashMap<K, usize> = HashMap::new();
    for item in items {
        let key = key_of(item);
        let slot = counts.entry(key).or_insert_with(|| {
            order.push(key);
            0
        });
        *slot += 1;
    }
    let mut out: Vec<(K, usize)> = order.into_iter().map(|k| (k, counts[&k])).collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

pub fn outcome_tally(logs: &[OutreachLog]) -> Vec<BucketCount<OutreachOutcome>> {
    tally_by(logs, |l| l.outcome)
        .into_iter()
        .map(|(key, count)| BucketCount {
            key,
            label: key.label().to_string(),
            count,
        })
        .collect()
}

pub fn method_tally(logs: &[OutreachLog]) -> Vec<BucketCount<OutreachMethod>> {
    tally_by(logs, |l| l.method)
        .into_iter()
        .map(|(key, count)| BucketCount {
            key,
            label: key.label().to_string(),
            count,
        })
        .collect()
}

/// Latest assessment per (constituent, candidate). Equal timestamps keep
/// the one seen last. Output is ordered by constituent then candidate.
pub fn current_assessments(assessments: &[SupportAssessment]) -> Vec<SupportAssessment> {
    let mut latest: BTreeMap<(String, Option<String>), &SupportAssessment> = BTreeMap::new();
    for a in assessments {
        let key = (a.constituent_id.clone(), a.candidate_id.clone());
        match latest.get(&key) {
            Some(existing) if existing.assessed_at > a.assessed_at => {}
            _ => {
                latest.insert(key, a);
            }
        }
    }
    latest.into_values().cloned().collect()
}

/// Per-level counts of current assessments, optionally restricted to one
/// candidate. All five levels are always present.
pub fn support_distribution(
    assessments: &[SupportAssessment],
    candidate_id: Option<&str>,
) -> Vec<LevelCount> {
    let current = current_assessments(assessments);
    let mut counts: HashMap<SupportLevel, u64> = HashMap::new();
    for a in current
        .iter()
        .filter(|a| candidate_id.map_or(true, |c| a.candidate_id.as_deref() == Some(c)))
    {
        *counts.entry(a.support_level).or_default() += 1;
    }
    SupportLevel::ALL
        .iter()
        .map(|&level| LevelCount {
            support_level: level,
            voter_count: counts.get(&level).copied().unwrap_or(0),
        })
        .collect()
}

/// `Σ(weight × voters) / Σ(voters)`; zero voters scores 0. Always within
/// [-2, 2].
pub fn party_support_score(levels: &[LevelCount]) -> f64 {
    let (weighted, voters) = levels.iter().fold((0i64, 0u64), |(w, v), lc| {
        (
            w + i64::from(lc.support_level.weight()) * lc.voter_count as i64,
            v + lc.voter_count,
        )
    });
    if voters == 0 {
        0.0
    } else {
        weighted as f64 / voters as f64
    }
}

/// Level with the most voters; ties go to the first encountered. `None` for
/// an empty slice.
pub fn top_level(levels: &[LevelCount]) -> Option<&LevelCount> {
    levels.iter().fold(None, |best: Option<&LevelCount>, lc| match best {
        Some(b) if b.voter_count >= lc.voter_count => Some(b),
        _ => Some(lc),
    })
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnoutRow {
    pub key: String,
    pub registered: usize,
    pub voted: usize,
}

impl TurnoutRow {
    /// Proportion of registered voters who voted, in [0, 1].
    pub fn ratio(&self) -> f64 {
        if self.registered == 0 {
            0.0
        } else {
            self.voted as f64 / self.registered as f64
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnoutBy {
    Constituency,
    BallotBox,
}

/// Registered vs voted per constituency or ballot box. Only registered
/// constituents count as voted; duplicate records count once.
pub fn turnout(
    registrations: &[VoterRegistration],
    records: &[VotingRecord],
    by: TurnoutBy,
) -> Vec<TurnoutRow> {
    let voted: HashSet<&str> = records.iter().map(|r| r.constituent_id.as_str()).collect();
    let mut rows: BTreeMap<String, TurnoutRow> = BTreeMap::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for reg in registrations {
        if !seen.insert(reg.constituent_id.as_str()) {
            continue;
        }
        let key = match by {
            TurnoutBy::Constituency => reg.constituency.clone(),
            TurnoutBy::BallotBox => reg.ballot_box_id.clone(),
        };
        let row = rows.entry(key.clone()).or_insert(TurnoutRow {
            key,
            registered: 0,
            voted: 0,
        });
        row.registered += 1;
        if voted.contains(reg.constituent_id.as_str()) {
            row.voted += 1;
        }
    }
    rows.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn voter(id: &str, sex: Option<&str>, dob: Option<(i32, u32, u32)>) -> Constituent {
        Constituent {
            id: id.into(),
            first_name: "First".into(),
            last_name: "Last".into(),
            sex: sex.map(Into::into),
            dob: dob.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
            ..Default::default()
        }
    }

    fn assessment(
        id: &str,
        constituent: &str,
        candidate: Option<&str>,
        level: SupportLevel,
        day: u32,
    ) -> SupportAssessment {
        SupportAssessment {
            id: id.into(),
            constituent_id: constituent.into(),
            candidate_id: candidate.map(Into::into),
            support_level: level,
            confidence: 3,
            assessed_by: "vol".into(),
            assessed_at: Utc.with_ymd_and_hms(2024, 5, day, 12, 0, 0).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn age_is_counted_in_whole_years() {
        let dob = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
        assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()), Some(23));
        assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()), Some(24));
        assert_eq!(age_on(dob, NaiveDate::from_ymd_opt(1999, 1, 1).unwrap()), None);
    }

    #[test]
    fn age_buckets_use_fixed_breakpoints() {
        let on = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let voters = vec![
            voter("a", None, Some((2001, 1, 1))), // 23
            voter("b", None, Some((1999, 1, 1))), // 25
            voter("c", None, Some((1959, 1, 1))), // 65
            voter("d", None, None),
        ];
        let buckets = age_buckets(&voters, on);
        let count = |b: AgeBucket| buckets.iter().find(|c| c.key == b).unwrap().count;
        assert_eq!(count(AgeBucket::Under25), 1);
        assert_eq!(count(AgeBucket::Under35), 1);
        assert_eq!(count(AgeBucket::SixtyFivePlus), 1);
        assert_eq!(count(AgeBucket::Unknown), 1);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), voters.len());
    }

    #[test]
    fn gender_split_is_case_insensitive() {
        let voters = vec![
            voter("a", Some("M"), None),
            voter("b", Some("female"), None),
            voter("c", Some("f"), None),
            voter("d", Some("x"), None),
            voter("e", None, None),
        ];
        let split = gender_split(&voters);
        assert_eq!(split, GenderSplit { male: 1, female: 2, unknown: 2 });
        assert_eq!(split.total(), 5);
    }

    #[test]
    fn current_assessment_is_latest_by_date() {
        let all = vec![
            assessment("1", "c1", Some("k1"), SupportLevel::HardOpposition, 1),
            assessment("2", "c1", Some("k1"), SupportLevel::Leaning, 3),
            assessment("3", "c1", Some("k1"), SupportLevel::Undecided, 2),
            assessment("4", "c1", Some("k2"), SupportLevel::StrongSupporter, 1),
        ];
        let current = current_assessments(&all);
        assert_eq!(current.len(), 2);
        let k1 = current.iter().find(|a| a.candidate_id.as_deref() == Some("k1")).unwrap();
        assert_eq!(k1.support_level, SupportLevel::Leaning);
    }

    #[test]
    fn example_scenario_score_and_top_level() {
        let all = vec![
            assessment("1", "c1", Some("k1"), SupportLevel::StrongSupporter, 1),
            assessment("2", "c2", Some("k1"), SupportLevel::StrongSupporter, 1),
            assessment("3", "c3", Some("k1"), SupportLevel::Undecided, 1),
        ];
        let dist = support_distribution(&all, Some("k1"));
        let score = party_support_score(&dist);
        assert!((score - 4.0 / 3.0).abs() < 1e-9);
        let top = top_level(&dist).unwrap();
        assert_eq!(top.support_level, SupportLevel::StrongSupporter);
        assert_eq!(top.voter_count, 2);
    }

    #[test]
    fn score_of_nobody_is_zero() {
        assert_eq!(party_support_score(&[]), 0.0);
        let zeros: Vec<LevelCount> = SupportLevel::ALL
            .iter()
            .map(|&l| LevelCount { support_level: l, voter_count: 0 })
            .collect();
        assert_eq!(party_support_score(&zeros), 0.0);
    }

    #[test]
    fn top_level_ties_go_to_first() {
        let levels = vec![
            LevelCount { support_level: SupportLevel::Undecided, voter_count: 3 },
            LevelCount { support_level: SupportLevel::Leaning, voter_count: 3 },
        ];
        assert_eq!(top_level(&levels).unwrap().support_level, SupportLevel::Undecided);
        assert!(top_level(&[]).is_none());
    }

    #[test]
    fn outcome_tally_sorts_by_count_then_first_seen() {
        let log = |outcome| OutreachLog {
            id: "x".into(),
            constituent_id: "c".into(),
            method: OutreachMethod::Phone,
            outcome,
            contacted_by: "v".into(),
            contacted_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            follow_up_date: None,
            notes: None,
        };
        let logs = vec![
            log(OutreachOutcome::NotHome),
            log(OutreachOutcome::Contacted),
            log(OutreachOutcome::Contacted),
            log(OutreachOutcome::Refused),
        ];
        let tally = outcome_tally(&logs);
        let keys: Vec<_> = tally.iter().map(|t| t.key).collect();
        assert_eq!(
            keys,
            vec![OutreachOutcome::Contacted, OutreachOutcome::NotHome, OutreachOutcome::Refused]
        );
        assert_eq!(method_tally(&logs)[0].count, 4);
    }

    #[test]
    fn turnout_counts_distinct_registered_voters() {
        let reg = |id: &str, bx: &str, c: &str| VoterRegistration {
            constituent_id: id.into(),
            ballot_box_id: bx.into(),
            constituency: c.into(),
            island: String::new(),
        };
        let rec = |id: &str| VotingRecord {
            id: format!("r-{id}"),
            constituent_id: id.into(),
            ballot_box_id: "b1".into(),
            voted_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            recorded_by: "agent".into(),
        };
        let regs = vec![reg("a", "b1", "North"), reg("b", "b1", "North"), reg("c", "b2", "South")];
        let records = vec![rec("a"), rec("a"), rec("z")];

        let by_constituency = turnout(&regs, &records, TurnoutBy::Constituency);
        assert_eq!(by_constituency.len(), 2);
        assert_eq!(by_constituency[0].key, "North");
        assert_eq!(by_constituency[0].voted, 1);
        assert!((by_constituency[0].ratio() - 0.5).abs() < 1e-9);
        assert_eq!(by_constituency[1].ratio(), 0.0);

        let by_box = turnout(&regs, &records, TurnoutBy::BallotBox);
        assert_eq!(by_box.iter().map(|r| r.registered).sum::<usize>(), 3);
    }
}
