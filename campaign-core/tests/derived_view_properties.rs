use campaign_core::aggregates::{age_buckets, party_support_score, support_distribution};
use campaign_core::heatmap::{contact_heatmap, HEATMAP_DAYS};
use campaign_core::models::{
    Constituent, LevelCount, OutreachLog, OutreachMethod, OutreachOutcome, SupportAssessment,
};
use campaign_core::pagination::paginate;
use campaign_core::SupportLevel;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use proptest::test_runner::Config;

fn reference_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()
}

fn level() -> impl Strategy<Value = SupportLevel> {
    (0usize..5).prop_map(|i| SupportLevel::ALL[i])
}

fn voters() -> impl Strategy<Value = Vec<Constituent>> {
    prop::collection::vec(prop::option::of(0i64..40_000), 0..64).prop_map(|dobs| {
        dobs.into_iter()
            .enumerate()
            .map(|(i, days_old)| Constituent {
                id: format!("c-{i}"),
                dob: days_old.map(|d| reference_day() - Duration::days(d)),
                ..Default::default()
            })
            .collect()
    })
}

fn contacts() -> impl Strategy<Value = Vec<OutreachLog>> {
    prop::collection::vec(0i64..60, 0..120).prop_map(|ages| {
        ages.into_iter()
            .enumerate()
            .map(|(i, days_ago)| {
                let day = reference_day() - Duration::days(days_ago);
                OutreachLog {
                    id: format!("o-{i}"),
                    constituent_id: "c".into(),
                    method: OutreachMethod::Phone,
                    outcome: OutreachOutcome::Contacted,
                    contacted_by: "v".into(),
                    contacted_at: Utc.from_utc_datetime(&day.and_hms_opt(8, 30, 0).unwrap()),
                    follow_up_date: None,
                    notes: None,
                }
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn age_bucket_counts_sum_to_input(voters in voters()) {
        let buckets = age_buckets(&voters, reference_day());
        prop_assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), voters.len());
        prop_assert_eq!(age_buckets(&voters, reference_day()), buckets);
    }

    #[test]
    fn party_score_is_bounded(counts in prop::collection::vec((level(), 0u64..10_000), 0..12)) {
        let levels: Vec<LevelCount> = counts
            .into_iter()
            .map(|(support_level, voter_count)| LevelCount { support_level, voter_count })
            .collect();
        let score = party_support_score(&levels);
        prop_assert!((-2.0..=2.0).contains(&score));
        if levels.iter().all(|l| l.voter_count == 0) {
            prop_assert_eq!(score, 0.0);
        }
    }

    #[test]
    fn distribution_counts_each_pair_once(levels in prop::collection::vec(level(), 0..40)) {
        let assessments: Vec<SupportAssessment> = levels
            .iter()
            .enumerate()
            .map(|(i, &support_level)| SupportAssessment {
                id: format!("a-{i}"),
                constituent_id: format!("c-{}", i % 7),
                candidate_id: Some("k".into()),
                support_level,
                confidence: 3,
                assessed_by: "v".into(),
                assessed_at: Utc.timestamp_opt(1_700_000_000 + i as i64, 0).unwrap(),
                notes: None,
            })
            .collect();
        let dist = support_distribution(&assessments, Some("k"));
        let voters: u64 = dist.iter().map(|l| l.voter_count).sum();
        prop_assert_eq!(voters as usize, levels.len().min(7));
    }

    #[test]
    fn heatmap_stats_agree_with_days(logs in contacts()) {
        let map = contact_heatmap(&logs, reference_day(), &Utc);
        prop_assert_eq!(map.days.len(), HEATMAP_DAYS);
        prop_assert_eq!(map.total, map.days.iter().map(|d| d.count).sum::<u32>());
        prop_assert_eq!(map.average, (f64::from(map.total) / 30.0).round() as u32);
        if map.days.last().map(|d| d.count) == Some(0) {
            prop_assert_eq!(map.streak, 0);
        }
        prop_assert_eq!(contact_heatmap(&logs, reference_day(), &Utc), map);
    }

    #[test]
    fn pages_never_overrun_total(len in 0usize..200, offset in 0usize..300, limit in 0usize..50) {
        let items: Vec<usize> = (0..len).collect();
        let page = paginate(&items, offset, limit);
        prop_assert_eq!(page.total, len);
        prop_assert!(page.offset + page.items.len() <= page.total);
        if offset >= len {
            prop_assert!(page.items.is_empty());
        }
    }
}
