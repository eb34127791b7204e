//! Trailing 30-day outreach calendar.

use crate::models::OutreachLog;
use chrono::{Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const HEATMAP_DAYS: usize = 30;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactHeatmap {
    /// Oldest first; the last entry is the reference day.
    pub days: Vec<DayCount>,
    pub max: u32,
    pub total: u32,
    pub average: u32,
    pub streak: u32,
    /// Percentage change of the second half over the first half.
    pub trend_pct: i64,
}

impl ContactHeatmap {
    /// Colour intensity in [0, 1] for one day, scaled by the busiest day.
    pub fn intensity(&self, count: u32) -> f64 {
        if self.max == 0 {
            0.0
        } else {
            f64::from(count) / f64::from(self.max)
        }
    }
}

/// Builds the heatmap for the 30 calendar days ending on `today`
/// (inclusive). Contacts are bucketed by their calendar day in `tz`, the zone
/// `today` was read in. Contacts outside the window are ignored.
pub fn contact_heatmap<Tz: TimeZone>(
    logs: &[OutreachLog],
    today: NaiveDate,
    tz: &Tz,
) -> ContactHeatmap {
    let start = today - Duration::days(HEATMAP_DAYS as i64 - 1);
    let mut per_day: HashMap<NaiveDate, u32> = HashMap::new();
    for log in logs {
        let day = log.contacted_at.with_timezone(tz).date_naive();
        if day >= start && day <= today {
            *per_day.entry(day).or_default() += 1;
        }
    }

    let days: Vec<DayCount> = (0..HEATMAP_DAYS as i64)
        .map(|offset| {
            let date = start + Duration::days(offset);
            DayCount {
                date,
                count: per_day.get(&date).copied().unwrap_or(0),
            }
        })
        .collect();

    let counts: Vec<u32> = days.iter().map(|d| d.count).collect();
    let total: u32 = counts.iter().sum();
    ContactHeatmap {
        max: counts.iter().copied().max().unwrap_or(0),
        total,
        average: (f64::from(total) / HEATMAP_DAYS as f64).round() as u32,
        streak: trailing_streak(&counts),
        trend_pct: half_over_half(&counts),
        days,
    }
}

fn trailing_streak(counts: &[u32]) -> u32 {
    counts.iter().rev().take_while(|&&c| c > 0).count() as u32
}

fn half_over_half(counts: &[u32]) -> i64 {
    let mid = counts.len() / 2;
    let first: u32 = counts[..mid].iter().sum();
    let second: u32 = counts[mid..].iter().sum();
    if first == 0 {
        return if second > 0 { 100 } else { 0 };
    }
    ((f64::from(second) - f64::from(first)) / f64::from(first) * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OutreachMethod, OutreachOutcome};
    use chrono::{FixedOffset, Utc};

    fn contact(date: NaiveDate) -> OutreachLog {
        OutreachLog {
            id: date.to_string(),
            constituent_id: "c".into(),
            method: OutreachMethod::DoorToDoor,
            outcome: OutreachOutcome::Contacted,
            contacted_by: "v".into(),
            contacted_at: Utc.from_utc_datetime(&date.and_hms_opt(10, 0, 0).unwrap()),
            follow_up_date: None,
            notes: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[test]
    fn window_is_thirty_days_ending_today() {
        let today = day(30);
        let map = contact_heatmap(&[], today, &Utc);
        assert_eq!(map.days.len(), HEATMAP_DAYS);
        assert_eq!(map.days.first().unwrap().date, day(1));
        assert_eq!(map.days.last().unwrap().date, today);
        assert_eq!(map.total, 0);
        assert_eq!(map.trend_pct, 0);
        assert_eq!(map.intensity(0), 0.0);
    }

    #[test]
    fn stats_follow_daily_counts() {
        let today = day(30);
        let logs = vec![
            contact(day(30)),
            contact(day(30)),
            contact(day(29)),
            contact(day(27)),
            contact(day(2)),
            contact(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
        ];
        let map = contact_heatmap(&logs, today, &Utc);
        assert_eq!(map.total, 5);
        assert_eq!(map.max, 2);
        assert_eq!(map.average, 0);
        assert_eq!(map.streak, 2);
        // 1 contact in the first half, 4 in the second.
        assert_eq!(map.trend_pct, 300);
        assert_eq!(map.intensity(1), 0.5);
    }

    #[test]
    fn streak_is_zero_when_today_is_quiet() {
        let map = contact_heatmap(&[contact(day(29)), contact(day(28))], day(30), &Utc);
        assert_eq!(map.streak, 0);
    }

    #[test]
    fn empty_first_half_trends_to_hundred() {
        let map = contact_heatmap(&[contact(day(25))], day(30), &Utc);
        assert_eq!(map.trend_pct, 100);
    }

    #[test]
    fn early_morning_contacts_count_on_the_local_day() {
        let island = FixedOffset::east_opt(5 * 3600).unwrap();
        let local = NaiveDate::from_ymd_opt(2024, 7, 1)
            .unwrap()
            .and_hms_opt(2, 0, 0)
            .unwrap();
        let mut log = contact(day(1));
        log.contacted_at = island
            .from_local_datetime(&local)
            .unwrap()
            .with_timezone(&Utc);
        let today = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();

        let map = contact_heatmap(std::slice::from_ref(&log), today, &island);
        assert_eq!(map.days.last().unwrap().count, 1);
        assert_eq!(map.streak, 1);

        // the same instant is still June 30 in UTC
        let utc = contact_heatmap(&[log], today, &Utc);
        assert_eq!(utc.days.last().unwrap().count, 0);
        assert_eq!(utc.streak, 0);
    }
}
