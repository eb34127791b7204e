use crate::cli::{Cli, Command, MapKind, TurnoutGrouping};
use campaign_api::hooks::{ConstituentFilter, OutreachFilter};
use campaign_api::CampaignApi;
use campaign_core::aggregates::{
    age_buckets, gender_split, party_support_score, top_level, AgeBucket, BucketCount,
    GenderSplit, TurnoutBy, TurnoutRow,
};
use campaign_core::heatmap::{contact_heatmap, ContactHeatmap, HEATMAP_DAYS};
use campaign_core::SupportLevel;
use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

/// Upper bound on voters pulled for demographics.
const VOTER_SAMPLE: usize = 50_000;

#[derive(Debug, Serialize)]
pub struct PartyScore {
    pub party_id: String,
    pub party_name: String,
    pub score: f64,
    pub voters: u64,
    pub top_level: Option<SupportLevel>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub group: String,
    pub on: NaiveDate,
    pub constituency: Option<String>,
    pub voters: usize,
    pub ages: Vec<BucketCount<AgeBucket>>,
    pub gender: GenderSplit,
    pub contacts: ContactHeatmap,
    pub parties: Vec<PartyScore>,
    pub turnout: Vec<TurnoutRow>,
}

/// Contacts are counted per local calendar day, matching how `on` defaults.
pub async fn heatmap(api: &CampaignApi, on: NaiveDate) -> anyhow::Result<ContactHeatmap> {
    let filter = OutreachFilter {
        constituent_id: None,
        since: Some(on - Duration::days(HEATMAP_DAYS as i64 - 1)),
    };
    let logs = api.outreach(&filter).await?;
    Ok(contact_heatmap(&logs, on, &Local))
}

pub async fn party_scores(
    api: &CampaignApi,
    constituency: Option<&str>,
) -> anyhow::Result<Vec<PartyScore>> {
    let rows = api.party_support(constituency).await?;
    Ok(rows
        .into_iter()
        .map(|p| PartyScore {
            score: party_support_score(&p.levels),
            voters: p.levels.iter().map(|l| l.voter_count).sum(),
            top_level: top_level(&p.levels)
                .filter(|l| l.voter_count > 0)
                .map(|l| l.support_level),
            party_id: p.party_id,
            party_name: p.party_name,
        })
        .collect())
}

pub async fn summary(
    api: &CampaignApi,
    constituency: Option<&str>,
    on: NaiveDate,
) -> anyhow::Result<Summary> {
    let group = api.group().await?;
    let voters = api
        .constituents(&ConstituentFilter {
            constituency: constituency.map(str::to_string),
            search: None,
            offset: 0,
            limit: VOTER_SAMPLE,
        })
        .await?;
    if voters.items.len() < voters.total {
        info!(
            fetched = voters.items.len(),
            total = voters.total,
            "demographics cover a sample of voters"
        );
    }
    Ok(Summary {
        group: group.name,
        on,
        constituency: constituency.map(str::to_string),
        voters: voters.total,
        ages: age_buckets(&voters.items, on),
        gender: gender_split(&voters.items),
        contacts: heatmap(api, on).await?,
        parties: party_scores(api, constituency).await?,
        turnout: api.turnout(constituency, TurnoutBy::Constituency).await?,
    })
}

/// Runs one subcommand and returns its JSON document.
pub async fn run(api: &CampaignApi, cli: &Cli, today: NaiveDate) -> anyhow::Result<Value> {
    let on = cli.on.unwrap_or(today);
    let constituency = cli.constituency.as_deref();
    let doc = match &cli.command {
        Command::Summary => serde_json::to_value(summary(api, constituency, on).await?)?,
        Command::Heatmap => serde_json::to_value(heatmap(api, on).await?)?,
        Command::PartyScores => serde_json::to_value(party_scores(api, constituency).await?)?,
        Command::Turnout { by } => {
            let by = match by {
                TurnoutGrouping::Constituency => TurnoutBy::Constituency,
                TurnoutGrouping::BallotBox => TurnoutBy::BallotBox,
            };
            serde_json::to_value(api.turnout(constituency, by).await?)?
        }
        Command::Hexmap { kind, candidate } => {
            let map = match kind {
                MapKind::Support => api.support_hexmap(candidate.as_deref(), constituency).await?,
                MapKind::Parties => api.party_hexmap(constituency).await?,
            };
            map.to_value()
        }
    };
    Ok(doc)
}
