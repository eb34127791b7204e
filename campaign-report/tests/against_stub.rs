use campaign_api::{ApiConfig, CampaignApi};
use campaign_report::{run, Cli};
use campaign_stub::seed::{demo_data, DEMO_GROUP_ID};
use campaign_stub::{router, StubState};
use chrono::Utc;
use clap::Parser;
use tokio::net::TcpListener;

async fn api() -> CampaignApi {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(StubState::new(demo_data()));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    CampaignApi::new(&ApiConfig::new(format!("http://{addr}"), DEMO_GROUP_ID))
}

async fn report(args: &[&str]) -> serde_json::Value {
    let api = api().await;
    let cli = Cli::try_parse_from(std::iter::once("campaign-report").chain(args.iter().copied())).unwrap();
    run(&api, &cli, Utc::now().date_naive()).await.unwrap()
}

#[tokio::test]
async fn summary_ages_cover_every_voter() {
    let doc = report(&["summary"]).await;
    let voters = doc["voters"].as_u64().unwrap();
    let bucketed: u64 = doc["ages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["count"].as_u64().unwrap())
        .sum();
    assert_eq!(voters, 24);
    assert_eq!(bucketed, voters);
    assert_eq!(doc["contacts"]["days"].as_array().unwrap().len(), 30);
}

#[tokio::test]
async fn party_scores_stay_in_range() {
    let doc = report(&["party-scores", "--constituency", "North Harbour"]).await;
    for party in doc.as_array().unwrap() {
        let score = party["score"].as_f64().unwrap();
        assert!((-2.0..=2.0).contains(&score));
    }
}

#[tokio::test]
async fn hexmap_prints_a_feature_collection() {
    let doc = report(&["hexmap", "--kind", "parties"]).await;
    assert_eq!(doc["type"], "FeatureCollection");
    assert!(doc["features"].as_array().is_some_and(|f| !f.is_empty()));
}
