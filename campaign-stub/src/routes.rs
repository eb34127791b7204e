use crate::error::StubError;
use crate::store::StubState;
use axum::{
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    routing::{delete, get, post, put},
    Json, Router,
};
use campaign_core::models::{
    BatchSupportAssessment, CandidateView, Constituent, ConstituentDetail, Group, HouseLocation,
    NewOutreachLog, NewSupportAssessment, NewVotingRecord, OutreachLog, Page, Party,
    PartySupport, SupportAssessment, TransportDraft, TransportRequest, TransportStatus,
    VoterRegistration, VotingRecord,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

type Reply<T> = Result<Json<T>, StubError>;
type Created<T> = Result<(StatusCode, Json<T>), StubError>;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    constituency: Option<String>,
    search: Option<String>,
    #[serde(default)]
    offset: usize,
    #[serde(default)]
    limit: usize,
    constituent_id: Option<String>,
    candidate_id: Option<String>,
    since: Option<NaiveDate>,
    status: Option<TransportStatus>,
}

pub fn router(state: StubState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/group/:group", get(group))
        .route("/groups/:group/candidates", get(candidates))
        .route("/groups/:group/parties", get(parties))
        .route("/groups/:group/constituents", get(constituents))
        .route("/groups/:group/constituents/:id", get(constituent))
        .route("/groups/:group/constituents/:id/location", put(plot_house))
        .route("/groups/:group/support", get(support).post(log_support))
        .route("/groups/:group/support/batch", post(log_support_batch))
        .route("/groups/:group/support/parties", get(party_support))
        .route("/groups/:group/outreach", get(outreach).post(log_outreach))
        .route("/groups/:group/transport", get(transport).post(create_transport))
        .route("/groups/:group/transport/:id", put(update_transport))
        .route("/groups/:group/voting/registrations", get(registrations))
        .route("/groups/:group/voting/records", get(votes).post(record_vote))
        .route("/groups/:group/voting/records/:id", delete(undo_vote))
        .route("/groups/:group/hexmap/support", get(support_hexmap))
        .route("/groups/:group/hexmap/parties", get(party_hexmap))
        .layer(cors)
        .with_state(state)
}

fn check_group(state: &StubState, group: &str) -> Result<(), StubError> {
    if state.group_id() == group {
        Ok(())
    } else {
        Err(StubError::NotFound("group"))
    }
}

async fn group(State(state): State<StubState>, Path(group): Path<String>) -> Reply<Group> {
    check_group(&state, &group)?;
    Ok(Json(state.data().group.clone()))
}

async fn candidates(
    State(state): State<StubState>,
    Path(group): Path<String>,
) -> Reply<Vec<CandidateView>> {
    check_group(&state, &group)?;
    Ok(Json(state.data().group.candidates.clone()))
}

async fn parties(
    State(state): State<StubState>,
    Path(group): Path<String>,
) -> Reply<Vec<Party>> {
    check_group(&state, &group)?;
    Ok(Json(state.data().parties.clone()))
}

async fn constituents(
    State(state): State<StubState>,
    Path(group): Path<String>,
    Query(q): Query<ListQuery>,
) -> Reply<Page<Constituent>> {
    check_group(&state, &group)?;
    let page = state.data().list_constituents(
        q.constituency.as_deref(),
        q.search.as_deref(),
        q.offset,
        q.limit,
    );
    Ok(Json(page))
}

async fn constituent(
    State(state): State<StubState>,
    Path((group, id)): Path<(String, String)>,
) -> Reply<ConstituentDetail> {
    check_group(&state, &group)?;
    Ok(Json(state.data().constituent(&id)?))
}

async fn plot_house(
    State(state): State<StubState>,
    Path((group, id)): Path<(String, String)>,
    Json(location): Json<HouseLocation>,
) -> Result<StatusCode, StubError> {
    check_group(&state, &group)?;
    state.data().set_location(&id, location)?;
    info!(constituent = %id, "house plotted");
    Ok(StatusCode::NO_CONTENT)
}

async fn support(
    State(state): State<StubState>,
    Path(group): Path<String>,
    Query(q): Query<ListQuery>,
) -> Reply<Vec<SupportAssessment>> {
    check_group(&state, &group)?;
    let rows = state
        .data()
        .support(q.constituent_id.as_deref(), q.candidate_id.as_deref());
    Ok(Json(rows))
}

async fn log_support(
    State(state): State<StubState>,
    Path(group): Path<String>,
    Json(draft): Json<NewSupportAssessment>,
) -> Created<SupportAssessment> {
    check_group(&state, &group)?;
    let created = state.data().add_support(draft)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn log_support_batch(
    State(state): State<StubState>,
    Path(group): Path<String>,
    Json(batch): Json<BatchSupportAssessment>,
) -> Created<Vec<SupportAssessment>> {
    check_group(&state, &group)?;
    let created = state.data().add_support_batch(batch)?;
    info!(count = created.len(), "support batch stored");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn party_support(
    State(state): State<StubState>,
    Path(group): Path<String>,
    Query(q): Query<ListQuery>,
) -> Reply<Vec<PartySupport>> {
    check_group(&state, &group)?;
    let rows = state.data().party_support(q.constituency.as_deref());
    Ok(Json(rows))
}

async fn outreach(
    State(state): State<StubState>,
    Path(group): Path<String>,
    Query(q): Query<ListQuery>,
) -> Reply<Vec<OutreachLog>> {
    check_group(&state, &group)?;
    let rows = state.data().outreach(q.constituent_id.as_deref(), q.since);
    Ok(Json(rows))
}

async fn log_outreach(
    State(state): State<StubState>,
    Path(group): Path<String>,
    Json(draft): Json<NewOutreachLog>,
) -> Created<OutreachLog> {
    check_group(&state, &group)?;
    let created = state.data().add_outreach(draft)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn transport(
    State(state): State<StubState>,
    Path(group): Path<String>,
    Query(q): Query<ListQuery>,
) -> Reply<Vec<TransportRequest>> {
    check_group(&state, &group)?;
    let rows = state.data().transport(q.status, q.constituency.as_deref());
    Ok(Json(rows))
}

async fn create_transport(
    State(state): State<StubState>,
    Path(group): Path<String>,
    Json(draft): Json<TransportDraft>,
) -> Created<TransportRequest> {
    check_group(&state, &group)?;
    let created = state.data().add_transport(draft)?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_transport(
    State(state): State<StubState>,
    Path((group, id)): Path<(String, String)>,
    Json(draft): Json<TransportDraft>,
) -> Reply<TransportRequest> {
    check_group(&state, &group)?;
    let updated = state.data().update_transport(&id, draft)?;
    Ok(Json(updated))
}

async fn registrations(
    State(state): State<StubState>,
    Path(group): Path<String>,
    Query(q): Query<ListQuery>,
) -> Reply<Vec<VoterRegistration>> {
    check_group(&state, &group)?;
    let rows = state.data().registrations(q.constituency.as_deref());
    Ok(Json(rows))
}

async fn votes(
    State(state): State<StubState>,
    Path(group): Path<String>,
    Query(q): Query<ListQuery>,
) -> Reply<Vec<VotingRecord>> {
    check_group(&state, &group)?;
    let rows = state.data().votes(q.constituency.as_deref());
    Ok(Json(rows))
}

async fn record_vote(
    State(state): State<StubState>,
    Path(group): Path<String>,
    Json(draft): Json<NewVotingRecord>,
) -> Created<VotingRecord> {
    check_group(&state, &group)?;
    let created = state.data().add_vote(draft)?;
    info!(constituent = %created.constituent_id, ballot_box = %created.ballot_box_id, "vote recorded");
    Ok((StatusCode::CREATED, Json(created)))
}

async fn undo_vote(
    State(state): State<StubState>,
    Path((group, id)): Path<(String, String)>,
) -> Result<StatusCode, StubError> {
    check_group(&state, &group)?;
    state.data().delete_vote(&id)?;
    info!(record = %id, "vote removed");
    Ok(StatusCode::NO_CONTENT)
}

async fn support_hexmap(
    State(state): State<StubState>,
    Path(group): Path<String>,
    Query(q): Query<ListQuery>,
) -> Reply<Value> {
    check_group(&state, &group)?;
    let map = state
        .data()
        .support_hexmap(q.candidate_id.as_deref(), q.constituency.as_deref());
    Ok(Json(map))
}

async fn party_hexmap(
    State(state): State<StubState>,
    Path(group): Path<String>,
    Query(q): Query<ListQuery>,
) -> Reply<Value> {
    check_group(&state, &group)?;
    Ok(Json(state.data().party_hexmap(q.constituency.as_deref())))
}
