use rocket::{serde::json::Json, Route, State};

use crate::error::Result;
use crate::logging::RequestId;
use crate::model::{
    api::{
        candidate::CandidateDetails,
        election::{ElectionDetails, ElectionResults, ElectionSpec},
    },
    common::election::ElectionId,
    registry::SharedRegistry,
};

pub fn routes() -> Vec<Route> {
    routes![
        create_election,
        list_elections,
        election_details,
        end_election,
        winning_candidate,
        election_results,
    ]
}

#[post("/elections", data = "<spec>", format = "json")]
async fn create_election(
    spec: Json<ElectionSpec>,
    registry: &State<SharedRegistry>,
) -> Result<Json<ElectionDetails>> {
    let ElectionSpec {
        title,
        duration_seconds,
    } = spec.0;
    let details = registry
        .write(|r, now| {
            let election_id = r.create_election(title, duration_seconds, now)?;
            r.election(election_id).map(ElectionDetails::from)
        })
        .await?;
    Ok(Json(details))
}

#[get("/elections")]
async fn list_elections(registry: &State<SharedRegistry>) -> Result<Json<Vec<ElectionDetails>>> {
    let elections: Vec<ElectionDetails> = registry
        .read(|r| Ok(r.elections().map(ElectionDetails::from).collect()))
        .await?;
    Ok(Json(elections))
}

#[get("/elections/<election_id>")]
async fn election_details(
    election_id: ElectionId,
    registry: &State<SharedRegistry>,
) -> Result<Json<ElectionDetails>> {
    let details = registry
        .read(|r| r.election(election_id).map(ElectionDetails::from))
        .await?;
    Ok(Json(details))
}

#[post("/elections/<election_id>/end")]
async fn end_election(
    request_id: RequestId,
    election_id: ElectionId,
    registry: &State<SharedRegistry>,
) -> Result<Json<ElectionDetails>> {
    let details = registry
        .write(|r, now| {
            r.end_election(election_id, now)?;
            r.election(election_id).map(ElectionDetails::from)
        })
        .await?;
    info!("{request_id} closed election {election_id}");
    Ok(Json(details))
}

#[get("/elections/<election_id>/winner")]
async fn winning_candidate(
    election_id: ElectionId,
    registry: &State<SharedRegistry>,
) -> Result<Json<CandidateDetails>> {
    let winner = registry
        .read(|r| r.winning_candidate(election_id).map(CandidateDetails::from))
        .await?;
    Ok(Json(winner))
}

#[get("/elections/<election_id>/results")]
async fn election_results(
    election_id: ElectionId,
    registry: &State<SharedRegistry>,
) -> Result<Json<ElectionResults>> {
    let results = registry
        .read(|r| r.election(election_id).map(ElectionResults::from))
        .await?;
    Ok(Json(results))
}
