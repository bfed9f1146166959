use rocket::{serde::json::Json, Route, State};

use crate::error::Result;
use crate::model::{
    api::candidate::{CandidateDetails, CandidateSpec},
    common::election::{CandidateId, ElectionId},
    registry::SharedRegistry,
};

pub fn routes() -> Vec<Route> {
    routes![add_candidate, candidate_details]
}

#[post("/elections/<election_id>/candidates", data = "<spec>", format = "json")]
async fn add_candidate(
    election_id: ElectionId,
    spec: Json<CandidateSpec>,
    registry: &State<SharedRegistry>,
) -> Result<Json<CandidateDetails>> {
    let name = spec.0.name;
    let candidate = registry
        .write(|r, _| {
            let candidate_id = r.add_candidate(election_id, name)?;
            r.candidate(election_id, candidate_id)
                .map(CandidateDetails::from)
        })
        .await?;
    Ok(Json(candidate))
}

#[get("/elections/<election_id>/candidates/<candidate_id>")]
async fn candidate_details(
    election_id: ElectionId,
    candidate_id: CandidateId,
    registry: &State<SharedRegistry>,
) -> Result<Json<CandidateDetails>> {
    let candidate = registry
        .read(|r| {
            r.candidate(election_id, candidate_id)
                .map(CandidateDetails::from)
        })
        .await?;
    Ok(Json(candidate))
}
