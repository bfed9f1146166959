use rocket::{serde::json::Json, Route, State};

use crate::error::Result;
use crate::logging::RequestId;
use crate::model::{
    api::auth::CallerToken,
    common::{
        election::{CandidateId, ElectionId},
        voter::VoterAddress,
    },
    registry::SharedRegistry,
};

pub fn routes() -> Vec<Route> {
    routes![vote, has_voted]
}

#[post("/elections/<election_id>/candidates/<candidate_id>/vote")]
async fn vote(
    request_id: RequestId,
    token: CallerToken,
    election_id: ElectionId,
    candidate_id: CandidateId,
    registry: &State<SharedRegistry>,
) -> Result<()> {
    let voter = token.address();
    registry
        .write(|r, _| r.vote(election_id, candidate_id, voter))
        .await?;
    info!("{request_id} accepted ballot from {voter} in election {election_id}");
    Ok(())
}

#[get("/elections/<election_id>/voters/<address>")]
async fn has_voted(
    election_id: ElectionId,
    address: VoterAddress,
    registry: &State<SharedRegistry>,
) -> Result<Json<bool>> {
    let voted = registry
        .read(|r| r.has_voted(election_id, &address))
        .await?;
    Ok(Json(voted))
}
