use rocket::{http::Status, serde::json::Json, Catcher, Request, Route};

use crate::error::{self, Error, ErrorBody};
use crate::model::registry::RegistryError;

mod candidates;
mod elections;
mod voting;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(elections::routes());
    routes.extend(candidates::routes());
    routes.extend(voting::routes());
    routes
}

pub fn catchers() -> Vec<Catcher> {
    catchers![default_catcher]
}

/// Errors raised before a handler runs (bad paths, malformed JSON, missing
/// caller tokens) get the same JSON body as errors from the handlers.
#[catch(default)]
fn default_catcher(status: Status, req: &Request<'_>) -> (Status, Json<ErrorBody>) {
    let reason = status.reason_lossy().to_string();
    let err = match status.code {
        401 => Error::Unauthorized(reason),
        404 => Error::Registry(RegistryError::NotFound(req.uri().to_string())),
        _ => Error::BadRequest(reason),
    };
    log!(error::log_level(status), "{err}");
    (status, Json(ErrorBody::from(&err)))
}


#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Status},
        local::asynchronous::Client,
    };

    use crate::error::ErrorBody;

    #[ledger_test]
    async fn unknown_path_gets_json_not_found(client: Client) {
        let response = client.get("/ballots/7").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
        let body: ErrorBody = response.into_json().await.unwrap();
        assert_eq!(body.error, "NotFound");
        assert_eq!(body.message, "Not found: /ballots/7");
    }

    #[ledger_test]
    async fn malformed_json_gets_bad_request(client: Client) {
        let response = client
            .post("/elections")
            .header(ContentType::JSON)
            .body("{\"title\": ")
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        let body: ErrorBody = response.into_json().await.unwrap();
        assert_eq!(body.error, "BadRequest");
        assert_eq!(body.message, "Bad request: Bad Request");
    }
}
