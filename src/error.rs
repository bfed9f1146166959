use jsonwebtoken::errors::Error as JwtError;
use log::Level;
use rocket::{
    http::Status,
    response::{status::Custom, Responder},
    serde::json::Json,
    Request,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::registry::RegistryError;

pub type Result<T> = std::result::Result<T, Error>;

/// HTTP 425: the request came before the election's end time.
const TOO_EARLY: Status = Status::new(425);

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Jwt(#[from] JwtError),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl Error {
    /// The HTTP status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            Self::Registry(e) => match e {
                RegistryError::NotFound(_) => Status::NotFound,
                RegistryError::InvalidCandidate { .. } | RegistryError::NoCandidates(_) => {
                    Status::UnprocessableEntity
                }
                RegistryError::ElectionClosed(_)
                | RegistryError::AlreadyVoted(_)
                | RegistryError::AlreadyEnded(_) => Status::Conflict,
                RegistryError::TooEarly(_) => TOO_EARLY,
                RegistryError::InvalidInput(_) => Status::BadRequest,
            },
            Self::Jwt(_) | Self::Unauthorized(_) => Status::Unauthorized,
            Self::BadRequest(_) => Status::BadRequest,
        }
    }

    /// Stable name of the error kind, as reported to API clients.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Registry(e) => e.kind(),
            Self::Jwt(_) | Self::Unauthorized(_) => "Unauthorized",
            Self::BadRequest(_) => "BadRequest",
        }
    }
}

/// Client errors are worth a warning, server errors are ours.
pub fn log_level(status: Status) -> Level {
    if status.code >= 500 {
        Level::Error
    } else {
        Level::Warn
    }
}

/// The JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        Self {
            error: err.kind().to_string(),
            message: err.to_string(),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> rocket::response::Result<'o> {
        let status = self.status();
        log!(log_level(status), "{self}");
        Custom(status, Json(ErrorBody::from(&self))).respond_to(req)
    }
}
