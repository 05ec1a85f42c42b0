use std::fmt::{Debug, Display};
use std::io::Error as IoError;

use actix_web::error::{BlockingError, JsonPayloadError, PathError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derivative::Derivative;
use rusqlite::Error as DatabaseError;
use serde::{Serialize, Serializer};

use crate::campaign::CampaignId;

#[derive(Debug, Serialize, Derivative)]
#[derivative(PartialEq)]
#[serde(untagged)]
pub enum Error {
    // 404
    PathNotFound,
    CampaignNotFound {
        campaign_id: CampaignId,
    },

    // 422
    #[serde(serialize_with = "display")]
    InvalidJson(#[derivative(PartialEq = "ignore")] JsonPayloadError),
    #[serde(serialize_with = "display")]
    InvalidPath(#[derivative(PartialEq = "ignore")] PathError),
    CampaignNameIsEmpty,

    // 500
    #[serde(serialize_with = "display")]
    FailedDatabaseCall(#[derivative(PartialEq = "ignore")] DatabaseError),
    #[serde(serialize_with = "display")]
    BlockingCallCanceled(#[derivative(PartialEq = "ignore")] BlockingError),
    #[serde(serialize_with = "display")]
    IoError(#[derivative(PartialEq = "ignore")] IoError),
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::PathNotFound => "E4041000",
            Error::CampaignNotFound { .. } => "E4041001",
            Error::InvalidJson(_) => "E4221000",
            Error::InvalidPath(_) => "E4221001",
            Error::CampaignNameIsEmpty => "E4221002",
            Error::FailedDatabaseCall(_) => "E5001000",
            Error::BlockingCallCanceled(_) => "E5001001",
            Error::IoError(_) => "E5001002",
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            Error::PathNotFound => "The requested path was not found",
            Error::CampaignNotFound { .. } => "The requested campaign was not found",
            Error::InvalidJson(_) => "The given json could not be parsed",
            Error::InvalidPath(_) => "The given path could not be parsed",
            Error::CampaignNameIsEmpty => "The campaign name must not be empty",
            Error::FailedDatabaseCall(_) => {
                "An error occurred when communicating with the database"
            }
            Error::BlockingCallCanceled(_) => "A database call was canceled before completing",
            Error::IoError(_) => "An error occurred during an I/O operation",
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::PathNotFound => StatusCode::NOT_FOUND,
            Error::CampaignNotFound { .. } => StatusCode::NOT_FOUND,
            Error::InvalidJson(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::InvalidPath(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::CampaignNameIsEmpty => StatusCode::UNPROCESSABLE_ENTITY,
            Error::FailedDatabaseCall(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::BlockingCallCanceled(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        #[derive(Serialize)]
        struct Dummy<'a> {
            error_code: &'static str,
            error_message: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            error_meta: Option<&'a Error>,
        }

        let status_code = self.status_code();

        // server-side details stay in the logs
        let error_meta = if status_code.is_server_error() {
            tracing::error!(error = %self, "request failed");
            None
        } else {
            Some(self)
        };

        HttpResponse::build(status_code).json(&Dummy {
            error_code: self.error_code(),
            error_message: self.error_message(),
            error_meta,
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}

impl From<DatabaseError> for Error {
    fn from(error: DatabaseError) -> Error {
        Error::FailedDatabaseCall(error)
    }
}

impl From<BlockingError> for Error {
    fn from(error: BlockingError) -> Error {
        Error::BlockingCallCanceled(error)
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidJson(err) => Some(err),
            Error::InvalidPath(err) => Some(err),
            Error::FailedDatabaseCall(err) => Some(err),
            Error::BlockingCallCanceled(err) => Some(err),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

fn display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
