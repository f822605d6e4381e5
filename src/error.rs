use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sqlx::migrate::MigrateError;
use thiserror::Error;

use crate::model::membership::MembershipError;

/// Failures surfaced by the HTTP handlers. The message of every variant but `Store` is sent to
/// the client as a JSON string.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            Self::Store(err) => {
                log::warn!(target: crate::APP_TARGET, "Database error: {err:?}");
                String::from("Internal server error")
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(message)
    }
}

impl From<MembershipError> for ApiError {
    fn from(err: MembershipError) -> Self {
        match err {
            MembershipError::UnknownUser(_) => Self::BadRequest(format!("Error updating group membership: {err}")),
            MembershipError::Store(err) => Self::Store(err),
        }
    }
}

/// Failures while bringing the store up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("unable to open database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("unable to migrate database: {0}")]
    Migrate(#[from] MigrateError),
}
