use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error};

use crate::{commands, ports::activity_store};

/// Error returned by the HTTP handlers, rendered as `{"detail": message}`
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<commands::Error> for ApiError {
    fn from(err: commands::Error) -> Self {
        let commands::Error::Store(err) = err;
        match err {
            activity_store::Error::ActivityNotFound(_) => {
                debug!("{err}");
                Self::new(StatusCode::NOT_FOUND, "Activity not found")
            }
            activity_store::Error::ParticipantNotFound { .. } => {
                debug!("{err}");
                Self::new(
                    StatusCode::NOT_FOUND,
                    "Participant not found in this activity",
                )
            }
            activity_store::Error::AlreadyRegistered { .. } => {
                debug!("{err}");
                Self::new(
                    StatusCode::BAD_REQUEST,
                    "Student is already signed up for this activity",
                )
            }
            activity_store::Error::ActivityFull { .. } => {
                debug!("{err}");
                Self::new(StatusCode::BAD_REQUEST, "Activity is full")
            }
            // Adapter details stay in the logs
            activity_store::Error::Adapter(_) => {
                error!("activity store unavailable: {err}");
                Self::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Activity store is unavailable, try again later",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.message }))).into_response()
    }
}
