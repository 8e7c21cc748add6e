use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower::ServiceExt;
use tracing::warn;

use crate::{
    commands::{
        list_activities::{ListActivitiesRequest, ListActivitiesResponse},
        remove::RemoveRequest,
        signup::SignupRequest,
        DomainLogic,
    },
    ports::activity_store::ActivityStorePort,
};

use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub async fn root() -> Redirect {
    Redirect::temporary("/static/index.html")
}

pub async fn health<S>(State(domain): State<DomainLogic<S>>) -> impl IntoResponse
where
    S: ActivityStorePort + 'static,
{
    let timestamp = Utc::now().to_rfc3339();
    match domain.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "healthy", "timestamp": timestamp })),
        ),
        Err(err) => {
            warn!("Health check failed: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable", "timestamp": timestamp })),
            )
        }
    }
}

pub async fn list_activities<S>(
    State(domain): State<DomainLogic<S>>,
) -> Result<Json<ListActivitiesResponse>, ApiError>
where
    S: ActivityStorePort + 'static,
{
    let activities = domain.oneshot(ListActivitiesRequest).await?;
    Ok(Json(activities))
}

pub async fn signup<S>(
    State(domain): State<DomainLogic<S>>,
    Path(activity_name): Path<String>,
    Query(EmailQuery { email }): Query<EmailQuery>,
) -> Result<Json<MessageResponse>, ApiError>
where
    S: ActivityStorePort + 'static,
{
    let res = domain
        .oneshot(SignupRequest {
            activity_name,
            email,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: res.message(),
    }))
}

pub async fn remove<S>(
    State(domain): State<DomainLogic<S>>,
    Path(activity_name): Path<String>,
    Query(EmailQuery { email }): Query<EmailQuery>,
) -> Result<Json<MessageResponse>, ApiError>
where
    S: ActivityStorePort + 'static,
{
    let res = domain
        .oneshot(RemoveRequest {
            activity_name,
            email,
        })
        .await?;

    Ok(Json(MessageResponse {
        message: res.message(),
    }))
}
