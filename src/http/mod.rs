use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{commands::DomainLogic, ports::activity_store::ActivityStorePort};

pub mod error;
pub mod routes;

/// HTTP surface of the service
///
/// Static assets under `static_dir` are served from `/static`.
pub fn router<S>(domain: DomainLogic<S>, static_dir: impl AsRef<Path>) -> Router
where
    S: ActivityStorePort + 'static,
{
    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health::<S>))
        .route("/activities", get(routes::list_activities::<S>))
        .route(
            "/activities/:activity_name/signup",
            post(routes::signup::<S>),
        )
        .route(
            "/activities/:activity_name/remove",
            post(routes::remove::<S>),
        )
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .with_state(domain)
}
