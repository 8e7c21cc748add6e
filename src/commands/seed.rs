use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::{
    domain::{Activity, SeedMode},
    ports::activity_store::ActivityStorePort,
};

use super::{CommandFuture, DomainLogic, Error};

/// Load a catalog of activities into the store
///
/// Activities are upserted by name, so running this again never duplicates records.
pub struct SeedRequest {
    pub activities: Vec<Activity>,
    pub mode: SeedMode,
}

#[derive(Debug, PartialEq, Eq)]
pub struct SeedResponse {
    /// Number of activities in the store afterwards
    pub stored_activities: usize,
}

impl<S> Service<SeedRequest> for DomainLogic<S>
where
    S: ActivityStorePort + 'static,
{
    type Response = SeedResponse;
    type Error = Error;
    type Future = CommandFuture<Self::Response>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: SeedRequest) -> Self::Future {
        let store = self.store.clone();
        Box::pin(async move {
            let seeded = req.activities.len();
            for activity in req.activities {
                store.upsert_activity(activity, req.mode).await?;
            }

            let stored_activities = store.list_all().await?.len();
            info!(seeded, stored_activities, mode = ?req.mode, "activity catalog seeded");

            Ok(SeedResponse { stored_activities })
        })
    }
}
