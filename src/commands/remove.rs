use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::ports::activity_store::ActivityStorePort;

use super::{CommandFuture, DomainLogic, Error};

pub struct RemoveRequest {
    pub activity_name: String,
    pub email: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RemoveResponse {
    pub activity_name: String,
    pub email: String,
    /// Roster of the activity after the removal
    pub participants: Vec<String>,
}

impl RemoveResponse {
    pub fn message(&self) -> String {
        format!("{} removed from {}", self.email, self.activity_name)
    }
}

impl<S> Service<RemoveRequest> for DomainLogic<S>
where
    S: ActivityStorePort + 'static,
{
    type Response = RemoveResponse;
    type Error = Error;
    type Future = CommandFuture<Self::Response>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: RemoveRequest) -> Self::Future {
        let store = self.store.clone();
        Box::pin(async move {
            let activity = store
                .remove_participant(&req.activity_name, &req.email)
                .await?;
            info!(activity = %activity.name, email = %req.email, "participant removed");

            Ok(RemoveResponse {
                activity_name: activity.name,
                email: req.email,
                participants: activity.participants,
            })
        })
    }
}
