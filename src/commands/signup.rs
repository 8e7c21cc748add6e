use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::ports::activity_store::ActivityStorePort;

use super::{CommandFuture, DomainLogic, Error};

pub struct SignupRequest {
    pub activity_name: String,
    pub email: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct SignupResponse {
    pub activity_name: String,
    pub email: String,
    /// Roster of the activity after the signup
    pub participants: Vec<String>,
}

impl SignupResponse {
    pub fn message(&self) -> String {
        format!("{} signed up for {}", self.email, self.activity_name)
    }
}

impl<S> Service<SignupRequest> for DomainLogic<S>
where
    S: ActivityStorePort + 'static,
{
    type Response = SignupResponse;
    type Error = Error;
    type Future = CommandFuture<Self::Response>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: SignupRequest) -> Self::Future {
        let store = self.store.clone();
        let capacity = self.capacity;
        Box::pin(async move {
            let activity = store
                .add_participant(&req.activity_name, &req.email, capacity)
                .await?;
            info!(activity = %activity.name, email = %req.email, "student signed up");

            Ok(SignupResponse {
                activity_name: activity.name,
                email: req.email,
                participants: activity.participants,
            })
        })
    }
}
