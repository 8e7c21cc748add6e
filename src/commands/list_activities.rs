use std::{
    collections::BTreeMap,
    task::{Context, Poll},
};

use serde::Serialize;
use tower::Service;

use crate::{domain::ActivityDetails, ports::activity_store::ActivityStorePort};

use super::{CommandFuture, DomainLogic, Error};

pub struct ListActivitiesRequest;

/// Every activity, keyed by name
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ListActivitiesResponse(pub BTreeMap<String, ActivityDetails>);

impl<S> Service<ListActivitiesRequest> for DomainLogic<S>
where
    S: ActivityStorePort + 'static,
{
    type Response = ListActivitiesResponse;
    type Error = Error;
    type Future = CommandFuture<Self::Response>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: ListActivitiesRequest) -> Self::Future {
        let store = self.store.clone();
        Box::pin(async move {
            let activities = store.list_all().await?;

            Ok(ListActivitiesResponse(
                activities
                    .into_iter()
                    .map(|activity| {
                        let details = activity.details();
                        (activity.name, details)
                    })
                    .collect(),
            ))
        })
    }
}
