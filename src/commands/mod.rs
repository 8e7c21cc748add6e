use std::{future::Future, pin::Pin, sync::Arc};

use crate::{domain::CapacityPolicy, ports::activity_store::ActivityStorePort};

pub mod list_activities;
pub mod remove;
pub mod seed;
pub mod signup;

/// Future returned by every command service
pub type CommandFuture<T> = Pin<Box<dyn Future<Output = Result<T, Error>> + Send>>;

pub struct DomainLogic<S> {
    store: Arc<S>,
    capacity: CapacityPolicy,
}

impl<S> DomainLogic<S>
where
    S: ActivityStorePort,
{
    pub fn new(store: Arc<S>, capacity: CapacityPolicy) -> Self {
        Self { store, capacity }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}

impl<S> Clone for DomainLogic<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            capacity: self.capacity,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("activity store error: {0}")]
    Store(#[from] crate::ports::activity_store::Error),
}
