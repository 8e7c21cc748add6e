use crate::domain::{Activity, CapacityPolicy, SeedMode};

#[mockall::automock]
#[async_trait::async_trait]
pub trait ActivityStorePort: Send + Sync {
    /// All stored activities
    async fn list_all(&self) -> Result<Vec<Activity>, Error>;

    async fn find_by_name(&self, name: &str) -> Result<Activity, Error>;

    /// Append `email` to the roster of the activity `name`
    ///
    /// The duplicate and capacity checks and the append happen as one atomic operation, so two
    /// concurrent signups for the same email cannot both succeed.
    async fn add_participant(
        &self,
        name: &str,
        email: &str,
        capacity: CapacityPolicy,
    ) -> Result<Activity, Error>;

    /// Remove exactly `email` from the roster of the activity `name`
    async fn remove_participant(&self, name: &str, email: &str) -> Result<Activity, Error>;

    /// Insert `activity`, or update the stored activity with the same name
    async fn upsert_activity(&self, activity: Activity, mode: SeedMode) -> Result<(), Error>;

    /// Check that the backing store is reachable
    async fn ping(&self) -> Result<(), Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("activity {0} does not exist")]
    ActivityNotFound(String),

    #[error("{email} is not a participant of {activity}")]
    ParticipantNotFound { activity: String, email: String },

    #[error("{email} is already signed up for {activity}")]
    AlreadyRegistered { activity: String, email: String },

    /// The roster reached `max_participants` while capacity is enforced
    #[error("{activity} is full ({max_participants} participants)")]
    ActivityFull {
        activity: String,
        max_participants: u32,
    },

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as connectivity, decoding, or permission errors. The store is considered
    /// unavailable when one of these is returned.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}
