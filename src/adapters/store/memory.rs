use crate::{
    domain::{Activity, CapacityPolicy, SeedMode, SignupRejection},
    ports::activity_store::{ActivityStorePort, Error},
};
use std::{
    collections::{hash_map::Entry, HashMap},
    sync::{Arc, Mutex, PoisonError},
};

#[derive(Clone, Debug)]
pub struct MemoryStore {
    activities: Arc<Mutex<HashMap<String, Activity>>>,
}

impl MemoryStore {
    /// Store pre-filled with `activities`
    pub fn with_activities(activities: impl IntoIterator<Item = Activity>) -> Self {
        let activities = activities
            .into_iter()
            .map(|activity| (activity.name.clone(), activity))
            .collect();
        Self {
            activities: Arc::new(Mutex::new(activities)),
        }
    }
}

#[async_trait::async_trait]
impl ActivityStorePort for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Activity>, Error> {
        let mut activities: Vec<_> = self.activities.lock()?.values().cloned().collect();
        activities.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(activities)
    }

    async fn find_by_name(&self, name: &str) -> Result<Activity, Error> {
        self.activities
            .lock()?
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ActivityNotFound(name.to_string()))
    }

    async fn add_participant(
        &self,
        name: &str,
        email: &str,
        capacity: CapacityPolicy,
    ) -> Result<Activity, Error> {
        // The guard is held across check and append
        let mut activities = self.activities.lock()?;
        let activity = activities
            .get_mut(name)
            .ok_or_else(|| Error::ActivityNotFound(name.to_string()))?;

        match activity.check_signup(email, capacity) {
            Ok(()) => {}
            Err(SignupRejection::AlreadyRegistered) => {
                return Err(Error::AlreadyRegistered {
                    activity: name.to_string(),
                    email: email.to_string(),
                })
            }
            Err(SignupRejection::Full) => {
                return Err(Error::ActivityFull {
                    activity: name.to_string(),
                    max_participants: activity.max_participants,
                })
            }
        }

        activity.participants.push(email.to_string());
        Ok(activity.clone())
    }

    async fn remove_participant(&self, name: &str, email: &str) -> Result<Activity, Error> {
        let mut activities = self.activities.lock()?;
        let activity = activities
            .get_mut(name)
            .ok_or_else(|| Error::ActivityNotFound(name.to_string()))?;

        let Some(position) = activity.participants.iter().position(|p| p == email) else {
            return Err(Error::ParticipantNotFound {
                activity: name.to_string(),
                email: email.to_string(),
            });
        };

        activity.participants.remove(position);
        Ok(activity.clone())
    }

    async fn upsert_activity(&self, activity: Activity, mode: SeedMode) -> Result<(), Error> {
        match self.activities.lock()?.entry(activity.name.clone()) {
            Entry::Occupied(mut entry) => {
                let stored = entry.get_mut();
                match mode {
                    SeedMode::KeepParticipants => {
                        stored.description = activity.description;
                        stored.schedule = activity.schedule;
                        stored.max_participants = activity.max_participants;
                    }
                    SeedMode::Reset => *stored = activity,
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(activity);
            }
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), Error> {
        drop(self.activities.lock()?);
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            activities: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

/// Erased [`PoisonError`]
///
/// `PoisonError` keeps the `MutexGuard` internally, which is not send. Thus we erase the error
/// and only keep the string representation instead.
#[derive(Debug, thiserror::Error)]
#[error("poison error: {0}")]
pub struct ErasedPoisonError(String);

impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}
