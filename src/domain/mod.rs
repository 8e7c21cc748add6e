use serde::{Deserialize, Serialize};

pub mod catalog;

/// An extracurricular activity and its roster
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Activity {
    /// Unique, human-readable name of the `Activity`
    ///
    /// This is the key the activity is stored and looked up under.
    pub name: String,
    pub description: String,
    pub schedule: String,
    /// Number of seats in the activity
    ///
    /// Whether this is enforced on signup depends on the [`CapacityPolicy`].
    pub max_participants: u32,
    /// Emails of the enrolled students, in signup order
    ///
    /// An email never appears twice in this list.
    pub participants: Vec<String>,
}

impl Activity {
    pub fn is_participant(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() >= self.max_participants as usize
    }

    /// Whether `email` may be appended to the roster under `capacity`
    pub fn check_signup(
        &self,
        email: &str,
        capacity: CapacityPolicy,
    ) -> Result<(), SignupRejection> {
        if self.is_participant(email) {
            return Err(SignupRejection::AlreadyRegistered);
        }
        if capacity == CapacityPolicy::Enforced && self.is_full() {
            return Err(SignupRejection::Full);
        }
        Ok(())
    }

    pub fn details(&self) -> ActivityDetails {
        ActivityDetails {
            description: self.description.clone(),
            schedule: self.schedule.clone(),
            max_participants: self.max_participants,
            participants: self.participants.clone(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum SignupRejection {
    AlreadyRegistered,
    Full,
}

/// Public view of an [`Activity`], keyed by name in listings
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDetails {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub participants: Vec<String>,
}

/// What to do with `max_participants` on signup
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CapacityPolicy {
    /// Capacity is informational only
    #[default]
    DisplayOnly,
    /// Signups are rejected once the roster is full
    Enforced,
}

/// How seeding treats an activity that is already stored
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SeedMode {
    /// Refresh description, schedule and capacity but keep the stored roster
    #[default]
    KeepParticipants,
    /// Overwrite the whole record, roster included
    Reset,
}
