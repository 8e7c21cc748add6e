//! Activity store backed by SQLite.
//!
//! Each activity is one row keyed by name, with the roster kept as a JSON array in the
//! `participants` column. Roster changes are single conditional `UPDATE` statements, so the
//! existence, duplicate and capacity checks are evaluated by the database together with the
//! write.

use crate::{
    domain::{Activity, CapacityPolicy, SeedMode, SignupRejection},
    ports::activity_store::{ActivityStorePort, Error},
};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::{debug, info};

const SQL_CREATE_ACTIVITIES: &str = r#"
CREATE TABLE IF NOT EXISTS activities (
  name TEXT PRIMARY KEY NOT NULL,
  description TEXT NOT NULL,
  schedule TEXT NOT NULL,
  max_participants INTEGER NOT NULL CHECK (max_participants > 0),
  participants TEXT NOT NULL DEFAULT '[]'
)
"#;

const SQL_LIST_ACTIVITIES: &str = r#"
SELECT name, description, schedule, max_participants, participants
FROM activities
ORDER BY name
"#;

const SQL_FIND_ACTIVITY: &str = r#"
SELECT name, description, schedule, max_participants, participants
FROM activities
WHERE name = ?1
"#;

const SQL_ADD_PARTICIPANT: &str = r#"
UPDATE activities
SET participants = json_insert(participants, '$[#]', ?2)
WHERE name = ?1
  AND NOT EXISTS (
    SELECT 1 FROM json_each(activities.participants) WHERE value = ?2
  )
  AND (?3 = 0 OR json_array_length(participants) < max_participants)
RETURNING name, description, schedule, max_participants, participants
"#;

const SQL_REMOVE_PARTICIPANT: &str = r#"
UPDATE activities
SET participants = (
  SELECT json_group_array(p.value)
  FROM json_each(activities.participants) AS p
  WHERE p.value != ?2
)
WHERE name = ?1
  AND EXISTS (
    SELECT 1 FROM json_each(activities.participants) WHERE value = ?2
  )
RETURNING name, description, schedule, max_participants, participants
"#;

const SQL_UPSERT_KEEP_PARTICIPANTS: &str = r#"
INSERT INTO activities (name, description, schedule, max_participants, participants)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (name) DO UPDATE SET
  description = excluded.description,
  schedule = excluded.schedule,
  max_participants = excluded.max_participants
"#;

const SQL_UPSERT_RESET: &str = r#"
INSERT INTO activities (name, description, schedule, max_participants, participants)
VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (name) DO UPDATE SET
  description = excluded.description,
  schedule = excluded.schedule,
  max_participants = excluded.max_participants,
  participants = excluded.participants
"#;

#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct ActivityRow {
    name: String,
    description: String,
    schedule: String,
    max_participants: i64,
    participants: String,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = Error;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        Ok(Activity {
            max_participants: u32::try_from(row.max_participants)
                .map_err(|err| Error::Adapter(Box::new(err)))?,
            participants: serde_json::from_str(&row.participants)?,
            name: row.name,
            description: row.description,
            schedule: row.schedule,
        })
    }
}

impl SqliteStore {
    /// Open a pool on `url` and create the schema if needed
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        info!("Connected to activity database");

        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> Result<Self, Error> {
        sqlx::query(SQL_CREATE_ACTIVITIES).execute(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Activity database connection closed");
    }
}

#[async_trait::async_trait]
impl ActivityStorePort for SqliteStore {
    async fn list_all(&self) -> Result<Vec<Activity>, Error> {
        sqlx::query_as::<_, ActivityRow>(SQL_LIST_ACTIVITIES)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Activity::try_from)
            .collect()
    }

    async fn find_by_name(&self, name: &str) -> Result<Activity, Error> {
        sqlx::query_as::<_, ActivityRow>(SQL_FIND_ACTIVITY)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::ActivityNotFound(name.to_string()))?
            .try_into()
    }

    async fn add_participant(
        &self,
        name: &str,
        email: &str,
        capacity: CapacityPolicy,
    ) -> Result<Activity, Error> {
        let updated = sqlx::query_as::<_, ActivityRow>(SQL_ADD_PARTICIPANT)
            .bind(name)
            .bind(email)
            .bind(capacity == CapacityPolicy::Enforced)
            .fetch_optional(&self.pool)
            .await?;
        if let Some(row) = updated {
            return row.try_into();
        }

        // Nothing was written; find out which condition failed
        debug!(activity = name, email, "signup update matched no row");
        let activity = self.find_by_name(name).await?;
        match activity.check_signup(email, capacity) {
            Err(SignupRejection::Full) => Err(Error::ActivityFull {
                activity: activity.name,
                max_participants: activity.max_participants,
            }),
            _ => Err(Error::AlreadyRegistered {
                activity: activity.name,
                email: email.to_string(),
            }),
        }
    }

    async fn remove_participant(&self, name: &str, email: &str) -> Result<Activity, Error> {
        let updated = sqlx::query_as::<_, ActivityRow>(SQL_REMOVE_PARTICIPANT)
            .bind(name)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        if let Some(row) = updated {
            return row.try_into();
        }

        let activity = self.find_by_name(name).await?;
        Err(Error::ParticipantNotFound {
            activity: activity.name,
            email: email.to_string(),
        })
    }

    async fn upsert_activity(&self, activity: Activity, mode: SeedMode) -> Result<(), Error> {
        let sql = match mode {
            SeedMode::KeepParticipants => SQL_UPSERT_KEEP_PARTICIPANTS,
            SeedMode::Reset => SQL_UPSERT_RESET,
        };
        let participants = serde_json::to_string(&activity.participants)?;
        sqlx::query(sql)
            .bind(activity.name)
            .bind(activity.description)
            .bind(activity.schedule)
            .bind(i64::from(activity.max_participants))
            .bind(participants)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Self::Adapter(Box::new(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Adapter(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::initial_activities;
    use speculoos::prelude::*;
    use std::collections::HashSet;

    const CHESS: &str = "Clube de Xadrez";

    /// Seeded store on a private in-memory database
    ///
    /// A single long-lived connection, since every new `:memory:` connection opens an empty
    /// database.
    async fn store() -> SqliteStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let store = SqliteStore::with_pool(pool).await.unwrap();
        for activity in initial_activities() {
            store
                .upsert_activity(activity, SeedMode::KeepParticipants)
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_list_all() {
        let store = store().await;

        let res = store.list_all().await;

        assert_that!(res).is_ok().matches(|activities| {
            activities.len() == 9 && activities.iter().any(|a| a.name == "Vôlei")
        });
    }

    #[tokio::test]
    async fn test_find_by_name() {
        let store = store().await;

        let res = store.find_by_name(CHESS).await;

        assert_that!(res).is_ok().is_equal_to(initial_activities().remove(0));
        let res = store.find_by_name("Robótica").await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::ActivityNotFound(_)));
    }

    #[tokio::test]
    async fn test_add_participant() {
        let store = store().await;

        let res = store
            .add_participant(CHESS, "new@mergington.edu", CapacityPolicy::DisplayOnly)
            .await;

        assert_that!(res).is_ok().matches(|activity| {
            activity.participants
                == [
                    "michael@mergington.edu",
                    "daniel@mergington.edu",
                    "new@mergington.edu",
                ]
        });
        let stored = store.find_by_name(CHESS).await.unwrap();
        assert_that!(stored.participants).has_length(3);
    }

    #[tokio::test]
    async fn test_add_participant_duplicate() {
        let store = store().await;

        let res = store
            .add_participant(CHESS, "daniel@mergington.edu", CapacityPolicy::DisplayOnly)
            .await;

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::AlreadyRegistered { .. }));
        let stored = store.find_by_name(CHESS).await.unwrap();
        assert_that!(stored.participants).has_length(2);
    }

    #[tokio::test]
    async fn test_add_participant_unknown() {
        let store = store().await;

        let res = store
            .add_participant("Robótica", "new@mergington.edu", CapacityPolicy::DisplayOnly)
            .await;

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::ActivityNotFound(_)));
    }

    #[tokio::test]
    async fn test_add_participant_full() {
        let store = store().await;
        let mut activity = initial_activities().remove(0);
        activity.max_participants = 2;
        store
            .upsert_activity(activity, SeedMode::KeepParticipants)
            .await
            .unwrap();

        let res = store
            .add_participant(CHESS, "new@mergington.edu", CapacityPolicy::Enforced)
            .await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::ActivityFull { max_participants: 2, .. }));

        // Display-only capacity still lets the student in
        let res = store
            .add_participant(CHESS, "new@mergington.edu", CapacityPolicy::DisplayOnly)
            .await;
        assert_that!(res)
            .is_ok()
            .matches(|activity| activity.participants.len() == 3);
    }

    #[tokio::test]
    async fn test_concurrent_signups() {
        let store = store().await;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .add_participant(CHESS, "race@mergington.edu", CapacityPolicy::DisplayOnly)
                        .await
                })
            })
            .collect();
        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_that!(successes).is_equal_to(1);
        let stored = store.find_by_name(CHESS).await.unwrap();
        let unique: HashSet<_> = stored.participants.iter().collect();
        assert_that!(unique.len()).is_equal_to(stored.participants.len());
    }

    #[tokio::test]
    async fn test_remove_participant() {
        let store = store().await;
        store
            .add_participant(CHESS, "new@mergington.edu", CapacityPolicy::DisplayOnly)
            .await
            .unwrap();

        let res = store
            .remove_participant(CHESS, "daniel@mergington.edu")
            .await;

        assert_that!(res).is_ok().matches(|activity| {
            activity.participants == ["michael@mergington.edu", "new@mergington.edu"]
        });
    }

    #[tokio::test]
    async fn test_remove_last_participant() {
        let store = store().await;
        for email in ["michael@mergington.edu", "daniel@mergington.edu"] {
            store.remove_participant(CHESS, email).await.unwrap();
        }

        let stored = store.find_by_name(CHESS).await.unwrap();

        assert_that!(stored.participants).is_empty();
    }

    #[tokio::test]
    async fn test_remove_participant_not_found() {
        let store = store().await;

        let res = store.remove_participant(CHESS, "ghost@mergington.edu").await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::ParticipantNotFound { .. }));

        let res = store
            .remove_participant("Robótica", "michael@mergington.edu")
            .await;
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, Error::ActivityNotFound(_)));

        let stored = store.find_by_name(CHESS).await.unwrap();
        assert_that!(stored.participants).has_length(2);
    }

    #[tokio::test]
    async fn test_reseed() {
        let store = store().await;
        store
            .add_participant(CHESS, "new@mergington.edu", CapacityPolicy::DisplayOnly)
            .await
            .unwrap();

        // Seeding again keeps signups and does not duplicate records
        for activity in initial_activities() {
            store
                .upsert_activity(activity, SeedMode::KeepParticipants)
                .await
                .unwrap();
        }
        assert_that!(store.list_all().await.unwrap()).has_length(9);
        let stored = store.find_by_name(CHESS).await.unwrap();
        assert_that!(stored.participants).has_length(3);

        // A reset restores the catalog roster
        store
            .upsert_activity(initial_activities().remove(0), SeedMode::Reset)
            .await
            .unwrap();
        let stored = store.find_by_name(CHESS).await.unwrap();
        assert_that!(stored.participants).has_length(2);
    }

    #[tokio::test]
    async fn test_ping() {
        let store = store().await;

        assert_that!(store.ping().await).is_ok();
    }
}
