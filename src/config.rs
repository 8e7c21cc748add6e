use std::{env, fmt::Display, net::SocketAddr, path::PathBuf, str::FromStr};

use anyhow::{anyhow, Context};
use tracing::info;

use crate::domain::{CapacityPolicy, SeedMode};

/// Which [`ActivityStorePort`](crate::ports::activity_store::ActivityStorePort) adapter to run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub store: StoreBackend,
    pub database_url: String,
    pub database_max_connections: u32,
    pub static_dir: PathBuf,
    pub capacity: CapacityPolicy,
    pub seed_mode: SeedMode,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup, falling back to defaults for missing keys
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let enforce_capacity: bool = try_load(&lookup, "ENFORCE_CAPACITY", "false")?;

        Ok(Self {
            host: try_load(&lookup, "HOST", "0.0.0.0")?,
            port: try_load(&lookup, "PORT", "8000")?,
            store: try_load(&lookup, "ACTIVITY_STORE", "sqlite")?,
            database_url: try_load(&lookup, "DATABASE_URL", "sqlite://activities.db?mode=rwc")?,
            database_max_connections: try_load(&lookup, "DATABASE_MAX_CONNECTIONS", "5")?,
            static_dir: try_load(&lookup, "STATIC_DIR", "static")?,
            capacity: if enforce_capacity {
                CapacityPolicy::Enforced
            } else {
                CapacityPolicy::DisplayOnly
            },
            seed_mode: try_load(&lookup, "SEED_MODE", "keep")?,
        })
    }

    pub fn address(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> anyhow::Result<T>
where
    T::Err: Display,
{
    lookup(key)
        .unwrap_or_else(|| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| anyhow!("invalid {key} value: {e}"))
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(format!("expected sqlite|memory, got {other}")),
        }
    }
}

impl FromStr for SeedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keep" => Ok(Self::KeepParticipants),
            "reset" => Ok(Self::Reset),
            other => Err(format!("expected keep|reset, got {other}")),
        }
    }
}
