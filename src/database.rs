use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use tracing::info;

use crate::campaign::db::{self, CampaignStore, MemoryCampaignStore, SqliteCampaignStore};
use crate::error::Error;

pub trait Database: Send + Sync {
    fn campaigns(&self) -> &dyn CampaignStore;
}

#[derive(Debug)]
pub struct MemoryDatabase {
    campaigns: MemoryCampaignStore,
}

impl MemoryDatabase {
    pub fn new() -> MemoryDatabase {
        MemoryDatabase {
            campaigns: MemoryCampaignStore::new(),
        }
    }
}

impl Database for MemoryDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }
}

#[derive(Clone, Debug)]
pub struct SqliteDatabase {
    campaigns: SqliteCampaignStore,
}

impl SqliteDatabase {
    /// Creates the database file and its tables if they don't exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<SqliteDatabase, Error> {
        let path = path.into();
        info!("opening sqlite database: {}", path.display());

        let conn = open_connection(&path)?;
        db::initialize(&conn)?;

        Ok(SqliteDatabase {
            campaigns: SqliteCampaignStore::new(path),
        })
    }
}

impl Database for SqliteDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }
}

/// Opens a short-lived connection. Callers drop it as soon as their call is
/// done.
pub fn open_connection(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(Duration::from_secs(5))?;

    Ok(conn)
}
