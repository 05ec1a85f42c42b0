use std::path::PathBuf;

use actix_web::web;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::sync::Mutex;

use crate::database::open_connection;
use crate::error::Error;

use super::{Campaign, CampaignId, NewCampaign};

const CAMPAIGN_SELECT_SQL: &str = "SELECT campaign_id, name, date, created_at FROM campaigns";

#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn insert_campaign(&self, campaign: NewCampaign) -> Result<Campaign, Error>;

    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error>;

    async fn fetch_campaign_by_id(&self, campaign_id: CampaignId)
        -> Result<Option<Campaign>, Error>;

    async fn update_campaign(
        &self,
        campaign_id: CampaignId,
        name: String,
        scheduled_date: Option<DateTime<Utc>>,
    ) -> Result<Option<Campaign>, Error>;

    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<bool, Error>;
}

/// Creates the campaigns table if this is a fresh database file.
pub fn initialize(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS campaigns (
            campaign_id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            date TEXT,
            created_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS campaigns_name ON campaigns (name);
        CREATE INDEX IF NOT EXISTS campaigns_date ON campaigns (date);
        CREATE INDEX IF NOT EXISTS campaigns_created_at ON campaigns (created_at);",
    )
}

#[derive(Debug)]
struct MemoryCampaigns {
    next_id: i64,
    campaigns: Vec<Campaign>,
}

/// Campaigns kept for the lifetime of the process.
#[derive(Debug)]
pub struct MemoryCampaignStore {
    state: Mutex<MemoryCampaigns>,
}

impl MemoryCampaignStore {
    pub fn new() -> MemoryCampaignStore {
        MemoryCampaignStore {
            state: Mutex::new(MemoryCampaigns {
                next_id: 1,
                campaigns: vec![],
            }),
        }
    }
}

#[async_trait]
impl CampaignStore for MemoryCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, campaign: NewCampaign) -> Result<Campaign, Error> {
        let mut state = self.state.lock().await;

        // ids are never handed out twice, even after deletes
        let campaign_id = CampaignId::from_raw(state.next_id);
        state.next_id += 1;

        let campaign = campaign.into_campaign(campaign_id);
        state.campaigns.push(campaign.clone());

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        let state = self.state.lock().await;

        Ok(state.campaigns.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let state = self.state.lock().await;
        let campaign = state
            .campaigns
            .iter()
            .find(|campaign| campaign.id == campaign_id)
            .cloned();

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign(
        &self,
        campaign_id: CampaignId,
        name: String,
        scheduled_date: Option<DateTime<Utc>>,
    ) -> Result<Option<Campaign>, Error> {
        let mut state = self.state.lock().await;
        let campaign = match state
            .campaigns
            .iter_mut()
            .find(|campaign| campaign.id == campaign_id)
        {
            Some(campaign) => campaign,
            None => return Ok(None),
        };

        campaign.name = name;
        campaign.scheduled_date = scheduled_date;

        Ok(Some(campaign.clone()))
    }

    #[tracing::instrument(skip(self))]
    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<bool, Error> {
        let mut state = self.state.lock().await;
        let index = state
            .campaigns
            .iter()
            .position(|campaign| campaign.id == campaign_id);

        match index {
            Some(index) => {
                state.campaigns.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Campaigns kept in a single SQLite file. Every call opens its own
/// connection on the blocking pool and drops it before returning.
#[derive(Clone, Debug)]
pub struct SqliteCampaignStore {
    path: PathBuf,
}

impl SqliteCampaignStore {
    pub fn new(path: PathBuf) -> SqliteCampaignStore {
        SqliteCampaignStore { path }
    }
}

#[async_trait]
impl CampaignStore for SqliteCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, campaign: NewCampaign) -> Result<Campaign, Error> {
        let path = self.path.clone();
        let campaign = web::block(move || -> rusqlite::Result<Campaign> {
            let mut conn = open_connection(&path)?;
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO campaigns (name, date, created_at) VALUES (?1, ?2, ?3)",
                params![campaign.name, campaign.scheduled_date, campaign.created_at],
            )?;
            let campaign_id = CampaignId::from_raw(tx.last_insert_rowid());

            tx.commit()?;

            Ok(campaign.into_campaign(campaign_id))
        })
        .await??;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        let path = self.path.clone();
        let campaigns = web::block(move || -> rusqlite::Result<Vec<Campaign>> {
            let conn = open_connection(&path)?;
            let mut stmt = conn.prepare(&format!("{} ORDER BY campaign_id", CAMPAIGN_SELECT_SQL))?;
            let campaigns = stmt
                .query_map([], parse_campaign_row)?
                .collect::<rusqlite::Result<Vec<Campaign>>>()?;

            Ok(campaigns)
        })
        .await??;

        Ok(campaigns)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let path = self.path.clone();
        let campaign = web::block(move || -> rusqlite::Result<Option<Campaign>> {
            let conn = open_connection(&path)?;
            select_campaign(&conn, campaign_id)
        })
        .await??;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign(
        &self,
        campaign_id: CampaignId,
        name: String,
        scheduled_date: Option<DateTime<Utc>>,
    ) -> Result<Option<Campaign>, Error> {
        let path = self.path.clone();
        let campaign = web::block(move || -> rusqlite::Result<Option<Campaign>> {
            let mut conn = open_connection(&path)?;
            let tx = conn.transaction()?;

            let changed = tx.execute(
                "UPDATE campaigns SET name = ?1, date = ?2 WHERE campaign_id = ?3",
                params![name, scheduled_date, campaign_id],
            )?;
            if changed == 0 {
                return Ok(None);
            }

            let campaign = select_campaign(&tx, campaign_id)?;
            tx.commit()?;

            Ok(campaign)
        })
        .await??;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<bool, Error> {
        let path = self.path.clone();
        let deleted = web::block(move || -> rusqlite::Result<bool> {
            let mut conn = open_connection(&path)?;
            let tx = conn.transaction()?;

            let changed = tx.execute(
                "DELETE FROM campaigns WHERE campaign_id = ?1",
                params![campaign_id],
            )?;
            tx.commit()?;

            Ok(changed > 0)
        })
        .await??;

        Ok(deleted)
    }
}

fn select_campaign(
    conn: &Connection,
    campaign_id: CampaignId,
) -> rusqlite::Result<Option<Campaign>> {
    conn.query_row(
        &format!("{} WHERE campaign_id = ?1", CAMPAIGN_SELECT_SQL),
        params![campaign_id],
        parse_campaign_row,
    )
    .optional()
}

fn parse_campaign_row(row: &Row<'_>) -> rusqlite::Result<Campaign> {
    Ok(Campaign {
        id: row.get(0)?,
        name: row.get(1)?,
        scheduled_date: row.get(2)?,
        created_at: row.get(3)?,
    })
}
