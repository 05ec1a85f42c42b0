use chrono::{DateTime, Utc};

use crate::database::Database;
use crate::error::Error;

use super::{Campaign, CampaignId, NewCampaign};

fn validate_name(name: &str) -> Result<(), Error> {
    if name.trim().is_empty() {
        return Err(Error::CampaignNameIsEmpty);
    }

    Ok(())
}

#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: &dyn Database,
    name: String,
    scheduled_date: Option<DateTime<Utc>>,
) -> Result<Campaign, Error> {
    validate_name(&name)?;

    let campaign = NewCampaign {
        name,
        scheduled_date,
        created_at: Utc::now(),
    };

    let campaign = db.campaigns().insert_campaign(campaign).await?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaigns(db: &dyn Database) -> Result<Vec<Campaign>, Error> {
    let campaigns = db.campaigns().fetch_campaigns().await?;

    Ok(campaigns)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: &dyn Database,
    campaign_id: CampaignId,
) -> Result<Campaign, Error> {
    let campaign = db
        .campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    Ok(campaign)
}

/// Replaces the name and scheduled date. Both are always overwritten, so a
/// missing date clears the old one.
#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: &dyn Database,
    campaign_id: CampaignId,
    name: String,
    scheduled_date: Option<DateTime<Utc>>,
) -> Result<Campaign, Error> {
    validate_name(&name)?;

    let campaign = db
        .campaigns()
        .update_campaign(campaign_id, name, scheduled_date)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn delete_campaign(db: &dyn Database, campaign_id: CampaignId) -> Result<(), Error> {
    let deleted = db.campaigns().delete_campaign(campaign_id).await?;
    if !deleted {
        return Err(Error::CampaignNotFound { campaign_id });
    }

    Ok(())
}
