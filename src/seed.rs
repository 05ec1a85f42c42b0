use chrono::Utc;
use tracing::info;

use crate::campaign::NewCampaign;
use crate::database::Database;
use crate::error::Error;

const SEED_CAMPAIGNS: &[&str] = &["Summer Launch", "Black Friday"];

/// Fills an empty store with sample campaigns. Does nothing if any campaign
/// already exists.
pub async fn seed(db: &dyn Database) -> Result<(), Error> {
    let existing = db.campaigns().fetch_campaigns().await?;
    if !existing.is_empty() {
        info!("skipping seed, {} campaigns exist", existing.len());
        return Ok(());
    }

    let now = Utc::now();
    for name in SEED_CAMPAIGNS {
        let campaign = NewCampaign {
            name: name.to_string(),
            scheduled_date: Some(now),
            created_at: now,
        };

        db.campaigns().insert_campaign(campaign).await?;
    }

    info!("seeded {} campaigns", SEED_CAMPAIGNS.len());

    Ok(())
}
