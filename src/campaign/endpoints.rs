use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::database::Database;
use crate::envelope::Envelope;
use crate::error::Error;

use super::{manager, Campaign, CampaignId};

/// Body accepted by both create and update.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CampaignRequestBody {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_date")]
    pub date: Option<DateTime<Utc>>,
}

/// Reads a timestamp with an offset, a naive timestamp, or a bare date. The
/// latter two are taken as UTC, a bare date as midnight.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Utc.from_utc_datetime(&date));
    }

    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) => parse_date(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid date: {}", value))),
        None => Ok(None),
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CampaignBody {
    pub campaign_id: CampaignId,
    pub name: String,
    pub date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl CampaignBody {
    pub fn render(campaign: Campaign) -> CampaignBody {
        CampaignBody {
            campaign_id: campaign.id,
            name: campaign.name,
            date: campaign.scheduled_date,
            created_at: campaign.created_at,
        }
    }
}

#[get("/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn get_campaigns(
    db: Data<dyn Database>,
) -> Result<Json<Envelope<Vec<CampaignBody>>>, Error> {
    let campaigns = manager::get_campaigns(&**db).await?;

    let body = campaigns.into_iter().map(CampaignBody::render).collect();

    Ok(Json(Envelope::new(body)))
}

#[get("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: Data<dyn Database>,
    params: Path<CampaignId>,
) -> Result<Json<Envelope<CampaignBody>>, Error> {
    let campaign_id = params.into_inner();

    let campaign = manager::get_campaign_by_id(&**db, campaign_id).await?;

    Ok(Json(Envelope::new(CampaignBody::render(campaign))))
}

#[post("/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: Data<dyn Database>,
    body: Json<CampaignRequestBody>,
) -> Result<HttpResponse, Error> {
    let body = body.into_inner();

    let campaign = manager::create_campaign(&**db, body.name, body.date).await?;

    Ok(HttpResponse::Created().json(Envelope::new(CampaignBody::render(campaign))))
}

#[put("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: Data<dyn Database>,
    params: Path<CampaignId>,
    body: Json<CampaignRequestBody>,
) -> Result<Json<Envelope<CampaignBody>>, Error> {
    let campaign_id = params.into_inner();
    let body = body.into_inner();

    let campaign = manager::update_campaign(&**db, campaign_id, body.name, body.date).await?;

    Ok(Json(Envelope::new(CampaignBody::render(campaign))))
}

#[delete("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_campaign(
    db: Data<dyn Database>,
    params: Path<CampaignId>,
) -> Result<HttpResponse, Error> {
    let campaign_id = params.into_inner();

    manager::delete_campaign(&**db, campaign_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
