use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::Server;
use actix_web::web::{self, Data, JsonConfig, PathConfig};
use actix_web::{get, App, HttpServer, ResponseError};
use serde_json::json;
use tracing_actix_web::TracingLogger;

pub mod campaign;
pub mod config;
pub mod database;
pub mod envelope;
pub mod error;
pub mod seed;
pub mod typedid;

pub use campaign::{Campaign, CampaignBody, CampaignId, CampaignRequestBody};
pub use config::{Config, StoreKind};
pub use database::{Database, MemoryDatabase, SqliteDatabase};
pub use envelope::Envelope;
pub use error::Error;

#[get("/")]
async fn root() -> web::Json<serde_json::Value> {
    web::Json(json!({ "message": "Hello World!" }))
}

/// Starts serving on an already bound listener. The returned server must be
/// awaited or spawned to make progress.
pub fn run(listener: TcpListener, db: Arc<dyn Database>) -> Result<Server, Error> {
    let db = Data::from(db);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(JsonConfig::default().error_handler(|err, _req| {
                // format json errors with custom format
                Error::InvalidJson(err).into()
            }))
            .app_data(PathConfig::default().error_handler(|err, _req| {
                // format path errors with custom format
                Error::InvalidPath(err).into()
            }))
            .app_data(db.clone())
            .wrap(TracingLogger::default())
            .service(
                web::scope("/api/v1")
                    .service(root)
                    .service(campaign::endpoints::get_campaigns)
                    .service(campaign::endpoints::get_campaign_by_id)
                    .service(campaign::endpoints::create_campaign)
                    .service(campaign::endpoints::update_campaign)
                    .service(campaign::endpoints::delete_campaign),
            )
            .default_service(web::to(|| async { Error::PathNotFound.error_response() }))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
