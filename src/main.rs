use std::net::TcpListener;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;

use campaignd::{seed, Config, Database, Error, MemoryDatabase, SqliteDatabase, StoreKind};

#[actix_web::main]
async fn main() -> Result<(), Error> {
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_span_events(FmtSpan::NEW)
        .compact()
        .init();

    let db: Arc<dyn Database> = match config.store {
        StoreKind::Memory => {
            info!("using in-memory store");
            Arc::new(MemoryDatabase::new())
        }
        StoreKind::Sqlite => Arc::new(SqliteDatabase::open(config.database.clone())?),
    };

    if !config.no_seed {
        seed::seed(&*db).await?;
    }

    info!("listening on {}", config.bind);
    let listener = TcpListener::bind(config.bind)?;
    campaignd::run(listener, db)?.await?;

    Ok(())
}
