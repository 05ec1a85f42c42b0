use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::Level;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    /// Lost when the process exits.
    Memory,
    /// Kept in a single SQLite file.
    Sqlite,
}

/// Serves the campaign API.
#[derive(Clone, Debug, Parser)]
#[command(name = "campaignd", version)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "CAMPAIGND_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// Where campaigns are stored.
    #[arg(long, env = "CAMPAIGND_STORE", value_enum, default_value_t = StoreKind::Sqlite)]
    pub store: StoreKind,

    /// Database file used by the sqlite store.
    #[arg(long, env = "CAMPAIGND_DATABASE", default_value = "database.db")]
    pub database: PathBuf,

    /// Skip inserting sample campaigns into an empty store.
    #[arg(long, env = "CAMPAIGND_NO_SEED")]
    pub no_seed: bool,

    #[arg(long, env = "CAMPAIGND_LOG_LEVEL", default_value_t = Level::INFO)]
    pub log_level: Level,
}
