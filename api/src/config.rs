use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

/// Service configuration. Every flag can also be set through the
/// environment or a `.env` file.
#[derive(Debug, Clone, Parser)]
#[command(name = "crop-yield-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Crop yield prediction web service")]
pub struct Config {
    /// Address to bind
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "API_PORT", default_value_t = 3000)]
    pub port: u16,

    /// SQLite connection string
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://crop_yield.db?mode=rwc")]
    pub database_url: String,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 5)]
    pub max_connections: u32,

    /// Training dataset (CSV with a header row). Not shipped with the
    /// service; startup fails until this points at an existing file.
    #[arg(long = "dataset", env = "DATASET_PATH", default_value = "datasetTugasAkhir.csv")]
    pub dataset_path: PathBuf,

    /// Redirect anonymous visitors to the login page
    #[arg(long, env = "REQUIRE_LOGIN", default_value_t = false)]
    pub require_login: bool,
}

impl Config {
    /// Loads `.env` (if present) and parses the command line.
    pub fn load() -> Self {
        dotenvy::dotenv().ok();
        Self::parse()
    }

    pub fn bind_address(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid bind address {}:{}", self.host, self.port))
    }
}
