//! Configuration for Catalog API

use core_config::{app_info, server::ServerConfig, AppInfo, FromEnv};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub postgres: PostgresConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    /// Populate an empty catalog with sample data at startup
    pub seed_on_startup: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let postgres = PostgresConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        let seed_on_startup = std::env::var("SEED_ON_STARTUP")
            .map(|value| value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            app: app_info!(),
            postgres,
            server,
            environment,
            seed_on_startup,
        })
    }
}
