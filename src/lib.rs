pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

pub use error::SeedError;
pub use logic::{Runner, RunPhase, SeedPlan, UpsertEngine, ViewProvisioner};
pub use model::*;
pub use store::{InMemoryStore, PostgresStore, Store};

use anyhow::Result;
use crate::config::AppConfig;
use crate::seed::BcryptHasher;

/// Connect, optionally migrate, and run every configured phase.
///
/// The pool is closed exactly once whether or not the run succeeds.
pub async fn run_seed(config: &AppConfig) -> Result<RunSummary> {
    let store = PostgresStore::new(&config.database_url(), config.database.max_connections).await?;
    log::info!("Connected to PostgreSQL");

    let result = seed_with(&store, config).await;

    if let Err(e) = store.close().await {
        log::warn!("Failed to close database connection: {:#}", e);
    }

    result
}

async fn seed_with(store: &PostgresStore, config: &AppConfig) -> Result<RunSummary> {
    if config.database.migrate {
        log::info!("Running database migrations");
        store.migrate().await?;
    }

    let plan = SeedPlan::from_config(&config.seed)?;
    let hasher = BcryptHasher::new(config.seed.bcrypt_cost);
    Runner::new(store, &hasher, plan).run().await
}
