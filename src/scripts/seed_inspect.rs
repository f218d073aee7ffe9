//! Read-only checks against a seeded database.
//!
//! ```text
//! seed-inspect user <username>
//! seed-inspect report <view>
//! ```

use anyhow::{bail, Context, Result};
use booking_seed::config::AppConfig;
use booking_seed::seed::views;
use booking_seed::store::{PostgresStore, ReportStore, UserLookup};
use serde::Serialize;

const USAGE: &str = "usage: seed-inspect user <username> | seed-inspect report <view>";

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

async fn inspect(store: &PostgresStore, command: &str, argument: &str) -> Result<()> {
    match command {
        "user" => match store.find_user_by_username(argument).await? {
            Some(user) => print_json(&user),
            None => bail!("No user named '{}'", argument),
        },
        "report" => match argument {
            views::TRIAL_BALANCE => print_json(&store.trial_balance().await?),
            views::GENERAL_LEDGER => print_json(&store.general_ledger().await?),
            views::WALLET_BALANCE => print_json(&store.wallet_balances().await?),
            views::RESERVATION_SUMMARY => print_json(&store.reservation_summary().await?),
            views::SHAREHOLDING_SUMMARY => print_json(&store.shareholding_summary().await?),
            views::USER_LOG_AUDIT => print_json(&store.user_log_audit().await?),
            other => bail!("Unknown view '{}'", other),
        },
        other => bail!("Unknown command '{}'\n{}", other, USAGE),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [command, argument] = args.as_slice() else {
        bail!(USAGE);
    };

    let config = AppConfig::load()?;
    let store = PostgresStore::new(&config.database_url(), 1).await?;

    let result = inspect(&store, command, argument).await;

    if let Err(e) = store.close().await {
        log::warn!("Failed to close database connection: {:#}", e);
    }

    result
}
