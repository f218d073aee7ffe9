use booking_seed::config::AppConfig;
use env_logger::Builder;
use log::LevelFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Info by default with sqlx quietened; RUST_LOG refines both
    let mut builder = Builder::new();
    builder
        .filter_level(LevelFilter::Info)
        .filter_module("sqlx", LevelFilter::Warn);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();

    if let Err(e) = run().await {
        log::error!("Seeding failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded: reference={}, views={}, theme={}",
        config.seed.reference,
        config.seed.views,
        config.seed.theme
    );

    let summary = booking_seed::run_seed(&config).await?;
    log::info!(
        "Seeding finished: {} datasets, {} views",
        summary.datasets.len(),
        summary.views.len()
    );
    Ok(())
}
