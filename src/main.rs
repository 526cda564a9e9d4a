use dotenvy::dotenv;
use life_tycoon::{
    config::settings::load_app_config,
    core::{catalog, report},
    errors::Result,
    store::Store,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    // 3. Settings file, catalog and database URL
    let app_config = load_app_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Open the store; tables and seed are in place once this returns
    let store = Store::open(&app_config)
        .await
        .inspect_err(|e| error!("Failed to open store: {}", e))?;
    info!("Seed: {:?}", store.seed_outcome());

    let counts = catalog::catalog_counts(store.db()).await?;
    info!(
        "Catalog: {} businesses, {} foods, {} cards",
        counts.businesses, counts.foods, counts.cards
    );

    let players = life_tycoon::core::player::get_all_players(store.db()).await?;
    for player in players {
        let summary = report::player_summary(store.db(), player.id).await?;
        info!(
            "{}: cash {:.2}, daily net {}",
            summary.player.name,
            summary.player.cash,
            report::format_signed_amount(summary.daily_net)
        );
    }

    store.close().await
}
