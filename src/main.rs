use laundry_buddy::{
    api::{self, AppState},
    config::{database, seed, server},
    errors::Result,
};
use dotenvy::dotenv;
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

    // 2. Load .env file, env vars can also be set externally
    dotenv().ok();

    // 3. Connect and make sure the schema exists
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 4. Seed catalog and users from config.toml
    let config_path = server::get_config_path();
    let seed_config = seed::load_config_or_default(&config_path)?;
    seed::seed_database(&db, &seed_config)
        .await
        .inspect(|summary| info!(?summary, "Seed data applied."))
        .inspect_err(|e| error!("Failed to seed database: {}", e))?;

    // 5. Serve the API
    let addr = server::get_bind_address()?;
    api::serve(addr, AppState::new(db)).await
}
