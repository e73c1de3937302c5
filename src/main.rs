use dotenvy::dotenv;
use lniworks_buddy::{
    api::{ClubApi, HttpClubApi},
    bot::{self, BotData},
    config::{self, database},
    core::{
        session::SessionStore,
        storage::{KeyValueStore, SqliteStore},
    },
    errors::{Error, Result},
};
use std::{env, sync::Arc};
use tracing::{error, info, warn};
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
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = config::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!("Backend API at {}", app_config.api.base_url);
    if app_config.access.allowed_users.is_empty() {
        warn!("No Discord user is allowed to use the bot, set [access] allowed_users");
    }

    // 4. Open the local state database
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to open database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Restore the session and point the client at the backend
    let storage: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::new(db));
    let session = SessionStore::load(storage).await;
    let api = HttpClubApi::new(app_config.api.base_url.clone())?;
    api.set_bearer(session.token().map(str::to_string));
    if let Some(user) = session.current_user() {
        info!("Restored session of {}", user.username);
    }

    // 6. Run the bot
    // DISCORD_BOT_TOKEN is loaded here, directly before use, not stored in AppConfig
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    let data = BotData::new(Arc::new(api), session, app_config);
    bot::run_bot(token, data).await
}
