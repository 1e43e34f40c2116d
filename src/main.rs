use billed::app::App;
use billed::config;
use billed::core::session::EnvSessionStorage;
use billed::errors::Result;
use billed::store::SqliteBillStore;
use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()?;

    // 4. Open the bill store
    let store = SqliteBillStore::connect(&app_config.store)
        .await
        .inspect(|_| info!("Bill store ready."))
        .inspect_err(|e| error!("Failed to open bill store: {}", e))?;

    // 5. Render the requested page for the user in BILLED_USER
    let path = env::args().nth(1).unwrap_or_else(|| "/bills".to_string());
    let mut app = App::new(Arc::new(store), Arc::new(EnvSessionStorage), app_config.form);
    app.navigate(&path)?;
    app.settle().await?;

    for alert in app.alerts() {
        eprintln!("{alert}");
    }
    println!("{}", app.root());

    Ok(())
}
