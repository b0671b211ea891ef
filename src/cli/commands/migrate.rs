use anyhow::Context;

use crate::config;
use crate::database::DatabaseManager;

pub async fn handle() -> anyhow::Result<()> {
    let config = config::config();
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    DatabaseManager::migrate(&pool)
        .await
        .context("failed to apply schema")?;

    pool.close().await;
    println!("Schema applied");
    Ok(())
}
