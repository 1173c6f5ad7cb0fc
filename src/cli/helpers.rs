//! Shared helper functions for CLI commands.

use crate::config::Settings;
use crate::repository::{
    create_diesel_pool_from_url, run_migrations, DieselAdRepository, DieselJobRepository,
};

/// Repositories opened against the configured database.
pub struct Stores {
    pub jobs: DieselJobRepository,
    pub ads: DieselAdRepository,
}

/// Open the database, applying any pending migrations first.
pub async fn open_stores(settings: &Settings) -> anyhow::Result<Stores> {
    settings.ensure_directories()?;
    let url = settings.database_url();
    run_migrations(&url).await?;
    let pool = create_diesel_pool_from_url(&url)?;

    Ok(Stores {
        jobs: DieselJobRepository::new(pool.clone()),
        ads: DieselAdRepository::new(pool),
    })
}

/// Truncate a string for table display (char-aware).
pub fn truncate(s: &str, max: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max {
        return s;
    }
    let cut: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", cut)
}
