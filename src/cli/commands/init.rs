//! Initialize command.

use console::style;

use crate::config::Settings;
use crate::repository::run_migrations;

/// Initialize the data directory and database.
pub async fn cmd_init(settings: &Settings) -> anyhow::Result<()> {
    settings.ensure_directories()?;

    let applied = run_migrations(&settings.database_url()).await?;
    for name in &applied {
        println!("  {} Applied migration {}", style("✓").green(), name);
    }

    println!(
        "{} Initialized adscope in {}",
        style("✓").green(),
        settings.data_dir.display()
    );

    Ok(())
}
