use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::{DB_FILE, DEFAULT_PROJECT, SETTINGS_FILE};
use crate::db::Database;
use crate::settings::Settings;

/// Create the data directory with its store and settings. `data_dir` is the
/// `.suggestbox` directory itself.
pub fn run(data_dir: &Path, force: bool) -> Result<()> {
    let db_path = data_dir.join(DB_FILE);
    let settings_path = data_dir.join(SETTINGS_FILE);

    if db_path.exists() && settings_path.exists() && !force {
        println!("Already initialized at {}", data_dir.display());
        println!("Use --force to reset settings to their defaults.");
        return Ok(());
    }

    fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;

    // Opening runs the migrations
    let db = Database::open(&db_path)?;
    db.ensure_project(DEFAULT_PROJECT)?;

    if !settings_path.exists() || force {
        Settings::default().save(&settings_path)?;
    }

    println!("Initialized {}", data_dir.display());
    println!("Default project: {}", DEFAULT_PROJECT);
    Ok(())
}
