use anyhow::{bail, Context as _, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::db::Database;
use crate::settings::Settings;

pub const DATA_DIR_NAME: &str = ".suggestbox";
pub const DB_FILE: &str = "store.db";
pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_PROJECT: &str = "demo";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Install the global tracing subscriber. Output goes to stderr so command
/// output on stdout stays clean. `RUST_LOG` overrides the default `warn`.
pub fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let _ = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}

/// Walk up from `start` looking for a `.suggestbox` directory.
pub fn find_data_dir(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Ok(candidate);
        }

        if !current.pop() {
            bail!("Not a suggestbox directory (or any parent). Run 'suggestbox init' first.");
        }
    }
}

/// Where the store and settings live for this invocation.
#[derive(Debug, Clone)]
pub struct Context {
    pub data_dir: PathBuf,
    pub project: String,
}

impl Context {
    /// Use the explicit data directory if given, otherwise search upwards
    /// from the current directory.
    pub fn resolve(data_dir: Option<PathBuf>, project: &str) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => {
                if !dir.is_dir() {
                    bail!("Data directory {} does not exist. Run 'suggestbox init' first.", dir.display());
                }
                dir
            }
            None => find_data_dir(&env::current_dir()?)?,
        };
        Ok(Context {
            data_dir,
            project: project.to_string(),
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }

    pub fn open_db(&self) -> Result<Database> {
        Database::open(&self.db_path()).context("Failed to open database")
    }

    pub fn load_settings(&self) -> Result<Settings> {
        Settings::load(&self.settings_path())
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        settings.save(&self.settings_path())
    }
}
