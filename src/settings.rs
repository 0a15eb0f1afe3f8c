//! Client-side preferences: voter identity, language and theme.
//!
//! Loaded once at startup and written back only when a command changes
//! something. Components receive the loaded value; none of them read the file
//! on their own.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};
use uuid::Uuid;

use crate::i18n::{Language, Messages};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn label(self, messages: &Messages) -> &'static str {
        match self {
            Theme::Light => messages.theme_light,
            Theme::Dark => messages.theme_dark,
            Theme::System => messages.theme_system,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            _ => Err(format!("Invalid theme '{}'. Must be one of: light, dark, system", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub voter_id: Option<String>,
    pub language: Language,
    pub theme: Theme,
}

impl Settings {
    /// Read settings from disk. A missing file gives the defaults; so does a
    /// malformed one, with a warning.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        match serde_json::from_str(&raw) {
            Ok(settings) => Ok(settings),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "malformed settings, using defaults");
                Ok(Settings::default())
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, raw).with_context(|| format!("Failed to write {}", path.display()))
    }

    pub fn messages(&self) -> &'static Messages {
        self.language.messages()
    }

    /// The voter id, generated on first use. The caller persists the settings
    /// afterwards.
    pub fn voter_id_or_create(&mut self) -> &str {
        self.voter_id.get_or_insert_with(|| {
            let id = new_voter_id();
            info!(voter_id = %id, "created voter identity");
            id
        })
    }

    pub fn reset_voter(&mut self) {
        self.voter_id = None;
    }

    pub fn display_voter(&self) -> &str {
        self.voter_id.as_deref().unwrap_or(self.messages().anonymous)
    }
}

fn new_voter_id() -> String {
    format!("voter_{}", Uuid::new_v4().simple())
}
