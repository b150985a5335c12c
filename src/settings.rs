//! Application settings.
//!
//! Loaded once at startup from a YAML file. Every field has a default,
//! so a missing file or an empty one yields a usable configuration.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Settings for the admin studio.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppSettings {
    /// Address messages appear to come from when neither the draft nor
    /// the template specifies one.
    #[serde(default = "default_from_email")]
    pub default_from_email: String,
    /// Attach the rendered HTML body as a multipart alternative. When
    /// off, composed messages are plain text only.
    #[serde(default = "default_true")]
    pub allow_html_messages: bool,
    /// Record composition attempts in the journal.
    #[serde(default = "default_true")]
    pub log_previews: bool,
    /// Keep the rendered subject and body in journal entries. Off by
    /// default to limit what the journal retains.
    #[serde(default)]
    pub log_content: bool,
    /// Days a journal entry is kept before a purge removes it.
    #[serde(default = "default_retention_days")]
    pub log_retention_days: i64,
    /// Purge failed entries on the same schedule as successes. Turn off
    /// to keep failures around for inspection.
    #[serde(default = "default_true")]
    pub purge_failed_entries: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_from_email: default_from_email(),
            allow_html_messages: true,
            log_previews: true,
            log_content: false,
            log_retention_days: default_retention_days(),
            purge_failed_entries: true,
        }
    }
}

impl AppSettings {
    /// Load settings from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        let settings: AppSettings = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML settings: {}", path.display()))?;
        Ok(settings)
    }

    /// Load settings from a detected path, defaulting when absent.
    ///
    /// An unreadable or malformed file is still an error; only a missing
    /// one falls back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        let settings = Self::load(path)?;
        info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }
}

fn default_from_email() -> String {
    "webmaster@localhost".to_string()
}

fn default_true() -> bool {
    true
}

fn default_retention_days() -> i64 {
    30
}
