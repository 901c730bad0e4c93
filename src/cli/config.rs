//! CLI session storage.
//!
//! The browser front-end keeps its bearer token in a cookie read once at
//! startup; the CLI equivalent is a small JSON file under the user's config
//! directory, read once per invocation.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub saved_at: DateTime<Utc>,
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("FLIPDOCS_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("flipdocs")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

fn session_file() -> anyhow::Result<PathBuf> {
    Ok(get_config_dir()?.join("session.json"))
}

/// Read the stored bearer token, if any.
pub fn load_token() -> anyhow::Result<Option<String>> {
    let file = session_file()?;
    if !file.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(file)?;
    let session: StoredSession = serde_json::from_str(&content)?;
    if session.token.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(session.token))
}

pub fn save_token(token: &str) -> anyhow::Result<()> {
    let session = StoredSession { token: token.to_string(), saved_at: Utc::now() };
    let content = serde_json::to_string_pretty(&session)?;
    fs::write(session_file()?, content)?;
    Ok(())
}

pub fn clear_token() -> anyhow::Result<bool> {
    let file = session_file()?;
    if file.exists() {
        fs::remove_file(file)?;
        return Ok(true);
    }
    Ok(false)
}
