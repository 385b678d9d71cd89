//! SQLite-based persistent settings for the triage tool.
//!
//! A small key-value table holds the last opened directory and the output
//! volume. The database is stored at `XDG_CONFIG_HOME/clipsort/settings.sqlite`
//! and is read once at startup and written after a successful directory load
//! or a volume change.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{info, warn};

const KEY_LAST_DIRECTORY: &str = "last_directory";
const KEY_VOLUME: &str = "volume";

/// Default output volume when none has been persisted.
pub const DEFAULT_VOLUME: f64 = 1.0;

/// SQLite-backed settings store.
pub struct SettingsStore {
    conn: Connection,
}

impl SettingsStore {
    /// Opens or creates the database at the default XDG location.
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "clipsort", "clipsort")
            .context("Could not determine config directory")?;
        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir)
            .with_context(|| format!("Failed to create config dir {:?}", config_dir))?;
        Self::open(&config_dir.join("settings.sqlite"))
    }

    /// Opens or creates the database at a specific path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open settings database {:?}", path))?;
        let store = Self { conn };
        store.init_schema()?;
        info!("Opened settings store at {:?}", path);
        Ok(store)
    }

    /// Opens an in-memory store. Used when the config directory is not
    /// writable; settings then last for the session only.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory settings")?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS settings (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL
                )",
                [],
            )
            .context("Failed to create settings table")?;
        Ok(())
    }

    fn get(&self, key: &str) -> Option<String> {
        self.conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .unwrap_or_else(|e| {
                warn!("Failed to read setting {:?}: {}", key, e);
                None
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .with_context(|| format!("Failed to write setting {:?}", key))?;
        Ok(())
    }

    /// The last successfully opened directory, if any.
    pub fn last_directory(&self) -> Option<PathBuf> {
        self.get(KEY_LAST_DIRECTORY).map(PathBuf::from)
    }

    pub fn set_last_directory(&self, dir: &Path) -> Result<()> {
        self.set(KEY_LAST_DIRECTORY, &dir.to_string_lossy())
    }

    /// Persisted output volume in `0.0..=1.0`, or the default.
    pub fn volume(&self) -> f64 {
        self.get(KEY_VOLUME)
            .and_then(|v| v.parse::<f64>().ok())
            .map(|v| v.clamp(0.0, 1.0))
            .unwrap_or(DEFAULT_VOLUME)
    }

    pub fn set_volume(&self, volume: f64) -> Result<()> {
        self.set(KEY_VOLUME, &format!("{:.2}", volume.clamp(0.0, 1.0)))
    }
}
