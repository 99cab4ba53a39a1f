use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::RwLock;

/// User preferences for playback and autosave.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
#[serde(default)]
pub struct ReaderSettings {
    pub default_voice: Option<String>,
    pub default_rate: f32,
    pub auto_scroll: bool,
    pub autosave_delay_ms: u64,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            default_voice: None,
            default_rate: 1.0,
            auto_scroll: true,
            autosave_delay_ms: 1000,
        }
    }
}

impl ReaderSettings {
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}

pub struct SettingsStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    async fn read_or_default(&self) -> crate::Result<serde_json::Value> {
        match crate::fs::read_if_exists(&self.path).await? {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(serde_json::json!({})),
        }
    }

    pub async fn load_raw(&self) -> crate::Result<serde_json::Value> {
        let _guard = self.lock.read().await;
        self.read_or_default().await
    }

    /// Typed view; keys missing from the file take their defaults.
    pub async fn load(&self) -> crate::Result<ReaderSettings> {
        let raw = self.load_raw().await?;
        Ok(serde_json::from_value(raw)?)
    }

    /// Merge `settings` over whatever is on disk. Keys not present in
    /// `settings` are preserved.
    pub async fn save(&self, settings: serde_json::Value) -> crate::Result<()> {
        let _guard = self.lock.write().await;

        let existing = self.read_or_default().await?;
        let merged = merge_settings(existing, settings);
        let content = serde_json::to_string_pretty(&merged)?;

        crate::fs::atomic_write_async(&self.path, &content).await?;
        tracing::debug!(path = %self.path.display(), "settings_saved");
        Ok(())
    }

    pub fn reset(&self) -> crate::Result<()> {
        crate::fs::atomic_write(&self.path, "{}")?;
        Ok(())
    }
}

fn merge_settings(existing: serde_json::Value, incoming: serde_json::Value) -> serde_json::Value {
    match (existing, incoming) {
        (serde_json::Value::Object(mut existing_map), serde_json::Value::Object(incoming_map)) => {
            existing_map.extend(incoming_map);
            serde_json::Value::Object(existing_map)
        }
        (_, incoming) => incoming,
    }
}
