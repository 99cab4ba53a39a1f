use std::sync::Arc;

use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[cfg_attr(feature = "specta", derive(specta::Type))]
pub struct Voice {
    pub id: String,
    pub name: String,
    pub lang: String,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub local: bool,
}

/// Voices reported by the platform.
///
/// Platforms often report an empty list at startup and fill it in later.
/// Engine adapters [`publish`](Self::publish) whatever they observe;
/// consumers await [`ready`](Self::ready) instead of polling.
#[derive(Clone)]
pub struct VoiceCatalog {
    tx: Arc<watch::Sender<Vec<Voice>>>,
}

impl VoiceCatalog {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self { tx: Arc::new(tx) }
    }

    pub fn publish(&self, voices: Vec<Voice>) {
        self.tx.send_replace(voices);
    }

    /// Resolves with the first non-empty voice list, immediately if one was
    /// already published.
    pub async fn ready(&self) -> Vec<Voice> {
        let mut rx = self.tx.subscribe();
        match rx.wait_for(|voices| !voices.is_empty()).await {
            Ok(voices) => voices.clone(),
            Err(_) => Vec::new(),
        }
    }

    pub fn resolve(&self, preferred: Option<&str>) -> Option<Voice> {
        resolve_voice(&self.tx.borrow(), preferred)
    }
}

impl Default for VoiceCatalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick `preferred` (by id or name), else the platform default, else the
/// first voice.
pub fn resolve_voice(voices: &[Voice], preferred: Option<&str>) -> Option<Voice> {
    preferred
        .and_then(|p| voices.iter().find(|v| v.id == p || v.name == p))
        .or_else(|| voices.iter().find(|v| v.is_default))
        .or_else(|| voices.first())
        .cloned()
}
