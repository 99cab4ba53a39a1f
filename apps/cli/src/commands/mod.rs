pub mod documents;
pub mod read;
pub mod settings;

use std::path::Path;
use std::sync::Arc;

use hypr_storage::{JsonFileStore, SettingsStore, global};

pub struct Context {
    pub documents: Arc<JsonFileStore>,
    pub settings: SettingsStore,
}

impl Context {
    pub fn new(base: &Path) -> Self {
        Self {
            documents: Arc::new(JsonFileStore::new(global::compute_documents_path(base))),
            settings: SettingsStore::new(global::compute_settings_path(base)),
        }
    }
}
