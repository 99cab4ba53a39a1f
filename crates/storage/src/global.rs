use std::path::{Path, PathBuf};

pub const DOCUMENTS_FILENAME: &str = "documents.json";
pub const SETTINGS_FILENAME: &str = "settings.json";

pub fn compute_documents_path(base: &Path) -> PathBuf {
    base.join(DOCUMENTS_FILENAME)
}

pub fn compute_settings_path(base: &Path) -> PathBuf {
    base.join(SETTINGS_FILENAME)
}

pub fn compute_default_base(app_id: &str) -> crate::Result<PathBuf> {
    let data_dir = dirs::data_dir().ok_or(crate::Error::DataDirUnavailable)?;
    Ok(data_dir.join(resolve_app_folder(app_id)))
}

fn resolve_app_folder(app_id: &str) -> &str {
    if cfg!(debug_assertions) || app_id.ends_with(".staging") {
        app_id
    } else {
        "read-aloud"
    }
}
