use std::path::Path;

use tempfile::NamedTempFile;

fn parent_dir(target: &Path) -> std::io::Result<&Path> {
    target.parent().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} has no parent directory", target.display()),
        )
    })
}

/// Replace `target` with `content` via a sibling temp file, creating the data
/// directory on first use. Readers see either the old or the new file.
pub fn atomic_write(target: &Path, content: &str) -> std::io::Result<()> {
    let parent = parent_dir(target)?;
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    std::fs::write(temp.path(), content)?;
    temp.persist(target)?;
    Ok(())
}

pub async fn atomic_write_async(target: &Path, content: &str) -> std::io::Result<()> {
    let parent = parent_dir(target)?;
    tokio::fs::create_dir_all(parent).await?;

    let temp = NamedTempFile::new_in(parent)?;
    tokio::fs::write(temp.path(), content).await?;
    temp.persist(target)?;
    Ok(())
}

/// `None` when the file does not exist yet.
pub async fn read_if_exists(path: &Path) -> std::io::Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    use crate::global::{compute_documents_path, compute_settings_path};

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn settings_reset_creates_the_data_dir() {
        let temp = tempdir().unwrap();
        let base = temp.path().join("com.readaloud.cli");
        let target = compute_settings_path(&base);

        atomic_write(&target, "{}").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "{}");
        assert_eq!(entries(&base), ["settings.json"]);
    }

    #[tokio::test]
    async fn documents_file_is_replaced_without_leftovers() {
        let temp = tempdir().unwrap();
        let target = compute_documents_path(temp.path());
        fs::write(&target, r#"[{"stale":true}]"#).unwrap();

        atomic_write_async(&target, "[]").await.unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "[]");
        assert_eq!(entries(temp.path()), ["documents.json"]);
    }

    #[test]
    fn bare_file_name_is_rejected() {
        let err = atomic_write(Path::new(""), "{}").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn read_if_exists_distinguishes_missing_files() {
        let temp = tempdir().unwrap();
        let target = compute_settings_path(temp.path());

        assert_eq!(read_if_exists(&target).await.unwrap(), None);

        fs::write(&target, "{}").unwrap();
        assert_eq!(
            read_if_exists(&target).await.unwrap().as_deref(),
            Some("{}")
        );
    }
}
