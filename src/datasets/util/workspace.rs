use std::{
    io,
    path::{Path, PathBuf},
};

use tokio::fs;

use crate::datasets::{ARCHIVE_FILE_NAME, DATASET_DIR_NAME};

static CACHE_DIR_NAME: &str = ".cache";

/// Directory tree owned by a single request:
///
/// ```text
/// <requests_dir>/<request_id>/
///     Dataset/<CLASS>/<image_id>.png
///     generated_images.zip
///     .cache/
/// ```
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Creates an empty workspace, wiping whatever was left under the same id.
    pub async fn create(requests_dir: &Path, request_id: &str) -> io::Result<Self> {
        let workspace = Self {
            root: requests_dir.join(request_id),
        };

        if fs::try_exists(&workspace.root).await? {
            fs::remove_dir_all(&workspace.root).await?;
        }
        fs::create_dir_all(workspace.dataset_dir()).await?;

        Ok(workspace)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dataset_dir(&self) -> PathBuf {
        self.root.join(DATASET_DIR_NAME)
    }

    pub fn class_dir(&self, sanitized_class_name: &str) -> PathBuf {
        self.dataset_dir().join(sanitized_class_name)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(CACHE_DIR_NAME)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.root.join(ARCHIVE_FILE_NAME)
    }

    pub async fn remove(&self) -> io::Result<()> {
        match fs::remove_dir_all(&self.root).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_resets_an_existing_tree() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("req-1/Dataset/OLD/64.png");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, b"old").unwrap();

        let workspace = Workspace::create(dir.path(), "req-1").await.unwrap();

        assert!(!stale.exists());
        assert!(workspace.dataset_dir().is_dir());
        assert_eq!(
            workspace.class_dir("CAT"),
            dir.path().join("req-1").join("Dataset").join("CAT")
        );
        assert_eq!(
            workspace.archive_path(),
            dir.path().join("req-1").join("generated_images.zip")
        );
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::create(dir.path(), "req-2").await.unwrap();

        workspace.remove().await.unwrap();
        assert!(!workspace.root().exists());
        workspace.remove().await.unwrap();
    }
}
