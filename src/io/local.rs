use crate::io::{verify_relative_path, ContentReader};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub struct LocalContentReader {
    pub root_path: PathBuf,
}

impl LocalContentReader {
    pub fn new(root_path: impl Into<PathBuf>) -> Self {
        Self {
            root_path: root_path.into(),
        }
    }
}

#[async_trait]
impl ContentReader for LocalContentReader {
    async fn read_to_string(&self, path: &Path) -> Result<String> {
        let verified = verify_relative_path(&self.root_path, path)?;
        tokio::fs::read_to_string(&verified)
            .await
            .with_context(|| format!("Unable to read file {}", verified.display()))
    }

    async fn exists(&self, path: &Path) -> Result<bool> {
        // nothing outside the content root can be content
        let Ok(verified) = verify_relative_path(&self.root_path, path) else {
            return Ok(false);
        };

        match tokio::fs::metadata(&verified).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Unable to stat {}", verified.display())),
        }
    }

    async fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let walk_root = verify_relative_path(&self.root_path, root)?;
        let content_root = self.root_path.clone();

        // walkdir is blocking, keep it off the async workers
        tokio::task::spawn_blocking(move || {
            let mut entries = Vec::new();
            for entry in WalkDir::new(&walk_root) {
                let entry = entry
                    .with_context(|| format!("Failed to walk {}", walk_root.display()))?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let relative = entry
                    .path()
                    .strip_prefix(&content_root)
                    .unwrap_or(entry.path())
                    .to_path_buf();
                entries.push(relative);
            }
            Ok(entries)
        })
        .await
        .context("Directory walk task panicked")?
    }
}
