use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

pub mod local;

// every path handed to a reader is relative to the content root and uses '/' separators
#[async_trait]
pub trait ContentReader: Send + Sync {
    async fn read_to_string(&self, path: &Path) -> Result<String>;
    /// `Ok(false)` only when nothing is there; other failures are errors.
    async fn exists(&self, path: &Path) -> Result<bool>;
    async fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

/// Joins `relative` onto `root`, refusing anything that could land outside of it.
pub fn verify_relative_path(root: &Path, relative: &Path) -> Result<PathBuf> {
    let mut verified = root.to_path_buf();

    for component in relative.components() {
        match component {
            Component::CurDir => {}
            Component::Normal(part) => verified.push(part),
            Component::ParentDir => {
                return Err(anyhow!(
                    "Refusing to traverse above content root: {}",
                    relative.display()
                ));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(anyhow!(
                    "Expected a path relative to the content root, got {}",
                    relative.display()
                ));
            }
        }
    }

    Ok(verified)
}

/// Renders a path the way the rest of the crate compares them: forward slashes only.
pub fn path_to_slashed(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
