use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use crate::error::ContentError;

pub mod manifest;

pub use manifest::{Article, Folder, Manifest};

/// Key of the manifest object in the content bucket.
pub const MANIFEST_KEY: &str = "manifest.json";

/// Object storage as seen by the site: flat `/`-separated keys mapping to bytes.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ContentError>;

    /// All keys starting with `prefix`, sorted.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, ContentError>;
}

/// Content store backed by a local directory (a synced copy of the bucket).
#[derive(Debug, Clone)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, ContentError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }
}

/// Keys are relative and may not escape the store root.
pub fn validate_key(key: &str) -> Result<(), ContentError> {
    let invalid = || ContentError::InvalidKey(key.to_string());
    if key.is_empty() || key.contains('\\') || key.contains('\0') {
        return Err(invalid());
    }
    for component in Path::new(key).components() {
        match component {
            Component::Normal(_) => {}
            _ => return Err(invalid()),
        }
    }
    Ok(())
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, ContentError> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            // a directory is not an object
            Err(_) if path.is_dir() => Ok(None),
            Err(source) => Err(ContentError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, ContentError> {
        let root = self.root.clone();
        let prefix = prefix.to_string();
        let walked = tokio::task::spawn_blocking(move || walk_keys(&root))
            .await
            .map_err(|e| ContentError::Io {
                key: prefix.clone(),
                source: std::io::Error::other(e),
            })?;

        let mut keys: Vec<String> = walked
            .map_err(|source| ContentError::Io {
                key: prefix.clone(),
                source,
            })?
            .into_iter()
            .filter(|k| k.starts_with(&prefix))
            .collect();
        keys.sort();
        Ok(keys)
    }
}

fn walk_keys(root: &Path) -> std::io::Result<Vec<String>> {
    if !root.exists() {
        return Ok(Vec::new());
    }
    let mut keys = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(std::io::Error::other)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let key = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        keys.push(key);
    }
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_escaping_keys() {
        for key in ["", "../secret", "a/../../b", "/etc/passwd", "a\\b", "./a"] {
            assert!(validate_key(key).is_err(), "{key}");
        }
        assert!(validate_key("guides/deploy.md").is_ok());
    }

    #[tokio::test]
    async fn get_and_list() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("guides")).unwrap();
        std::fs::write(dir.path().join("guides/deploy.md"), "# Deploy").unwrap();
        std::fs::write(dir.path().join("intro.md"), "# Intro").unwrap();

        let store = FsContentStore::new(dir.path());
        assert_eq!(
            store.get("guides/deploy.md").await.unwrap().as_deref(),
            Some(b"# Deploy".as_slice())
        );
        assert!(store.get("missing.md").await.unwrap().is_none());
        assert!(store.get("guides").await.unwrap().is_none());
        assert!(matches!(
            store.get("../x").await,
            Err(ContentError::InvalidKey(_))
        ));

        assert_eq!(
            store.list("").await.unwrap(),
            vec!["guides/deploy.md".to_string(), "intro.md".to_string()]
        );
        assert_eq!(
            store.list("guides/").await.unwrap(),
            vec!["guides/deploy.md".to_string()]
        );
    }

    #[tokio::test]
    async fn list_of_missing_root_is_empty() {
        let store = FsContentStore::new("/nonexistent/docsite-content");
        assert!(store.list("").await.unwrap().is_empty());
    }
}
