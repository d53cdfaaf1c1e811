//! Caching collaborator for remote assets.
//!
//! [`FsRemoteFileCache`] downloads a URL once into a local directory and
//! reuses the cached copy on later runs. Files are keyed by the SHA-256 of
//! their URL, so the same URL always maps to the same path and id.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use url::Url;

/// Errors that can occur while mirroring a remote file.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Download failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reading or writing the cache directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle to a locally cached copy of a remote file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    /// Opaque id attached to the owning node.
    pub id: String,
    /// Where the file was fetched from.
    pub url: String,
    /// Id of the node that referenced the file.
    pub parent_node_id: String,
    /// Location of the cached copy.
    pub path: PathBuf,
}

/// Mirrors remote files into local storage.
#[async_trait]
pub trait RemoteFileCache: Send + Sync {
    /// Fetches (or reuses) a local copy of `url` on behalf of
    /// `parent_node_id`.
    ///
    /// Returns `Ok(None)` when the URL is not something this cache can
    /// mirror.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the download or the write fails.
    async fn create_remote_file_node(
        &self,
        url: &str,
        parent_node_id: &str,
    ) -> Result<Option<FileNode>, CacheError>;
}

/// [`RemoteFileCache`] that stores files under a directory on disk.
#[derive(Debug, Clone)]
pub struct FsRemoteFileCache {
    dir: PathBuf,
    client: reqwest::Client,
}

impl FsRemoteFileCache {
    /// Creates a cache rooted at `dir`. The directory is created on first
    /// write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Root directory of the cache.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the given URL is cached at.
    #[must_use]
    pub fn path_for(&self, url: &Url) -> PathBuf {
        self.dir.join(format!("{}.{}", url_digest(url), extension(url)))
    }
}

#[async_trait]
impl RemoteFileCache for FsRemoteFileCache {
    async fn create_remote_file_node(
        &self,
        url: &str,
        parent_node_id: &str,
    ) -> Result<Option<FileNode>, CacheError> {
        let Ok(parsed) = Url::parse(url) else {
            log::debug!("Not mirroring unparsable URL '{url}'");
            return Ok(None);
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            log::debug!("Not mirroring non-HTTP URL '{url}'");
            return Ok(None);
        }

        let path = self.path_for(&parsed);

        if tokio::fs::try_exists(&path).await? {
            log::debug!("Reusing cached {} for {url}", path.display());
        } else {
            let response = self
                .client
                .get(parsed.clone())
                .send()
                .await?
                .error_for_status()?;
            let bytes = response.bytes().await?;

            tokio::fs::create_dir_all(&self.dir).await?;
            tokio::fs::write(&path, &bytes).await?;

            log::debug!("Cached {} bytes from {url} at {}", bytes.len(), path.display());
        }

        Ok(Some(FileNode {
            id: format!("remote-file-{}", url_digest(&parsed)),
            url: url.to_owned(),
            parent_node_id: parent_node_id.to_owned(),
            path,
        }))
    }
}

fn url_digest(url: &Url) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_str().as_bytes());
    hex::encode(hasher.finalize())
}

/// Extension of the last path segment, or `bin` when there is none.
fn extension(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "bin".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "trust_reviews_cache_{name}_{}",
            std::process::id()
        ))
    }

    #[test]
    fn extension_comes_from_last_segment() {
        let url = Url::parse("https://cdn.example.com/stars/stars-4.5.SVG?v=2").unwrap();
        assert_eq!(extension(&url), "svg");

        let url = Url::parse("https://cdn.example.com/stars/").unwrap();
        assert_eq!(extension(&url), "bin");
    }

    #[test]
    fn same_url_maps_to_same_path() {
        let cache = FsRemoteFileCache::new("/tmp/cache");
        let url = Url::parse("https://cdn.example.com/stars-4.svg").unwrap();
        assert_eq!(cache.path_for(&url), cache.path_for(&url));
        assert!(cache.path_for(&url).starts_with("/tmp/cache"));
    }

    #[tokio::test]
    async fn reuses_existing_file_without_downloading() {
        let dir = scratch_dir("reuse");
        let cache = FsRemoteFileCache::new(&dir);
        // Unroutable host: any download attempt would fail.
        let url = "https://cdn.invalid/stars-4.svg";
        let path = cache.path_for(&Url::parse(url).unwrap());

        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(&path, b"<svg/>").await.unwrap();

        let file = cache
            .create_remote_file_node(url, "trust-acme")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(file.path, path);
        assert_eq!(file.parent_node_id, "trust-acme");
        assert!(file.id.starts_with("remote-file-"));

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn skips_non_http_urls() {
        let cache = FsRemoteFileCache::new(scratch_dir("skip"));
        assert!(
            cache
                .create_remote_file_node("data:image/svg+xml,<svg/>", "n")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            cache
                .create_remote_file_node("/relative.svg", "n")
                .await
                .unwrap()
                .is_none()
        );
    }
}
