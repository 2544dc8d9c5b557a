//! Local installer cache.
//!
//! Maps file descriptors to deterministic paths under the updates
//! directory, streams downloads through a staging file, and verifies
//! SHA-512 digests.

use crate::error::{Result, UpdateError};
use crate::feed::release::FileDescriptor;
use crate::http::{HttpClient, HttpResponse};
use log::{debug, warn};
use sha2::{Digest, Sha512};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use url::Url;

#[derive(Debug, Clone)]
pub struct FileCache {
    updates_dir: PathBuf,
}

impl FileCache {
    pub fn new(updates_dir: impl Into<PathBuf>) -> Self {
        FileCache {
            updates_dir: updates_dir.into(),
        }
    }

    /// Deterministic local path for a descriptor: the updates directory
    /// joined with the final path segment of the download URL.
    pub fn local_path(&self, file: &FileDescriptor) -> PathBuf {
        self.updates_dir.join(file_name(&file.url))
    }

    pub fn exists(&self, file: &FileDescriptor) -> bool {
        self.local_path(file).exists()
    }

    /// Stream a single GET of `file.url` into the cache.
    ///
    /// The body is written to a staging name and renamed into place once
    /// complete, so no partial file is ever visible at the canonical path.
    /// An existing cached file is overwritten.
    pub async fn download<C: HttpClient>(
        &self,
        client: &C,
        file: &FileDescriptor,
        cancel: &CancellationToken,
    ) -> Result<PathBuf> {
        let target = self.local_path(file);
        fs::create_dir_all(&self.updates_dir).await?;

        debug!("downloading {} to {}", file.url, target.display());
        let mut response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(UpdateError::Cancelled),
            result = client.get(&file.url) => result?,
        };
        if !response.is_success() {
            return Err(UpdateError::ResponseUnsuccessful {
                status: response.status(),
            });
        }

        let staging = staging_path(&target);
        if let Err(error) = stream_body(&mut response, &staging, cancel).await {
            if let Err(cleanup) = fs::remove_file(&staging).await {
                if cleanup.kind() != ErrorKind::NotFound {
                    warn!(
                        "could not remove staging file {}: {cleanup}",
                        staging.display()
                    );
                }
            }
            return Err(error);
        }

        // Drop any stale copy first; renaming over an existing file is
        // not portable.
        match fs::remove_file(&target).await {
            Ok(()) => {}
            Err(error) if error.kind() == ErrorKind::NotFound => {}
            Err(error) => return Err(error.into()),
        }
        fs::rename(&staging, &target).await?;
        Ok(target)
    }

    /// Compare the SHA-512 of the cached file with the descriptor's
    /// expected digest. A missing file or a malformed expected digest is a
    /// mismatch, not an error.
    pub async fn validate(&self, file: &FileDescriptor) -> Result<bool> {
        let Some(expected) = file.checksum() else {
            return Ok(false);
        };

        let path = self.local_path(file);
        let mut reader = match fs::File::open(&path).await {
            Ok(opened) => opened,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(false),
            Err(error) => return Err(error.into()),
        };

        let mut hasher = Sha512::new();
        let mut buffer = vec![0u8; 64 * 1024];
        loop {
            let read = reader.read(&mut buffer).await?;
            if read == 0 {
                break;
            }
            hasher.update(&buffer[..read]);
        }

        let actual = hex::encode(hasher.finalize());
        Ok(actual == expected.as_str())
    }
}

async fn stream_body(
    response: &mut HttpResponse,
    staging: &Path,
    cancel: &CancellationToken,
) -> Result<()> {
    let mut output = fs::File::create(staging).await?;
    loop {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(UpdateError::Cancelled),
            chunk = response.chunk() => chunk?,
        };
        match chunk {
            Some(bytes) => output.write_all(&bytes).await?,
            None => break,
        }
    }
    output.flush().await?;
    Ok(())
}

fn staging_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    target.with_file_name(name)
}

fn file_name(url: &str) -> String {
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string),
        Err(_) => url.rsplit('/').next().map(str::to_string),
    };
    segment
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "installer".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // SHA-512 of b"hello cache".
    const HELLO_CACHE_SHA512: &str = "ee4a1670083b28670cd85812ab5edb7fdff7029f48bff03886ad2e5ed27ad9e642e6f8a31596056d04e63512273250d93fca0d59c62ed62e1e181440eb5ba140";

    struct CannedClient {
        status: u16,
        body: &'static str,
    }

    impl CannedClient {
        fn new(status: u16, body: &'static str) -> Self {
            CannedClient { status, body }
        }
    }

    impl HttpClient for CannedClient {
        async fn get(&self, _url: &str) -> crate::error::Result<HttpResponse> {
            Ok(HttpResponse::from_bytes(self.status, self.body))
        }
    }

    fn descriptor(url: &str, sha512: &str) -> FileDescriptor {
        FileDescriptor {
            url: url.to_string(),
            sha512: sha512.to_string(),
        }
    }

    #[test]
    fn test_local_path_uses_url_basename() {
        let cache = FileCache::new("/var/cache/updraft");
        let file = descriptor("https://downloads.example.com/app/app-2.0.0.run", "");

        assert_eq!(
            cache.local_path(&file),
            PathBuf::from("/var/cache/updraft/app-2.0.0.run")
        );
    }

    #[test]
    fn test_local_path_ignores_query_and_trailing_slash() {
        let cache = FileCache::new("/tmp/u");
        let file = descriptor("https://example.com/dir/app.run/?token=abc", "");

        assert_eq!(cache.local_path(&file), PathBuf::from("/tmp/u/app.run"));
    }

    #[tokio::test]
    async fn test_download_writes_file_and_creates_directory() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path().join("updates"));
        let client = CannedClient::new(200, "hello cache");
        let file = descriptor("https://example.com/app.run", HELLO_CACHE_SHA512);

        let path = cache
            .download(&client, &file, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"hello cache");
        assert!(cache.exists(&file));
    }

    #[tokio::test]
    async fn test_download_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path());
        let file = descriptor("https://example.com/app.run", "");
        std::fs::write(cache.local_path(&file), b"stale bytes").unwrap();

        let client = CannedClient::new(200, "hello cache");
        let path = cache
            .download(&client, &file, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"hello cache");
    }

    #[tokio::test]
    async fn test_download_failure_status_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path());
        let client = CannedClient::new(503, "service unavailable");
        let file = descriptor("https://example.com/app.run", "");

        let result = cache
            .download(&client, &file, &CancellationToken::new())
            .await;

        assert!(matches!(
            result,
            Err(UpdateError::ResponseUnsuccessful { status: 503 })
        ));
        assert!(!cache.exists(&file));
    }

    #[tokio::test]
    async fn test_cancelled_download_leaves_no_partial_file() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path());
        let client = CannedClient::new(200, "hello cache");
        let file = descriptor("https://example.com/app.run", "");

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = cache.download(&client, &file, &cancel).await;

        assert!(matches!(result, Err(UpdateError::Cancelled)));
        assert!(!cache.exists(&file));
        assert!(!staging_path(&cache.local_path(&file)).exists());
    }

    #[tokio::test]
    async fn test_validate_matches_digest_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path());
        let file = descriptor(
            "https://example.com/app.run",
            &format!("  {}  ", HELLO_CACHE_SHA512.to_uppercase()),
        );
        std::fs::write(cache.local_path(&file), b"hello cache").unwrap();

        assert!(cache.validate(&file).await.unwrap());
    }

    #[tokio::test]
    async fn test_validate_detects_corrupted_bytes() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path());
        let file = descriptor("https://example.com/app.run", HELLO_CACHE_SHA512);
        std::fs::write(cache.local_path(&file), b"tampered bytes").unwrap();

        assert!(!cache.validate(&file).await.unwrap());
    }

    #[tokio::test]
    async fn test_validate_missing_file_is_false() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path());
        let file = descriptor("https://example.com/app.run", HELLO_CACHE_SHA512);

        assert!(!cache.validate(&file).await.unwrap());
    }

    #[tokio::test]
    async fn test_validate_malformed_expected_digest_is_false() {
        let dir = TempDir::new().unwrap();
        let cache = FileCache::new(dir.path());
        let file = descriptor("https://example.com/app.run", "not-hex");
        std::fs::write(cache.local_path(&file), b"hello cache").unwrap();

        assert!(!cache.validate(&file).await.unwrap());
    }
}
