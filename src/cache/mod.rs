//! Content-Addressable Fetch Cache
//!
//! Disk-backed cache of fetched byte payloads (excerpt JSON, thumbnails),
//! keyed by a digest of the *source URL*, not of the content. Because the
//! key embeds the exact URL, entries never go stale and carry no expiry.
//! There is no eviction policy: the directory accumulates across runs.
//!
//! ## Fetch algorithm
//!
//! 1. digest = SHA-256 of the URL string, lowercase hex
//! 2. single-flight table hit → return a handle onto the in-progress fetch
//! 3. disk hit at `root/<digest>` → complete immediately, no network
//! 4. otherwise GET (redirects followed, fixed User-Agent), persist
//!    atomically (temp file, then rename), fan the bytes out to every
//!    waiting handle, drop the table entry
//!
//! Failures are fanned out as [`FetchError`] and leave no file behind, so
//! the next call for the same URL retries the network. The single-flight
//! table is the only shared mutable structure; its lock scope is the map
//! entry itself, never the network call.

pub mod channel;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use sha2::{Digest, Sha256};
use tracing::{debug, trace, warn};

use crate::constants::http;
use crate::types::{FetchError, Result, WikiLensError};

pub use channel::{ResultHandle, ResultSlot, result_channel};

/// Outcome of a cache-backed byte fetch, cloneable for fan-out.
pub type FetchOutcome = std::result::Result<Bytes, FetchError>;

/// Disk-backed, single-flight content cache.
///
/// Cheap to clone via `Arc`; one instance per cache root is the intended
/// shape. Must be used from within a tokio runtime (workers are spawned).
pub struct ContentCache {
    client: reqwest::Client,
    root: PathBuf,
    inflight: Arc<DashMap<String, ResultHandle<FetchOutcome>>>,
}

impl ContentCache {
    /// Create a cache rooted at `root`. The directory is created lazily at
    /// first persist, not here.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(http::USER_AGENT)
            .timeout(Duration::from_secs(http::TIMEOUT_SECS))
            .build()
            .map_err(|e| WikiLensError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            root: root.into(),
            inflight: Arc::new(DashMap::new()),
        })
    }

    /// Cache key for a URL: lowercase hex SHA-256 of the URL string.
    pub fn digest(url: &str) -> String {
        hex::encode(Sha256::digest(url.as_bytes()))
    }

    /// On-disk path a URL's payload would occupy.
    pub fn entry_path(&self, url: &str) -> PathBuf {
        self.root.join(Self::digest(url))
    }

    /// Fetch the bytes behind `url`, never blocking the caller.
    ///
    /// Concurrent calls for the same URL share one fetch: the first caller's
    /// worker wins, every later caller gets a handle onto the same outcome.
    pub fn fetch(&self, url: &str) -> ResultHandle<FetchOutcome> {
        let digest = Self::digest(url);

        match self.inflight.entry(digest.clone()) {
            Entry::Occupied(existing) => {
                trace!(%url, "joining in-flight fetch");
                existing.get().clone()
            }
            Entry::Vacant(vacant) => {
                let (slot, handle) = result_channel();
                vacant.insert(handle.clone());

                let client = self.client.clone();
                let root = self.root.clone();
                let inflight = Arc::clone(&self.inflight);
                let url = url.to_string();
                tokio::spawn(async move {
                    let outcome = fill(&client, &root, &digest, &url).await;
                    if let Err(error) = &outcome {
                        warn!(%url, %error, "fetch failed");
                    }
                    // Entry comes out before completion so a retry after a
                    // failure starts a fresh fetch instead of joining a
                    // finished one.
                    inflight.remove(&digest);
                    slot.complete(outcome);
                });

                handle
            }
        }
    }
}

/// Produce the payload for one digest: disk read-through, then network.
async fn fill(client: &reqwest::Client, root: &Path, digest: &str, url: &str) -> FetchOutcome {
    let path = root.join(digest);

    match tokio::fs::read(&path).await {
        Ok(data) => {
            trace!(%url, %digest, "disk cache hit");
            return Ok(Bytes::from(data));
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(FetchError::Disk(format!("{}: {e}", path.display()))),
    }

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    persist(root, &path, &body)
        .await
        .map_err(|e| FetchError::Disk(e.to_string()))?;

    debug!(%url, %digest, bytes = body.len(), "fetched and cached");
    Ok(body)
}

/// Write the payload atomically: temp file in the same directory, then
/// rename. A concurrent reader never observes a partial entry.
async fn persist(root: &Path, path: &Path, body: &Bytes) -> std::io::Result<()> {
    tokio::fs::create_dir_all(root).await?;

    let tmp = path.with_extension(format!("tmp.{}", std::process::id()));
    tokio::fs::write(&tmp, body).await?;
    match tokio::fs::rename(&tmp, path).await {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = tokio::fs::remove_file(&tmp).await;
            Err(e)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
