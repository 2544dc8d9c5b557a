//! The immutable update state machine.
//!
//! Every transition returns a fresh value; the host keeps exactly one
//! "current" state and replaces it after each successful step. A failed
//! transition leaves the receiver untouched, so there is never partially
//! mutated state to observe.

use crate::cache::FileCache;
use crate::error::{Result, UpdateError};
use crate::feed::collection::ReleaseCollection;
use crate::feed::decoder::FeedDocument;
use crate::feed::release::{FileDescriptor, Release, Version};
use crate::feed::view::ReleaseView;
use crate::http::HttpClient;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Configuration for the update pipeline.
pub struct UpdateOptions {
    /// Resolves the feed URL; called once per [`UpdateState::latest`].
    pub feed_url: Box<dyn Fn() -> String + Send + Sync>,
    /// Directory installers are cached in.
    pub updates_path: PathBuf,
    /// Version of the running application.
    pub current_version: Version,
    /// Name of the category whose releases are early-access.
    pub early_access_category: String,
}

/// Shared collaborators for the update pipeline: the HTTP client, the feed
/// URL resolver, the installer cache, and the cancellation handle.
pub struct UpdateContext<C> {
    client: C,
    feed_url: Box<dyn Fn() -> String + Send + Sync>,
    cache: FileCache,
    current_version: Version,
    early_access_category: String,
    cancel: CancellationToken,
}

impl<C: std::fmt::Debug> std::fmt::Debug for UpdateContext<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateContext")
            .field("client", &self.client)
            .field("cache", &self.cache)
            .field("current_version", &self.current_version)
            .field("early_access_category", &self.early_access_category)
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl<C> UpdateContext<C> {
    pub fn new(client: C, options: UpdateOptions) -> Self {
        UpdateContext {
            client,
            feed_url: options.feed_url,
            cache: FileCache::new(options.updates_path),
            current_version: options.current_version,
            early_access_category: options.early_access_category,
            cancel: CancellationToken::new(),
        }
    }

    pub fn current_version(&self) -> Version {
        self.current_version
    }

    /// Cancel in-flight feed fetches and downloads. Cancelled operations
    /// fail with [`UpdateError::Cancelled`].
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

/// The installer recorded by a successful download or validation.
#[derive(Debug, Clone, PartialEq)]
struct CachedInstaller {
    file: FileDescriptor,
    path: PathBuf,
}

/// One immutable point in the update pipeline.
///
/// Constructed empty (`available` and `ready` both false), then advanced
/// with [`latest`](Self::latest), [`downloaded`](Self::downloaded) and
/// [`validated`](Self::validated).
#[derive(Debug)]
pub struct UpdateState<C> {
    context: Arc<UpdateContext<C>>,
    releases: ReleaseCollection,
    early_access: bool,
    view: ReleaseView,
    installer: Option<CachedInstaller>,
    validated: bool,
}

impl<C> Clone for UpdateState<C> {
    fn clone(&self) -> Self {
        UpdateState {
            context: Arc::clone(&self.context),
            releases: self.releases.clone(),
            early_access: self.early_access,
            view: self.view.clone(),
            installer: self.installer.clone(),
            validated: self.validated,
        }
    }
}

impl<C: HttpClient> UpdateState<C> {
    /// Empty state: no releases known yet.
    pub fn new(context: Arc<UpdateContext<C>>) -> Self {
        UpdateState {
            context,
            releases: ReleaseCollection::default(),
            early_access: false,
            view: ReleaseView::default(),
            installer: None,
            validated: false,
        }
    }

    /// Fetch the feed and project it. Always performs exactly one GET;
    /// any previously downloaded installer is forgotten.
    pub async fn latest(&self, early_access: bool) -> Result<Self> {
        let url = (self.context.feed_url)();
        debug!("fetching release feed from {url}");

        let response = tokio::select! {
            biased;
            _ = self.context.cancel.cancelled() => return Err(UpdateError::Cancelled),
            response = self.context.client.get(&url) => response?,
        };
        if !response.is_success() {
            return Err(UpdateError::ResponseUnsuccessful {
                status: response.status(),
            });
        }

        let body = tokio::select! {
            biased;
            _ = self.context.cancel.cancelled() => return Err(UpdateError::Cancelled),
            body = response.bytes() => body?,
        };

        let document = FeedDocument::decode(&body)?;
        let releases =
            ReleaseCollection::from_document(&document, &self.context.early_access_category)?;
        info!("release feed lists {} releases", releases.len());

        let view = ReleaseView::project(&releases, &self.context.current_version, early_access);
        Ok(UpdateState {
            context: Arc::clone(&self.context),
            releases,
            early_access,
            view,
            installer: None,
            validated: false,
        })
    }

    /// Re-project the already fetched releases under a new channel
    /// setting. Never performs I/O. If the re-projection changes which
    /// installer the state points at, the previously downloaded file no
    /// longer belongs to this state and both the path and the validation
    /// flag are dropped.
    pub fn cached_latest(&self, early_access: bool) -> Self {
        let view =
            ReleaseView::project(&self.releases, &self.context.current_version, early_access);

        let same_target = match (view.newest().and_then(Release::file), &self.installer) {
            (Some(file), Some(installer)) => *file == installer.file,
            (None, None) => true,
            _ => false,
        };

        let mut next = UpdateState {
            context: Arc::clone(&self.context),
            releases: self.releases.clone(),
            early_access,
            view,
            installer: self.installer.clone(),
            validated: self.validated,
        };
        if !same_target {
            next.installer = None;
            next.validated = false;
        }
        next
    }

    /// Stream the new release's installer into the cache.
    ///
    /// Without an available update this is a no-op and the HTTP client is
    /// never contacted. The download is skipped when the file is cached
    /// and this state already validated it against the same descriptor;
    /// otherwise fresh bytes are fetched and the validation flag clears.
    pub async fn downloaded(&self) -> Result<Self> {
        let Some(file) = self.new_file() else {
            debug!("no update available, nothing to download");
            return Ok(self.clone());
        };
        let file = file.clone();

        if self.validated
            && self
                .installer
                .as_ref()
                .is_some_and(|installer| installer.file == file)
            && self.context.cache.exists(&file)
        {
            debug!("installer already cached and validated, skipping download");
            return Ok(self.clone());
        }

        let path = self
            .context
            .cache
            .download(&self.context.client, &file, &self.context.cancel)
            .await?;
        info!("installer downloaded to {}", path.display());

        let mut next = self.clone();
        next.installer = Some(CachedInstaller { file, path });
        next.validated = false;
        Ok(next)
    }

    /// Recompute the cached installer's checksum against the new
    /// release's descriptor, regardless of any earlier validation.
    pub async fn validated(&self) -> Result<Self> {
        let mut next = self.clone();

        let Some(file) = self.new_file().cloned() else {
            next.validated = false;
            return Ok(next);
        };

        let matches = self.context.cache.validate(&file).await?;
        if !matches {
            info!("installer checksum mismatch for {}", file.url);
        }

        next.validated = matches;
        if matches && next.installer.is_none() {
            next.installer = Some(CachedInstaller {
                path: self.context.cache.local_path(&file),
                file,
            });
        }
        Ok(next)
    }

    /// Whether an installable release newer than the current version
    /// exists in the enabled channels.
    pub fn available(&self) -> bool {
        self.view.newest().is_some()
    }

    /// Whether the new release's installer is cached and checksum-valid.
    pub fn ready(&self) -> bool {
        self.available() && self.validated
    }

    /// Visible release history, newest first.
    pub fn release_history(&self) -> &[Release] {
        self.view.history()
    }

    /// The release an update would install, if any.
    pub fn new_release(&self) -> Option<&Release> {
        self.view.newest()
    }

    pub fn early_access(&self) -> bool {
        self.early_access
    }

    /// Local path of the downloaded installer, once one is recorded.
    pub fn installer_path(&self) -> Option<&Path> {
        self.installer.as_ref().map(|installer| installer.path.as_path())
    }

    fn new_file(&self) -> Option<&FileDescriptor> {
        self.view.newest().and_then(Release::file)
    }
}
