//! RemoteDataSource - Directory Listing Backed by the Service
//!
//! Issues exactly one listing request at construction and memoizes its
//! outcome; every accessor awaits the same shared result.

use std::cmp::Ordering;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::domain::file_info::{FileInfo, ListRequest, ListResponse, ReadRequest};
use crate::error::{Error, Result};
use crate::services::{Backend, spawn_eager};

use super::data_source::DataSource;

type SharedListing = Shared<BoxFuture<'static, std::result::Result<Arc<ListResponse>, Arc<Error>>>>;

/// Data source over one directory listing
#[derive(Clone)]
pub struct RemoteDataSource {
    backend: Arc<dyn Backend>,
    request: ListRequest,
    listing: SharedListing,
}

impl RemoteDataSource {
    /// Create the source and start fetching immediately
    pub fn new(backend: Arc<dyn Backend>, request: ListRequest) -> Self {
        let fetch_backend = Arc::clone(&backend);
        let fetch_request = request.clone();
        let handle = spawn_eager(async move {
            match fetch_backend.list(fetch_request.clone()).await {
                Ok(mut listing) => {
                    sort_files(&mut listing.files);
                    tracing::debug!(
                        path = %listing.path,
                        files = listing.files.len(),
                        "Listing received"
                    );
                    Ok(listing)
                }
                Err(e) => {
                    tracing::warn!(request = ?fetch_request, "Listing failed: {}", e);
                    Err(e)
                }
            }
        });

        let listing = async move {
            match handle.await {
                Ok(Ok(listing)) => Ok(Arc::new(listing)),
                Ok(Err(e)) => Err(Arc::new(e)),
                Err(e) => Err(Arc::new(Error::Task {
                    message: e.to_string(),
                })),
            }
        }
        .boxed()
        .shared();

        Self {
            backend,
            request,
            listing,
        }
    }

    /// The request this source was created for
    pub fn request(&self) -> &ListRequest {
        &self.request
    }

    /// The memoized listing
    pub async fn listing(&self) -> Result<Arc<ListResponse>> {
        self.listing
            .clone()
            .await
            .map_err(|source| Error::Listing { source })
    }

    /// Normalized path of the listed directory
    pub async fn path(&self) -> Result<String> {
        Ok(self.listing().await?.path.clone())
    }

    /// Display name of the listed directory
    pub async fn name(&self) -> Result<String> {
        Ok(self.listing().await?.name.clone())
    }

    /// Index of the first entry the service marked active
    pub async fn active_index(&self) -> Result<Option<usize>> {
        Ok(self.listing().await?.files.iter().position(|f| f.is_active))
    }

    /// Read one record's raw content; never memoized
    pub async fn read(&self, request: ReadRequest) -> Result<Vec<u8>> {
        self.backend.read(request).await
    }
}

impl DataSource for RemoteDataSource {
    type Item = FileInfo;

    fn length(&self) -> BoxFuture<'_, Result<usize>> {
        async move { Ok(self.listing().await?.files.len()) }.boxed()
    }

    fn item(&self, index: usize) -> BoxFuture<'_, Result<Option<FileInfo>>> {
        async move { Ok(self.listing().await?.files.get(index).cloned()) }.boxed()
    }

    fn icon_base(&self) -> Option<String> {
        Some(self.backend.base_uri())
    }
}

/// Display order: directories first, then name, extension and key
pub fn sort_files(files: &mut [FileInfo]) {
    files.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| compare_text(&a.name, &b.name))
            .then_with(|| compare_text(&a.extension, &b.extension))
            .then_with(|| compare_text(&a.key, &b.key))
    });
}

/// Collation-like order: base letters first, then accents, then case
/// (lowercase before uppercase)
fn compare_text(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| folded(a).cmp(folded(b)))
        .then_with(|| b.cmp(a))
}

/// Lowercased, decomposed characters
fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().flat_map(char::to_lowercase)
}

/// Lowercased characters with accents stripped
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    folded(s).filter(|&c| !is_combining_mark(c))
}
