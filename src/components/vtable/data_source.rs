//! DataSource Trait
//!
//! Abstraction for the sequence a render window displays: a length and
//! per-index retrieval, both asynchronous. A data source is immutable for its
//! lifetime; showing other data means constructing a new instance.

use std::marker::PhantomData;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{self, BoxFuture};

use crate::error::Result;

/// Trait for providing data to a render window
pub trait DataSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    /// Number of items; stable for the lifetime of the instance
    fn length(&self) -> BoxFuture<'_, Result<usize>>;

    /// Item at `index`, or `None` when out of bounds or not yet available
    ///
    /// Must be idempotent: the engine re-requests indices after an
    /// abandoned pass.
    fn item(&self, index: usize) -> BoxFuture<'_, Result<Option<Self::Item>>>;

    /// Base URI for resolving icon identifiers, when backed by a service
    fn icon_base(&self) -> Option<String> {
        None
    }
}

/// Shared handle to a type-erased data source
pub type SharedDataSource<T> = Arc<dyn DataSource<Item = T>>;

/// Data source with no items; the placeholder before a real source is attached
pub struct EmptyDataSource<T> {
    _item: PhantomData<fn() -> T>,
}

impl<T: Clone + Send + Sync + 'static> EmptyDataSource<T> {
    pub fn new() -> Self {
        Self { _item: PhantomData }
    }

    /// Create a shared empty source
    pub fn shared() -> SharedDataSource<T> {
        Arc::new(Self::new())
    }
}

impl<T: Clone + Send + Sync + 'static> Default for EmptyDataSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> DataSource for EmptyDataSource<T> {
    type Item = T;

    fn length(&self) -> BoxFuture<'_, Result<usize>> {
        future::ready(Ok(0)).boxed()
    }

    fn item(&self, _index: usize) -> BoxFuture<'_, Result<Option<T>>> {
        future::ready(Ok(None)).boxed()
    }
}

/// Simple in-memory data source over a fixed ordered sequence
pub struct ArrayDataSource<T> {
    items: Arc<Vec<T>>,
}

impl<T: Clone + Send + Sync + 'static> ArrayDataSource<T> {
    /// Create a new ArrayDataSource
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }

    /// Create from a shared reference
    pub fn from_arc(items: Arc<Vec<T>>) -> Self {
        Self { items }
    }

    /// Get all items
    pub fn all(&self) -> &[T] {
        &self.items
    }
}

impl<T: Clone + Send + Sync + 'static> DataSource for ArrayDataSource<T> {
    type Item = T;

    fn length(&self) -> BoxFuture<'_, Result<usize>> {
        future::ready(Ok(self.items.len())).boxed()
    }

    fn item(&self, index: usize) -> BoxFuture<'_, Result<Option<T>>> {
        future::ready(Ok(self.items.get(index).cloned())).boxed()
    }
}

/// Data source computing each item from its index
///
/// Lets very long sequences be displayed without materializing them.
pub struct GeneratedDataSource<T, F> {
    length: usize,
    generate: F,
    _item: PhantomData<fn() -> T>,
}

impl<T, F> GeneratedDataSource<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(usize) -> T + Send + Sync + 'static,
{
    pub fn new(length: usize, generate: F) -> Self {
        Self {
            length,
            generate,
            _item: PhantomData,
        }
    }
}

impl<T, F> DataSource for GeneratedDataSource<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: Fn(usize) -> T + Send + Sync + 'static,
{
    type Item = T;

    fn length(&self) -> BoxFuture<'_, Result<usize>> {
        future::ready(Ok(self.length)).boxed()
    }

    fn item(&self, index: usize) -> BoxFuture<'_, Result<Option<T>>> {
        let item = (index < self.length).then(|| (self.generate)(index));
        future::ready(Ok(item)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_source() {
        let source = EmptyDataSource::<String>::shared();
        assert_eq!(source.length().await.expect("length"), 0);
        assert_eq!(source.item(0).await.expect("item"), None);
    }

    #[tokio::test]
    async fn test_array_source() {
        let source = ArrayDataSource::new(vec!["a", "b"]);
        assert_eq!(source.length().await.expect("length"), 2);
        assert_eq!(source.item(1).await.expect("item"), Some("b"));
        assert_eq!(source.item(2).await.expect("item"), None);
        assert_eq!(source.all(), &["a", "b"]);
    }

    #[tokio::test]
    async fn test_generated_source() {
        let source = GeneratedDataSource::new(400_000, |i| format!("index{i}"));
        assert_eq!(source.length().await.expect("length"), 400_000);
        assert_eq!(
            source.item(399_999).await.expect("item").as_deref(),
            Some("index399999")
        );
        assert_eq!(source.item(400_000).await.expect("item"), None);
    }
}
