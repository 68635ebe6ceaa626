//! Icon Cache
//!
//! Bounded map from icon URL to a resolved icon. On overflow the entry
//! inserted first is evicted; reads do not refresh an entry's position.

use std::sync::Arc;

use ahash::RandomState;
use futures::future::BoxFuture;
use hashlink::LinkedHashMap;
use parking_lot::Mutex;

use crate::constants::ICON_CACHE_CAPACITY;
use crate::domain::icon::IconResource;
use crate::error::Result;
use crate::services::Backend;

/// Icon cache shared by every render window
pub type SharedIconCache = Arc<Mutex<IconCache>>;

/// Bounded icon cache with insertion-order eviction
#[derive(Debug)]
pub struct IconCache {
    cap: usize,
    entries: LinkedHashMap<String, IconResource, RandomState>,
}

impl IconCache {
    /// Create a cache holding at most `cap` icons
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            entries: LinkedHashMap::with_hasher(RandomState::new()),
        }
    }

    /// Create a shared cache
    pub fn shared(cap: usize) -> SharedIconCache {
        Arc::new(Mutex::new(Self::new(cap)))
    }

    /// Store an icon; returns the evicted URL, if any
    ///
    /// Replacing an existing URL keeps its original position.
    pub fn insert(&mut self, url: impl Into<String>, icon: IconResource) -> Option<String> {
        let url = url.into();
        if let Some(existing) = self.entries.get_mut(&url) {
            *existing = icon;
            return None;
        }
        self.entries.insert(url, icon);
        if self.entries.len() > self.cap {
            return self.entries.pop_front().map(|(evicted, _)| evicted);
        }
        None
    }

    pub fn get(&self, url: &str) -> Option<&IconResource> {
        self.entries.get(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }
}

impl Default for IconCache {
    fn default() -> Self {
        Self::new(ICON_CACHE_CAPACITY)
    }
}

/// Resolves icon URLs to images
pub trait IconLoader: Send + Sync + 'static {
    fn load(&self, url: String) -> BoxFuture<'_, Result<IconResource>>;
}

/// Loads icons from the backing service
pub struct BackendIconLoader {
    backend: Arc<dyn Backend>,
}

impl BackendIconLoader {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}

impl IconLoader for BackendIconLoader {
    fn load(&self, url: String) -> BoxFuture<'_, Result<IconResource>> {
        self.backend.fetch_icon(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::icon::IconFormat;

    fn icon(byte: u8) -> IconResource {
        IconResource::new(IconFormat::Png, vec![byte])
    }

    #[test]
    fn test_eviction_keeps_capacity() {
        let mut cache = IconCache::default();
        for i in 0..ICON_CACHE_CAPACITY {
            assert_eq!(cache.insert(format!("http://x/icons/{i}"), icon(0)), None);
        }
        let evicted = cache.insert("http://x/icons/last", icon(1));

        assert_eq!(cache.len(), ICON_CACHE_CAPACITY);
        assert_eq!(evicted.as_deref(), Some("http://x/icons/0"));
        assert!(!cache.contains("http://x/icons/0"));
        assert!(cache.contains("http://x/icons/1"));
        assert!(cache.contains("http://x/icons/last"));
    }

    #[test]
    fn test_reads_do_not_change_eviction_order() {
        let mut cache = IconCache::new(2);
        cache.insert("a", icon(0));
        cache.insert("b", icon(0));
        assert!(cache.get("a").is_some());
        assert_eq!(cache.insert("c", icon(0)).as_deref(), Some("a"));
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut cache = IconCache::new(2);
        cache.insert("a", icon(0));
        cache.insert("b", icon(0));
        assert_eq!(cache.insert("a", icon(9)), None);
        assert_eq!(cache.get("a"), Some(&icon(9)));
        assert_eq!(cache.insert("c", icon(0)).as_deref(), Some("a"));
    }

    #[test]
    fn test_zero_capacity() {
        let mut cache = IconCache::new(0);
        assert_eq!(cache.insert("a", icon(0)).as_deref(), Some("a"));
        assert!(cache.is_empty());
    }
}
