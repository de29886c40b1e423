//! Process-wide cache of validated lookup tables.
//!
//! Entries never expire. The only way to drop them is [`LookupTableCache::flush`],
//! which swaps in an empty map.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::LookupTable;

/// Table name → validated table.
///
/// Readers share the lock, so cache hits never wait on each other.
/// Tables are handed out as `Arc`, so a flush never invalidates a table
/// an in-flight resolution is already holding.
#[derive(Debug, Default)]
pub struct LookupTableCache {
    tables: RwLock<HashMap<String, Arc<LookupTable>>>,
}

impl LookupTableCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached table, if any.
    pub async fn get(&self, name: &str) -> Option<Arc<LookupTable>> {
        self.tables.read().await.get(name).cloned()
    }

    /// Inserts a table unless one is already cached under the same name.
    ///
    /// Returns the table that ends up cached, so concurrent loaders of
    /// the same name all resolve against one instance.
    pub async fn insert(&self, table: LookupTable) -> Arc<LookupTable> {
        let mut map = self.tables.write().await;
        Arc::clone(
            map.entry(table.name().to_string())
                .or_insert_with(|| Arc::new(table)),
        )
    }

    /// Drops every cached table. Returns how many were dropped.
    pub async fn flush(&self) -> usize {
        let mut map = self.tables.write().await;
        std::mem::take(&mut *map).len()
    }

    /// Number of cached tables.
    pub async fn len(&self) -> usize {
        self.tables.read().await.len()
    }

    /// Returns `true` if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.tables.read().await.is_empty()
    }
}
