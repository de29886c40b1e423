//! Frequency → mode resolution on top of the table cache.

use std::sync::Arc;

use super::{LookupTableCache, LookupTableSource, TableError};

/// Resolves a frequency to a mode using a named lookup table.
///
/// The cache is passed in explicitly so that every component sharing it
/// (resolver, admin flush) sees the same process-wide state.
#[derive(Debug)]
pub struct ModeResolver {
    cache: Arc<LookupTableCache>,
    source: LookupTableSource,
}

impl ModeResolver {
    /// Creates a resolver over `cache`, loading misses from `source`.
    #[must_use]
    pub fn new(cache: Arc<LookupTableCache>, source: LookupTableSource) -> Self {
        Self { cache, source }
    }

    /// Returns the shared cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<LookupTableCache> {
        &self.cache
    }

    /// Resolves `frequency` against table `table_name`.
    ///
    /// `Ok(None)` means the table is fine but no range covers the
    /// frequency. Only validated tables are ever cached.
    ///
    /// # Errors
    ///
    /// Propagates the [`TableError`] of a cache-miss load.
    pub async fn resolve(
        &self,
        table_name: &str,
        frequency: u64,
    ) -> Result<Option<String>, TableError> {
        let table = match self.cache.get(table_name).await {
            Some(table) => table,
            None => {
                let loaded = self.source.load(table_name).await?;
                tracing::info!(
                    table = table_name,
                    ranges = loaded.ranges().len(),
                    "lookup table cached"
                );
                self.cache.insert(loaded).await
            }
        };

        let mode = table.mode_for(frequency).map(str::to_string);
        tracing::debug!(table = table_name, frequency, mode = ?mode, "mode resolved");
        Ok(mode)
    }

    /// Clears the cache. Returns how many tables were dropped.
    pub async fn flush(&self) -> usize {
        self.cache.flush().await
    }
}
