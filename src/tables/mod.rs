//! Lookup table layer: parsing, sources, cache, and mode resolution.
//!
//! [`ModeResolver`] answers "which mode applies at this frequency" by
//! consulting the process-wide [`LookupTableCache`] and falling back to
//! a [`LookupTableSource`] on a miss. Every outcome of the table layer
//! is one of the explicit [`TableError`] kinds.

pub mod cache;
pub mod lookup_table;
pub mod resolver;
pub mod source;

pub use cache::LookupTableCache;
pub use lookup_table::{FrequencyRange, LookupTable};
pub use resolver::ModeResolver;
pub use source::{LocalTableSource, LookupTableSource, RemoteTableSource};

/// Failure kinds of the table layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// The named table does not exist in the source.
    #[error("lookup table '{0}' does not exist")]
    NotFound(String),

    /// The table exists but its content is structurally invalid.
    #[error("lookup table '{table}' is invalid: {reason}")]
    Invalid {
        /// Table name.
        table: String,
        /// Which rule was violated.
        reason: String,
    },

    /// Reading the table failed for a reason other than absence.
    #[error("failed to fetch lookup table '{table}': {reason}")]
    FetchFailed {
        /// Table name.
        table: String,
        /// Failure description.
        reason: String,
    },
}

impl TableError {
    pub(crate) fn invalid(table: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            table: table.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn fetch_failed(table: &str, reason: impl Into<String>) -> Self {
        Self::FetchFailed {
            table: table.to_string(),
            reason: reason.into(),
        }
    }
}
