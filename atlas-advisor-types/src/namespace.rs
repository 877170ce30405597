//! Splitting `database.collection` namespaces.

use std::error::Error;
use std::fmt;

/// A namespace split into its database and collection parts.
///
/// The database is the first `.`-separated segment and the collection the
/// second; any further segments are ignored (`app.system.views` is database
/// `app`, collection `system`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace<'a> {
    /// Database name.
    pub database: &'a str,
    /// Collection name.
    pub collection: &'a str,
}

impl<'a> Namespace<'a> {
    /// Split a raw namespace string.
    ///
    /// Fails when there are fewer than two segments or when either of the
    /// first two is empty.
    pub fn parse(raw: &'a str) -> Result<Self, NamespaceError> {
        let mut segments = raw.split('.');
        let database = segments.next().unwrap_or_default();
        let collection = segments.next().unwrap_or_default();
        if database.is_empty() || collection.is_empty() {
            return Err(NamespaceError {
                namespace: raw.to_string(),
            });
        }
        Ok(Self {
            database,
            collection,
        })
    }
}

impl fmt::Display for Namespace<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

/// A namespace that does not have the `database.collection` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceError {
    /// The namespace as received.
    pub namespace: String,
}

impl fmt::Display for NamespaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "namespace '{}' is not of the form database.collection",
            self.namespace
        )
    }
}

impl Error for NamespaceError {}
