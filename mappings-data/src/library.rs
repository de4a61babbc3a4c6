//! The dataset library seam.
//!
//! Indexing and matching of mappings live behind [`MappingsLibrary`]; the bot
//! only resolves which dataset to ask and presents what comes back.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;

use crate::namespace::{Channel, NamespaceId, QueryKind};

/// Opaque, namespace scoped key of one dataset snapshot.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[serde(transparent)]
pub struct VersionId(String);

impl VersionId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VersionId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Metadata of a materialized dataset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DatasetMeta {
    pub namespace: NamespaceId,
    /// Name shown in result titles (`Yarn`).
    pub name: String,
    pub version: VersionId,
}

/// One matched identifier rendered in compact and detailed form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResultEntry {
    pub short: String,
    pub long: String,
}

impl ResultEntry {
    pub fn new(short: impl Into<String>, long: impl Into<String>) -> Self {
        Self {
            short: short.into(),
            long: long.into(),
        }
    }
}

/// External dataset library.
///
/// Implementations own their caching and locking; every method may suspend on
/// disk or network I/O.
#[async_trait]
pub trait MappingsLibrary: Send + Sync {
    /// All known versions of a namespace, in release order.
    async fn all_versions(&self, namespace: NamespaceId) -> anyhow::Result<Vec<VersionId>>;

    /// Materialize a dataset; `None` when the version cannot be loaded.
    async fn dataset(
        &self,
        namespace: NamespaceId,
        version: &VersionId,
    ) -> anyhow::Result<Option<DatasetMeta>>;

    /// Current default version for a channel (`None` channel: namespace default).
    async fn default_version(
        &self,
        namespace: NamespaceId,
        channel: Option<Channel>,
    ) -> anyhow::Result<Option<VersionId>>;

    /// Search a dataset; result order is the library's and is kept as-is.
    async fn query(
        &self,
        kind: QueryKind,
        dataset: &DatasetMeta,
        key: &str,
    ) -> anyhow::Result<Vec<ResultEntry>>;
}
