//! Mappings library serving pre-rendered datasets from a JSON snapshot.
//!
//! The snapshot can be swapped at runtime, so default versions move forward
//! while the bot keeps running.

use std::{collections::HashMap, path::Path};

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::library::{DatasetMeta, MappingsLibrary, ResultEntry, VersionId};
use crate::namespace::{Channel, NamespaceId, QueryKind};

/// Top-level snapshot document, keyed by namespace id.
#[derive(Debug, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub namespaces: HashMap<String, NamespaceSnapshot>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NamespaceSnapshot {
    /// Display name override used in result titles.
    #[serde(default)]
    pub name: Option<String>,
    /// Known versions in release order.
    #[serde(default)]
    pub versions: Vec<VersionId>,
    /// Default version when no channel applies.
    #[serde(default)]
    pub default: Option<VersionId>,
    /// Default version per channel name.
    #[serde(default)]
    pub channels: HashMap<String, VersionId>,
    /// Materialized datasets; a listed version without one cannot be queried.
    #[serde(default)]
    pub datasets: HashMap<VersionId, DatasetSnapshot>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DatasetSnapshot {
    #[serde(default)]
    pub classes: Vec<EntrySnapshot>,
    #[serde(default)]
    pub fields: Vec<EntrySnapshot>,
    #[serde(default)]
    pub methods: Vec<EntrySnapshot>,
}

impl DatasetSnapshot {
    fn entries(&self, kind: QueryKind) -> &[EntrySnapshot] {
        match kind {
            QueryKind::Class => &self.classes,
            QueryKind::Field => &self.fields,
            QueryKind::Method => &self.methods,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EntrySnapshot {
    /// Searchable identifier path (`net/minecraft/block/Block`).
    pub key: String,
    pub short: String,
    /// Detailed rendering; the short form is reused when absent.
    #[serde(default)]
    pub long: Option<String>,
}

/// [`MappingsLibrary`] backed by an in-memory [`Snapshot`].
#[derive(Debug, Default)]
pub struct SnapshotLibrary {
    snapshot: RwLock<Snapshot>,
}

impl SnapshotLibrary {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }

    /// Parse a snapshot from JSON text.
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }

    /// Read and parse a snapshot file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let library = Self::from_json(&raw)?;
        info!(path = %path.display(), "mappings snapshot loaded");
        Ok(library)
    }

    /// Swap in a refreshed snapshot.
    pub async fn replace(&self, snapshot: Snapshot) {
        *self.snapshot.write().await = snapshot;
    }
}

#[async_trait]
impl MappingsLibrary for SnapshotLibrary {
    async fn all_versions(&self, namespace: NamespaceId) -> anyhow::Result<Vec<VersionId>> {
        let snapshot = self.snapshot.read().await;
        Ok(snapshot
            .namespaces
            .get(namespace.as_str())
            .map(|entry| entry.versions.clone())
            .unwrap_or_default())
    }

    async fn dataset(
        &self,
        namespace: NamespaceId,
        version: &VersionId,
    ) -> anyhow::Result<Option<DatasetMeta>> {
        let snapshot = self.snapshot.read().await;
        let Some(entry) = snapshot.namespaces.get(namespace.as_str()) else {
            return Ok(None);
        };

        if !entry.versions.contains(version) || !entry.datasets.contains_key(version) {
            return Ok(None);
        }

        Ok(Some(DatasetMeta {
            namespace,
            name: entry
                .name
                .clone()
                .unwrap_or_else(|| namespace.namespace().display_name.to_owned()),
            version: version.clone(),
        }))
    }

    async fn default_version(
        &self,
        namespace: NamespaceId,
        channel: Option<Channel>,
    ) -> anyhow::Result<Option<VersionId>> {
        let snapshot = self.snapshot.read().await;
        let Some(entry) = snapshot.namespaces.get(namespace.as_str()) else {
            return Ok(None);
        };

        Ok(match channel {
            Some(channel) => entry.channels.get(channel.as_str()).cloned(),
            None => entry.default.clone(),
        })
    }

    async fn query(
        &self,
        kind: QueryKind,
        dataset: &DatasetMeta,
        key: &str,
    ) -> anyhow::Result<Vec<ResultEntry>> {
        let snapshot = self.snapshot.read().await;
        let Some(data) = snapshot
            .namespaces
            .get(dataset.namespace.as_str())
            .and_then(|entry| entry.datasets.get(&dataset.version))
        else {
            anyhow::bail!(
                "{} {} is no longer available",
                dataset.name,
                dataset.version
            );
        };

        let needle = key.to_lowercase();
        Ok(data
            .entries(kind)
            .iter()
            .filter(|entry| entry.key.to_lowercase().contains(&needle))
            .map(|entry| {
                ResultEntry::new(
                    entry.short.clone(),
                    entry.long.clone().unwrap_or_else(|| entry.short.clone()),
                )
            })
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io::Write;

    use super::*;

    pub(crate) const YARN_SNAPSHOT: &str = r#"{
        "namespaces": {
            "yarn": {
                "versions": ["1.16.4", "1.16.5", "21w03a", "21w05a"],
                "default": "1.16.5",
                "channels": { "official": "1.16.5", "snapshot": "21w03a" },
                "datasets": {
                    "1.16.5": {
                        "classes": [
                            { "key": "net/minecraft/block/Block", "short": "Block", "long": "Block (class_2248)" },
                            { "key": "net/minecraft/block/BlockState", "short": "BlockState" }
                        ]
                    },
                    "21w03a": { "classes": [] },
                    "21w05a": { "classes": [] }
                }
            },
            "mcp": {
                "versions": ["1.12.2"],
                "default": "1.12.2",
                "datasets": { "1.12.2": {} }
            }
        }
    }"#;

    fn library() -> SnapshotLibrary {
        SnapshotLibrary::from_json(YARN_SNAPSHOT).unwrap()
    }

    #[tokio::test]
    async fn versions_keep_release_order() {
        let versions = library().all_versions(NamespaceId::Yarn).await.unwrap();
        let raw: Vec<&str> = versions.iter().map(VersionId::as_str).collect();
        assert_eq!(raw, ["1.16.4", "1.16.5", "21w03a", "21w05a"]);
        assert!(library().all_versions(NamespaceId::Plasma).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn listed_version_without_dataset_is_not_materialized() {
        let library = library();
        let missing = library
            .dataset(NamespaceId::Yarn, &VersionId::from("1.16.4"))
            .await
            .unwrap();
        assert!(missing.is_none());

        let present = library
            .dataset(NamespaceId::Yarn, &VersionId::from("1.16.5"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(present.name, "Yarn");
    }

    #[tokio::test]
    async fn defaults_per_channel() {
        let library = library();
        let snapshot = library
            .default_version(NamespaceId::Yarn, Some(Channel::Snapshot))
            .await
            .unwrap();
        assert_eq!(snapshot, Some(VersionId::from("21w03a")));
        let patchwork = library
            .default_version(NamespaceId::Yarn, Some(Channel::Patchwork))
            .await
            .unwrap();
        assert_eq!(patchwork, None);
    }

    #[tokio::test]
    async fn query_matches_case_insensitively_in_order() {
        let library = library();
        let dataset = library
            .dataset(NamespaceId::Yarn, &VersionId::from("1.16.5"))
            .await
            .unwrap()
            .unwrap();
        let results = library
            .query(QueryKind::Class, &dataset, "BLOCK")
            .await
            .unwrap();
        assert_eq!(
            results,
            vec![
                ResultEntry::new("Block", "Block (class_2248)"),
                ResultEntry::new("BlockState", "BlockState"),
            ]
        );
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(YARN_SNAPSHOT.as_bytes()).unwrap();
        assert!(SnapshotLibrary::load(file.path()).is_ok());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(SnapshotLibrary::from_json("{ not json").is_err());
    }
}
