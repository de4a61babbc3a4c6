//! Per-invocation dataset handles.
//!
//! A [`Provider`] is either bound to an explicit version or empty. An empty
//! provider defers to a [`DefaultResolver`] that runs on first use, so the
//! default tracks whatever the library considers current at query time.

use tracing::debug;

use crate::error::MappingsError;
use crate::library::{DatasetMeta, MappingsLibrary, VersionId};
use crate::namespace::{Channel, Namespace, NamespaceId};

/// Looks up "the current default version" of one namespace channel.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DefaultResolver {
    pub namespace: NamespaceId,
    /// `None` for namespaces without channels.
    pub channel: Option<Channel>,
}

impl DefaultResolver {
    pub fn new(namespace: NamespaceId, channel: Option<Channel>) -> Self {
        Self { namespace, channel }
    }

    /// Ask the library for the default and materialize it.
    ///
    /// `Ok(None)` means this resolver cannot produce a usable dataset.
    async fn resolve(
        &self,
        library: &dyn MappingsLibrary,
    ) -> Result<Option<DatasetMeta>, MappingsError> {
        let Some(version) = library
            .default_version(self.namespace, self.channel)
            .await?
        else {
            return Ok(None);
        };

        Ok(library.dataset(self.namespace, &version).await?)
    }
}

/// Default version of an empty provider: pending until first use, then fixed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DefaultVersion {
    Pending(DefaultResolver),
    Resolved(DatasetMeta),
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Binding {
    Bound(DatasetMeta),
    Empty(DefaultVersion),
}

/// Handle to one (namespace, version) dataset, resolved lazily when empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Provider {
    namespace: NamespaceId,
    binding: Binding,
    fallback: Option<DefaultResolver>,
}

impl Provider {
    /// A provider fixed to an already materialized dataset.
    pub fn bound(dataset: DatasetMeta) -> Self {
        Self {
            namespace: dataset.namespace,
            binding: Binding::Bound(dataset),
            fallback: None,
        }
    }

    /// A provider whose version is chosen by `resolver` on first use.
    pub fn empty(resolver: DefaultResolver) -> Self {
        Self {
            namespace: resolver.namespace,
            binding: Binding::Empty(DefaultVersion::Pending(resolver)),
            fallback: None,
        }
    }

    pub fn namespace(&self) -> NamespaceId {
        self.namespace
    }

    /// Attach the resolver consulted when the pending default yields nothing.
    ///
    /// Has no effect on bound or already resolved providers.
    pub fn inject_default(&mut self, fallback: DefaultResolver) {
        self.fallback = Some(fallback);
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.binding, Binding::Bound(_))
    }

    /// The default state of an empty provider; `None` once bound.
    pub fn default_version(&self) -> Option<&DefaultVersion> {
        match &self.binding {
            Binding::Bound(_) => None,
            Binding::Empty(state) => Some(state),
        }
    }

    /// The dataset this provider points at, resolving the default at most once.
    pub async fn dataset(
        &mut self,
        library: &dyn MappingsLibrary,
    ) -> Result<DatasetMeta, MappingsError> {
        let resolver = match &self.binding {
            Binding::Bound(dataset) | Binding::Empty(DefaultVersion::Resolved(dataset)) => {
                return Ok(dataset.clone());
            }
            Binding::Empty(DefaultVersion::Pending(resolver)) => *resolver,
        };

        let mut resolved = resolver.resolve(library).await?;
        if resolved.is_none()
            && let Some(fallback) = self.fallback.filter(|fallback| *fallback != resolver)
        {
            debug!(
                namespace = %self.namespace,
                channel = ?resolver.channel,
                "default version unavailable, using fallback"
            );
            resolved = fallback.resolve(library).await?;
        }

        let Some(dataset) = resolved else {
            return Err(MappingsError::NoDefaultVersion {
                namespace: self.namespace,
            });
        };

        self.binding = Binding::Empty(DefaultVersion::Resolved(dataset.clone()));
        Ok(dataset)
    }
}

/// Turn an optional version and channel into a provider.
///
/// An explicit version wins and must be known to the library; otherwise the
/// provider stays empty and resolves the channel's (or the namespace's
/// default channel's) current default when first used. A fallback for the
/// namespace default channel is always injected.
pub async fn resolve_provider(
    library: &dyn MappingsLibrary,
    namespace: &Namespace,
    version: Option<&str>,
    channel: Option<Channel>,
    default_channel: Option<Channel>,
) -> Result<Provider, MappingsError> {
    let mut provider = match (version, channel) {
        (Some(raw), _) => Provider::bound(bind_version(library, namespace.key, raw).await?),
        (None, Some(channel)) => Provider::empty(DefaultResolver::new(namespace.key, Some(channel))),
        (None, None) => Provider::empty(DefaultResolver::new(namespace.key, default_channel)),
    };

    provider.inject_default(DefaultResolver::new(namespace.key, default_channel));

    Ok(provider)
}

async fn bind_version(
    library: &dyn MappingsLibrary,
    namespace: NamespaceId,
    raw: &str,
) -> Result<DatasetMeta, MappingsError> {
    let version = VersionId::new(raw.trim());
    let unresolved = || MappingsError::UnresolvedVersion {
        namespace,
        version: raw.trim().to_owned(),
    };

    if !library.all_versions(namespace).await?.contains(&version) {
        return Err(unresolved());
    }

    // Known but not materialized versions are reported, never created here.
    library
        .dataset(namespace, &version)
        .await?
        .ok_or_else(unresolved)
}

#[cfg(test)]
mod tests {
    use crate::snapshot::{Snapshot, SnapshotLibrary, tests::YARN_SNAPSHOT};

    use super::*;

    fn library() -> SnapshotLibrary {
        SnapshotLibrary::from_json(YARN_SNAPSHOT).unwrap()
    }

    fn yarn() -> &'static Namespace {
        NamespaceId::Yarn.namespace()
    }

    #[tokio::test]
    async fn explicit_versions_bind_exactly() {
        let library = library();
        for version in ["1.16.5", "21w03a", "21w05a"] {
            let mut provider = resolve_provider(&library, yarn(), Some(version), None, None)
                .await
                .unwrap();
            assert!(provider.is_bound());
            let dataset = provider.dataset(&library).await.unwrap();
            assert_eq!(dataset.version.as_str(), version);
        }
    }

    #[tokio::test]
    async fn explicit_version_beats_channel() {
        let library = library();
        let mut provider = resolve_provider(
            &library,
            yarn(),
            Some("21w05a"),
            Some(Channel::Snapshot),
            Some(Channel::Official),
        )
        .await
        .unwrap();
        assert_eq!(provider.dataset(&library).await.unwrap().version.as_str(), "21w05a");
    }

    #[tokio::test]
    async fn unknown_version_is_unresolved() {
        let err = resolve_provider(&library(), yarn(), Some("9.9.9"), None, None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid yarn version: `9.9.9`");
    }

    #[tokio::test]
    async fn known_but_unmaterialized_version_is_unresolved() {
        let err = resolve_provider(&library(), yarn(), Some("1.16.4"), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, MappingsError::UnresolvedVersion { .. }));
    }

    #[tokio::test]
    async fn no_arguments_use_default_channel() {
        let library = library();
        let mut provider =
            resolve_provider(&library, yarn(), None, None, Some(Channel::Official))
                .await
                .unwrap();
        assert_eq!(
            provider.default_version(),
            Some(&DefaultVersion::Pending(DefaultResolver::new(
                NamespaceId::Yarn,
                Some(Channel::Official)
            )))
        );
        assert_eq!(provider.dataset(&library).await.unwrap().version.as_str(), "1.16.5");
    }

    #[tokio::test]
    async fn snapshot_channel_resolves_at_first_use() {
        let library = library();
        let mut provider = resolve_provider(
            &library,
            yarn(),
            None,
            Some(Channel::Snapshot),
            Some(Channel::Official),
        )
        .await
        .unwrap();

        let mut refreshed: Snapshot = serde_json::from_str(YARN_SNAPSHOT).unwrap();
        if let Some(entry) = refreshed.namespaces.get_mut("yarn") {
            entry
                .channels
                .insert("snapshot".to_owned(), VersionId::from("21w05a"));
        }
        library.replace(refreshed).await;

        let dataset = provider.dataset(&library).await.unwrap();
        assert_eq!(dataset.version.as_str(), "21w05a");
        assert!(matches!(
            provider.default_version(),
            Some(DefaultVersion::Resolved(resolved)) if resolved.version.as_str() == "21w05a"
        ));
    }

    #[tokio::test]
    async fn resolved_default_never_rebinds() {
        let library = library();
        let mut provider = resolve_provider(
            &library,
            yarn(),
            None,
            Some(Channel::Snapshot),
            Some(Channel::Official),
        )
        .await
        .unwrap();
        assert_eq!(provider.dataset(&library).await.unwrap().version.as_str(), "21w03a");

        library.replace(Snapshot::default()).await;
        assert_eq!(provider.dataset(&library).await.unwrap().version.as_str(), "21w03a");
    }

    #[tokio::test]
    async fn missing_channel_default_falls_back() {
        let library = library();
        let mut provider = resolve_provider(
            &library,
            yarn(),
            None,
            Some(Channel::Patchwork),
            Some(Channel::Official),
        )
        .await
        .unwrap();
        assert_eq!(provider.dataset(&library).await.unwrap().version.as_str(), "1.16.5");
    }

    #[tokio::test]
    async fn channelless_namespace_uses_plain_default() {
        let library = library();
        let mut provider = resolve_provider(&library, NamespaceId::Mcp.namespace(), None, None, None)
            .await
            .unwrap();
        assert_eq!(provider.dataset(&library).await.unwrap().version.as_str(), "1.12.2");
    }

    #[tokio::test]
    async fn nothing_to_resolve_reports_no_default() {
        let library = library();
        let mut provider =
            resolve_provider(&library, NamespaceId::Plasma.namespace(), None, None, None)
                .await
                .unwrap();
        assert!(matches!(
            provider.dataset(&library).await,
            Err(MappingsError::NoDefaultVersion {
                namespace: NamespaceId::Plasma
            })
        ));
    }
}
