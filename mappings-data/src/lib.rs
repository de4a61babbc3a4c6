/// Typed errors shared by resolution, gating and lookup flows.
pub mod error;
/// Dataset library seam and the values it hands back.
pub mod library;
/// Static registry of known namespaces and their channels.
pub mod namespace;
/// Per-invocation dataset handles and version resolution.
pub mod provider;
/// JSON snapshot backed library implementation.
pub mod snapshot;

pub use error::MappingsError;
pub use library::{DatasetMeta, MappingsLibrary, ResultEntry, VersionId};
pub use namespace::{Channel, DefaultChannel, Namespace, NamespaceId, QueryKind};
pub use provider::{DefaultResolver, DefaultVersion, Provider, resolve_provider};
pub use snapshot::SnapshotLibrary;
