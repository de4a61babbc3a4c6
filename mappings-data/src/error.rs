use thiserror::Error;

use crate::namespace::{Channel, NamespaceId};

/// Failure kinds of a mappings command invocation.
///
/// None of these are fatal to the process; the worst outcome is a declined
/// or failed single invocation.
#[derive(Debug, Error)]
pub enum MappingsError {
    /// Configuration names a namespace that is not in the catalog.
    #[error("Unsupported mappings namespace: `{0}`")]
    UnsupportedNamespace(String),

    /// An explicit version is unknown to, or not materialized by, the library.
    #[error("Invalid {namespace} version: `{version}`")]
    UnresolvedVersion {
        namespace: NamespaceId,
        version: String,
    },

    /// The caller asked for a channel that configuration switched off.
    #[error("{} support is currently disabled.", .0.label())]
    ChannelDisabled(Channel),

    /// The query succeeded but matched nothing.
    #[error("No results found")]
    EmptyResult,

    /// A check predicate declined the invocation.
    #[error("access denied for command `{0}`")]
    AccessDenied(String),

    /// Neither the requested nor the fallback default resolved to a dataset.
    #[error("No {namespace} mappings are available right now.")]
    NoDefaultVersion { namespace: NamespaceId },

    #[error(transparent)]
    Library(#[from] anyhow::Error),
}

impl MappingsError {
    /// Text shown to the invoking user, or `None` when the failure stays silent.
    pub fn user_notice(&self) -> Option<String> {
        match self {
            Self::AccessDenied(_) => None,
            Self::Library(source) => Some(format!("Unable to query mappings: {source}")),
            other => Some(other.to_string()),
        }
    }
}
