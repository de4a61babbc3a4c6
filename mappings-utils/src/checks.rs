//! Access-control checks run before any mappings command executes.
//!
//! Custom checks are registered once during bootstrap on a [`CheckRegistry`].
//! Sealing the registry yields [`SealedChecks`], which has no mutators and
//! can be shared freely between concurrent invocations.
//!
//! Checks are async so they can query Discord through the invocation's
//! client, e.g. to resolve permissions. They may be evaluated for every
//! command message and are skipped once an earlier check fails.

use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use twilight_http::Client;

use mappings_data::NamespaceId;

/// Context of one command invocation.
#[derive(Clone, Debug, Default)]
pub struct Invocation {
    pub user_id: u64,
    pub channel_id: u64,
    /// `None` outside guilds.
    pub guild_id: Option<u64>,
    /// Parent category of the channel, when known.
    pub category_id: Option<u64>,
    /// Roles of the invoking member; empty outside guilds.
    pub role_ids: Vec<u64>,
    /// Client for checks that need more than the message carries.
    pub http: Option<Arc<Client>>,
}

/// A pass/fail predicate over an invocation.
#[async_trait]
pub trait Check: Send + Sync {
    async fn passes(&self, invocation: &Invocation) -> bool;
}

#[async_trait]
impl<F> Check for F
where
    F: Fn(&Invocation) -> bool + Send + Sync,
{
    async fn passes(&self, invocation: &Invocation) -> bool {
        self(invocation)
    }
}

type NameCheckFactory = Box<dyn Fn(&str) -> Arc<dyn Check> + Send + Sync>;
type NamespaceCheckFactory = Box<dyn Fn(NamespaceId) -> Arc<dyn Check> + Send + Sync>;

/// Allow and ban sets for one kind of scope identifier.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AllowBan {
    allowed: HashSet<u64>,
    banned: HashSet<u64>,
}

impl AllowBan {
    pub fn new(
        allowed: impl IntoIterator<Item = u64>,
        banned: impl IntoIterator<Item = u64>,
    ) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
            banned: banned.into_iter().collect(),
        }
    }

    /// Whether neither list is configured.
    pub fn is_unrestricted(&self) -> bool {
        self.allowed.is_empty() && self.banned.is_empty()
    }

    /// Ban wins over allow; a missing identifier is never a member.
    pub fn permits(&self, id: Option<u64>) -> bool {
        let member = |set: &HashSet<u64>| id.is_some_and(|id| set.contains(&id));

        if !self.banned.is_empty() && member(&self.banned) {
            return false;
        }

        if !self.allowed.is_empty() && !member(&self.allowed) {
            return false;
        }

        true
    }
}

/// Configured allow/ban lists for categories, channels and guilds.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AccessLists {
    pub categories: AllowBan,
    pub channels: AllowBan,
    pub guilds: AllowBan,
}

impl AccessLists {
    /// Whether evaluating the lists requires the channel's parent category.
    pub fn needs_category(&self) -> bool {
        !self.categories.is_unrestricted()
    }
}

#[derive(Clone, Copy, Debug)]
enum Scope {
    Category,
    Channel,
    Guild,
}

struct ScopeCheck {
    scope: Scope,
    lists: AllowBan,
}

#[async_trait]
impl Check for ScopeCheck {
    async fn passes(&self, invocation: &Invocation) -> bool {
        let id = match self.scope {
            Scope::Category => invocation.category_id,
            Scope::Channel => Some(invocation.channel_id),
            Scope::Guild => invocation.guild_id,
        };

        self.lists.permits(id)
    }
}

/// Bootstrap-time registry of custom check factories.
#[derive(Default)]
pub struct CheckRegistry {
    name_checks: Vec<NameCheckFactory>,
    namespace_checks: Vec<NamespaceCheckFactory>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory invoked with each command's name.
    pub fn add_name_check<F, C>(&mut self, factory: F) -> &mut Self
    where
        F: Fn(&str) -> C + Send + Sync + 'static,
        C: Check + 'static,
    {
        self.name_checks
            .push(Box::new(move |name| Arc::new(factory(name)) as Arc<dyn Check>));
        self
    }

    /// Register a factory invoked with each command's namespace.
    pub fn add_namespace_check<F, C>(&mut self, factory: F) -> &mut Self
    where
        F: Fn(NamespaceId) -> C + Send + Sync + 'static,
        C: Check + 'static,
    {
        self.namespace_checks.push(Box::new(move |namespace| {
            Arc::new(factory(namespace)) as Arc<dyn Check>
        }));
        self
    }

    /// Freeze the registry; no checks can be added afterwards.
    pub fn seal(self) -> SealedChecks {
        SealedChecks {
            inner: Arc::new(self),
        }
    }
}

/// Immutable, shareable view of the registered check factories.
#[derive(Clone)]
pub struct SealedChecks {
    inner: Arc<CheckRegistry>,
}

impl SealedChecks {
    /// Compose the pipeline guarding one command.
    ///
    /// Order: name-scoped customs, namespace-scoped customs, then the
    /// category, channel and guild lists.
    pub fn build(
        &self,
        command: &str,
        namespace: NamespaceId,
        lists: &AccessLists,
    ) -> CheckPipeline {
        self.compose(command, Some(namespace), lists)
    }

    /// Compose the pipeline for a command outside any namespace.
    ///
    /// Namespace-scoped customs are skipped.
    pub fn build_unscoped(&self, command: &str, lists: &AccessLists) -> CheckPipeline {
        self.compose(command, None, lists)
    }

    fn compose(
        &self,
        command: &str,
        namespace: Option<NamespaceId>,
        lists: &AccessLists,
    ) -> CheckPipeline {
        let mut checks: Vec<Arc<dyn Check>> = Vec::new();

        checks.extend(self.inner.name_checks.iter().map(|factory| factory(command)));
        if let Some(namespace) = namespace {
            checks.extend(
                self.inner
                    .namespace_checks
                    .iter()
                    .map(|factory| factory(namespace)),
            );
        }

        for (scope, list) in [
            (Scope::Category, &lists.categories),
            (Scope::Channel, &lists.channels),
            (Scope::Guild, &lists.guilds),
        ] {
            checks.push(Arc::new(ScopeCheck {
                scope,
                lists: list.clone(),
            }));
        }

        CheckPipeline { checks }
    }
}

/// Ordered checks guarding one command; evaluation stops at the first failure.
#[derive(Clone)]
pub struct CheckPipeline {
    checks: Vec<Arc<dyn Check>>,
}

impl CheckPipeline {
    pub async fn passes(&self, invocation: &Invocation) -> bool {
        for check in &self.checks {
            if !check.passes(invocation).await {
                return false;
            }
        }

        true
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
