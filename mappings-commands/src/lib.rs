pub mod help;
pub mod info;
pub mod lookup;
pub mod reply;
pub mod table;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use tracing::debug;
use twilight_model::{
    gateway::payload::incoming::{InteractionCreate, MessageCreate},
    id::{Id, marker::ChannelMarker},
};

use mappings_core::Context;
use mappings_data::{MappingsError, NamespaceId};
use mappings_utils::COMMAND_PREFIX;
use mappings_utils::checks::{Invocation, SealedChecks};
use mappings_utils::pagination::route_pagination_interaction;

pub use reply::{ChannelReply, Reply};
pub use table::{CommandEntry, CommandKind, CommandTable};

/// Outcome of dispatching one message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Dispatch {
    /// No registered command was named.
    NotACommand,
    /// A check in the command's pipeline failed; nothing was sent.
    Denied,
    Ran,
}

/// Routes gateway events to the registered mappings commands.
///
/// Cheap to clone; the command table is shared.
#[derive(Clone)]
pub struct CommandDispatcher {
    ctx: Context,
    table: Arc<CommandTable>,
}

impl CommandDispatcher {
    /// Register commands for the configured namespaces.
    pub fn new(ctx: Context, checks: &SealedChecks) -> Self {
        let table = CommandTable::build(&ctx.config, checks);
        Self {
            ctx,
            table: Arc::new(table),
        }
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    pub async fn handle_message(&self, msg: Box<MessageCreate>) -> anyhow::Result<()> {
        if msg.author.bot || self.command(&msg.content).is_none() {
            return Ok(());
        }

        let invocation = self.invocation(&msg).await?;
        let reply = ChannelReply::new(
            Arc::clone(&self.ctx.http),
            self.ctx.sessions.clone(),
            msg.channel_id,
            msg.id.get(),
        );

        self.dispatch(&msg.content, &invocation, &reply).await?;
        Ok(())
    }

    /// Run the command named by `content` for `invocation`, answering through `reply`.
    ///
    /// Denied invocations are logged at debug level and get no answer.
    pub async fn dispatch(
        &self,
        content: &str,
        invocation: &Invocation,
        reply: &dyn Reply,
    ) -> anyhow::Result<Dispatch> {
        let Some((entry, rest)) = self.command(content) else {
            return Ok(Dispatch::NotACommand);
        };

        if !entry.checks.passes(invocation).await {
            let denied = MappingsError::AccessDenied(entry.name.clone());
            debug!(
                user_id = invocation.user_id,
                channel_id = invocation.channel_id,
                "{denied}"
            );
            return Ok(Dispatch::Denied);
        }

        let ctx = &self.ctx;
        let owner_id = invocation.user_id;
        match (entry.kind, entry.namespace) {
            (CommandKind::Lookup(kind), Some(namespace)) => {
                lookup::run(ctx, entry, namespace, kind, owner_id, rest, reply).await?
            }
            (CommandKind::Info, Some(namespace)) => {
                let legacy_yarn_enabled = self.table.is_enabled(NamespaceId::LegacyYarn);
                info::run(ctx, namespace, legacy_yarn_enabled, owner_id, reply).await?
            }
            (CommandKind::Help, _) => {
                let arg1 = rest.and_then(|value| value.split_whitespace().next());
                help::run(ctx, &self.table, owner_id, arg1, reply).await?
            }
            _ => {}
        }

        Ok(Dispatch::Ran)
    }

    /// Route a component interaction; `Ok(false)` when no handler claimed it.
    pub async fn handle_interaction(
        &self,
        interaction: Box<InteractionCreate>,
    ) -> anyhow::Result<bool> {
        let interaction_id = interaction.id;
        let handled =
            route_pagination_interaction(&self.ctx.http, &self.ctx.sessions, interaction).await?;

        if !handled {
            debug!(%interaction_id, "interaction not handled");
        }

        Ok(handled)
    }

    async fn invocation(&self, msg: &MessageCreate) -> anyhow::Result<Invocation> {
        let category_id = match msg.guild_id {
            Some(_) if self.table.needs_category() => self.parent_category(msg.channel_id).await?,
            _ => None,
        };

        let role_ids = msg
            .member
            .as_ref()
            .map(|member| member.roles.iter().map(|id| id.get()).collect())
            .unwrap_or_default();

        Ok(Invocation {
            user_id: msg.author.id.get(),
            channel_id: msg.channel_id.get(),
            guild_id: msg.guild_id.map(|id| id.get()),
            category_id,
            role_ids,
            http: Some(Arc::clone(&self.ctx.http)),
        })
    }

    fn command<'a>(&self, content: &'a str) -> Option<(&CommandEntry, Option<&'a str>)> {
        let (cmd, rest) = split_command(content)?;
        Some((self.table.resolve(cmd)?, rest))
    }

    async fn parent_category(&self, channel_id: Id<ChannelMarker>) -> anyhow::Result<Option<u64>> {
        let channel = self.ctx.http.channel(channel_id).await?.model().await?;
        Ok(channel.parent_id.map(|id| id.get()))
    }
}

/// Split `!cmd rest...` into the command name and its trimmed arguments.
fn split_command(content: &str) -> Option<(&str, Option<&str>)> {
    let content = content.trim().strip_prefix(COMMAND_PREFIX)?.trim_start();
    let mut command_and_rest = content.splitn(2, char::is_whitespace);
    let cmd = command_and_rest.next().filter(|cmd| !cmd.is_empty())?;
    let rest = command_and_rest
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    Some((cmd, rest))
}
