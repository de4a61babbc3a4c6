//! Where command output goes.

use std::sync::Arc;

use async_trait::async_trait;
use twilight_http::Client;
use twilight_model::id::{Id, marker::ChannelMarker};

use mappings_utils::pagination::{DiscordSessionRouter, PaginationSession, send_paginated_session};

/// Output channel of one command invocation.
#[async_trait]
pub trait Reply: Send + Sync {
    /// Send a plain text message.
    async fn text(&self, content: &str) -> anyhow::Result<()>;

    /// Show a typing indicator while a slow lookup runs.
    async fn typing(&self) -> anyhow::Result<()>;

    /// Display a paginated result and keep it navigable until it expires.
    async fn paginate(&self, session: PaginationSession) -> anyhow::Result<()>;
}

/// Replies in the Discord channel the command was sent from.
pub struct ChannelReply {
    http: Arc<Client>,
    sessions: DiscordSessionRouter,
    channel_id: Id<ChannelMarker>,
    /// Id of the invoking message; it names the reply's pagination session.
    session_id: u64,
}

impl ChannelReply {
    pub fn new(
        http: Arc<Client>,
        sessions: DiscordSessionRouter,
        channel_id: Id<ChannelMarker>,
        session_id: u64,
    ) -> Self {
        Self {
            http,
            sessions,
            channel_id,
            session_id,
        }
    }
}

#[async_trait]
impl Reply for ChannelReply {
    async fn text(&self, content: &str) -> anyhow::Result<()> {
        self.http
            .create_message(self.channel_id)
            .content(content)
            .await?;
        Ok(())
    }

    async fn typing(&self) -> anyhow::Result<()> {
        self.http.create_typing_trigger(self.channel_id).await?;
        Ok(())
    }

    async fn paginate(&self, session: PaginationSession) -> anyhow::Result<()> {
        send_paginated_session(
            Arc::clone(&self.http),
            &self.sessions,
            self.channel_id,
            self.session_id,
            session,
        )
        .await
    }
}
