//! Shared interaction response helpers for pagination flows.

use std::sync::Arc;

use async_trait::async_trait;
use twilight_http::Client;
use twilight_model::{
    channel::{
        Message,
        message::{MessageFlags, component::Component, embed::Embed},
    },
    gateway::payload::incoming::InteractionCreate,
    http::interaction::{InteractionResponse, InteractionResponseType},
    id::{
        Id,
        marker::{ChannelMarker, MessageMarker},
    },
};
use twilight_util::builder::InteractionResponseDataBuilder;

use crate::embed::build_page_embed;

use super::components::build_nav_components;
use super::runtime::{SessionRouter, SessionSurface};
use super::session::PaginationSession;

/// Router type used by the bot: inputs carry the raw Discord interaction.
pub type DiscordSessionRouter = SessionRouter<Box<InteractionCreate>>;

/// Generic message shown when a pagination interaction has expired.
pub const PAGINATION_EXPIRED_MESSAGE: &str =
    "This pagination session expired. Run the command again.";
/// Generic message shown when pagination interaction payload is invalid.
pub const PAGINATION_INVALID_MESSAGE: &str = "Invalid pagination interaction.";

/// Respond to a component interaction with an in-place message update.
pub async fn respond_update_message(
    http: &Client,
    interaction: &InteractionCreate,
    embeds: &[Embed],
    components: &[Component],
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::UpdateMessage,
        data: Some(
            InteractionResponseDataBuilder::new()
                .embeds(embeds.to_vec())
                .components(components.to_vec())
                .build(),
        ),
    };

    http.interaction(interaction.application_id)
        .create_response(interaction.id, &interaction.token, &response)
        .await?;

    Ok(())
}

/// Acknowledge a component interaction without changing the message.
pub async fn defer_component_update(
    http: &Client,
    interaction: &InteractionCreate,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::DeferredUpdateMessage,
        data: None,
    };

    http.interaction(interaction.application_id)
        .create_response(interaction.id, &interaction.token, &response)
        .await?;

    Ok(())
}

/// Respond to a component interaction with an ephemeral message.
pub async fn respond_ephemeral_message(
    http: &Client,
    interaction: &InteractionCreate,
    content: &str,
) -> anyhow::Result<()> {
    let response = InteractionResponse {
        kind: InteractionResponseType::ChannelMessageWithSource,
        data: Some(
            InteractionResponseDataBuilder::new()
                .content(content)
                .flags(MessageFlags::EPHEMERAL)
                .build(),
        ),
    };

    http.interaction(interaction.application_id)
        .create_response(interaction.id, &interaction.token, &response)
        .await?;

    Ok(())
}

/// Respond with the standard expired pagination message.
pub async fn respond_expired(http: &Client, interaction: &InteractionCreate) -> anyhow::Result<()> {
    respond_ephemeral_message(http, interaction, PAGINATION_EXPIRED_MESSAGE).await
}

/// Respond with the standard invalid pagination message.
pub async fn respond_invalid(http: &Client, interaction: &InteractionCreate) -> anyhow::Result<()> {
    respond_ephemeral_message(http, interaction, PAGINATION_INVALID_MESSAGE).await
}

/// Render a session's current page as an embed plus its controls.
fn render_session(
    session_id: u64,
    session: &PaginationSession,
) -> anyhow::Result<Option<(Embed, Vec<Component>)>> {
    let Some(view) = session.view() else {
        return Ok(None);
    };

    let embed = build_page_embed(view.page, view.index + 1, view.total)?;
    let components = build_nav_components(session_id, &view);

    Ok(Some((embed, components)))
}

/// Send a session's first page and start its task when there is anything to navigate.
///
/// The session id is registered before the message goes out, so presses
/// that race the send are queued rather than answered as expired.
pub async fn send_paginated_session(
    http: Arc<Client>,
    router: &DiscordSessionRouter,
    channel_id: Id<ChannelMarker>,
    session_id: u64,
    session: PaginationSession,
) -> anyhow::Result<()> {
    let Some((embed, components)) = render_session(session_id, &session)? else {
        return Ok(());
    };

    let pending = if session.is_navigable() {
        Some(router.register(session_id).await)
    } else {
        None
    };

    let created_message = match create_page_message(&http, channel_id, embed, &components).await {
        Ok(message) => message,
        Err(source) => {
            if let Some(pending) = pending {
                pending.cancel().await;
            }
            return Err(source);
        }
    };

    if let Some(pending) = pending {
        let surface = DiscordSurface {
            http,
            session_id,
            channel_id: created_message.channel_id,
            message_id: created_message.id,
        };
        pending.start(session, surface);
    }

    Ok(())
}

async fn create_page_message(
    http: &Client,
    channel_id: Id<ChannelMarker>,
    embed: Embed,
    components: &[Component],
) -> anyhow::Result<Message> {
    let message = http
        .create_message(channel_id)
        .embeds(&[embed])
        .components(components)
        .await?
        .model()
        .await?;

    Ok(message)
}

/// A session displayed as one Discord message with button controls.
pub struct DiscordSurface {
    http: Arc<Client>,
    session_id: u64,
    channel_id: Id<ChannelMarker>,
    message_id: Id<MessageMarker>,
}

#[async_trait]
impl SessionSurface for DiscordSurface {
    type Interaction = Box<InteractionCreate>;

    async fn render(
        &self,
        interaction: Box<InteractionCreate>,
        session: &PaginationSession,
    ) -> anyhow::Result<()> {
        match render_session(self.session_id, session)? {
            Some((embed, components)) => {
                respond_update_message(&self.http, &interaction, &[embed], &components).await
            }
            None => defer_component_update(&self.http, &interaction).await,
        }
    }

    async fn acknowledge(&self, interaction: Box<InteractionCreate>) -> anyhow::Result<()> {
        defer_component_update(&self.http, &interaction).await
    }

    async fn close(&self) -> anyhow::Result<()> {
        let empty_components: [Component; 0] = [];
        self.http
            .update_message(self.channel_id, self.message_id)
            .components(Some(&empty_components))
            .await?;

        Ok(())
    }
}
