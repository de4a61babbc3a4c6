//! Routing of pagination button presses to their session tasks.

use twilight_http::Client;
use twilight_model::{
    application::interaction::InteractionData, gateway::payload::incoming::InteractionCreate,
};

use super::respond::{
    DiscordSessionRouter, respond_ephemeral_message, respond_expired, respond_invalid,
};
use super::runtime::NavigationInput;
use super::token::{NavToken, is_pagination_custom_id, parse_custom_id};

/// Where a component press with a given custom id should go.
#[derive(Debug, PartialEq, Eq)]
enum Route {
    /// Not a pagination control; another handler may own it.
    Foreign,
    /// Carries the pagination prefix but cannot be decoded.
    Invalid,
    Session(NavToken),
}

fn classify_custom_id(custom_id: &str) -> Route {
    if !is_pagination_custom_id(custom_id) {
        return Route::Foreign;
    }

    parse_custom_id(custom_id).map_or(Route::Invalid, Route::Session)
}

/// Forward a pagination component interaction to its session.
///
/// Returns `Ok(false)` when the interaction is not a pagination control.
/// Presses on sessions that already expired are answered with an ephemeral
/// notice and otherwise have no effect.
pub async fn route_pagination_interaction(
    http: &Client,
    router: &DiscordSessionRouter,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<bool> {
    let route = match interaction.data.as_ref() {
        Some(InteractionData::MessageComponent(component_data)) => {
            classify_custom_id(&component_data.custom_id)
        }
        _ => Route::Foreign,
    };

    let token = match route {
        Route::Foreign => return Ok(false),
        Route::Invalid => {
            respond_invalid(http, &interaction).await?;
            return Ok(true);
        }
        Route::Session(token) => token,
    };

    let Some(actor_id) = interaction.author_id().map(|id| id.get()) else {
        respond_ephemeral_message(http, &interaction, "Unable to determine interaction user.")
            .await?;
        return Ok(true);
    };

    let input = NavigationInput {
        actor_id,
        action: token.action,
        interaction,
    };

    if let Err(rejected) = router.dispatch(token.session_id, input).await {
        respond_expired(http, &rejected.interaction).await?;
    }

    Ok(true)
}
