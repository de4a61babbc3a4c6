use std::env;
use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use twilight_gateway::{EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::gateway::event::Event;

use rustls::crypto::ring::default_provider;

use mappings_commands::CommandDispatcher;
use mappings_core::{Context, MappingsConfig};
use mappings_data::SnapshotLibrary;
use mappings_utils::checks::CheckRegistry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load the .env file before anything reads the environment
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    let token = env::var("DISCORD_TOKEN")?;

    let config = MappingsConfig::load()?;
    let library = SnapshotLibrary::load(config.snapshot_path())?;

    // Custom checks are registered here, before sealing
    let checks = CheckRegistry::new().seal();

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(token.clone()));
    let ctx = Context::new(Arc::clone(&http), Arc::new(config), Arc::new(library));
    let dispatcher = CommandDispatcher::new(ctx, &checks);

    let intents = Intents::GUILDS | Intents::GUILD_MESSAGES | Intents::MESSAGE_CONTENT;

    // A shard is one Gateway WebSocket connection to Discord
    let mut shard = Shard::new(ShardId::new(0, 1), token, intents);

    info!("Mappings bot is connecting...");

    while let Some(item) = shard.next_event(EventTypeFlags::all()).await {
        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        match event {
            Event::Ready(_) => {
                info!("Mappings bot is ready");
            }
            Event::MessageCreate(msg) => {
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move {
                    if let Err(source) = dispatcher.handle_message(msg).await {
                        error!(?source, "message handler failed");
                    }
                });
            }
            Event::InteractionCreate(interaction) => {
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move {
                    if let Err(source) = dispatcher.handle_interaction(interaction).await {
                        error!(?source, "interaction handler failed");
                    }
                });
            }
            _ => {} // Ignore unused events
        }
    }

    Ok(())
}
