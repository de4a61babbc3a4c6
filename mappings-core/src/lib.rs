use std::sync::Arc;

use twilight_http::Client;

use mappings_data::MappingsLibrary;
use mappings_utils::pagination::DiscordSessionRouter;

/// Configuration loading for the mappings commands.
pub mod config;

pub use config::{ConfigError, MappingsConfig};

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub config: Arc<MappingsConfig>,
    pub library: Arc<dyn MappingsLibrary>,
    /// Live pagination sessions, keyed by session id.
    pub sessions: DiscordSessionRouter,
}

impl Context {
    /// Create a new application context.
    pub fn new(
        http: Arc<Client>,
        config: Arc<MappingsConfig>,
        library: Arc<dyn MappingsLibrary>,
    ) -> Self {
        Self {
            http,
            config,
            library,
            sessions: DiscordSessionRouter::new(),
        }
    }
}
