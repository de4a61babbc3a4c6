//! Stable facade for pagination helpers used by command handlers.

/// Default timeout for button-based pagination sessions.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

mod components;
pub mod interaction;
mod page;
pub mod respond;
pub mod runtime;
pub mod session;
pub mod token;

pub use interaction::route_pagination_interaction;
pub use page::{Page, PageGroup, PageSet, VERSION_CHUNK_SIZE, bulleted_chunks};
pub use respond::{DiscordSessionRouter, DiscordSurface, send_paginated_session};
pub use runtime::{NavigationInput, PendingSession, SessionRouter, SessionSurface};
pub use session::{NavAction, PaginationSession, SessionState, SessionView, Transition};
